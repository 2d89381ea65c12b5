//! `ActivityGraph`: walks a fixed set of [`Node`]s from `Start`,
//! running tasks and resolving gateways synchronously, and suspending
//! at an `XorEventGate` until the interpreter is told which branch's
//! event fired.

use crate::activity::node::{Node, VisitOutcome};
use crate::activity::types::NodeId;
use crate::event::{Event, EventEntity, EventLoop, SimState};
use crate::time::Time;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Why [`ActivityGraph::advance`] returned.
pub enum AdvanceResult {
    /// Waiting on one of these (node, event) pairs to fire.
    Waiting(Vec<(NodeId, Rc<Event>)>),
    /// Reached an `End` node.
    Finished,
}

pub struct ActivityGraph {
    nodes: HashMap<NodeId, Rc<dyn Node>>,
    current: Cell<NodeId>,
    /// Events registered by the last `XorEventGate` visited, kept so
    /// `resume` can cancel the branches that did not fire.
    pending: RefCell<Vec<(NodeId, Rc<Event>)>>,
    start: NodeId,
}

impl ActivityGraph {
    pub fn new(nodes: Vec<Rc<dyn Node>>, start: NodeId) -> Self {
        let nodes = nodes.into_iter().map(|n| (n.id(), n)).collect();
        Self { nodes, current: Cell::new(start), pending: RefCell::new(Vec::new()), start }
    }

    pub fn reset(&self) {
        self.current.set(self.start);
        self.pending.borrow_mut().clear();
    }

    fn node(&self, id: NodeId) -> &Rc<dyn Node> {
        self.nodes.get(&id).expect("activity graph referenced an unregistered node id")
    }

    /// Walk nodes from the current position until reaching an
    /// `XorEventGate` (which suspends the walk) or an `End` node.
    pub fn advance(&self, time: Time, entity: &Rc<dyn EventEntity>, loop_: &Rc<EventLoop>, state: &SimState) -> AdvanceResult {
        loop {
            let node = self.node(self.current.get());
            match node.visit(time, entity, loop_, state) {
                VisitOutcome::Advance(next) => self.current.set(next),
                VisitOutcome::Wait(events) => {
                    *self.pending.borrow_mut() = events.clone();
                    return AdvanceResult::Waiting(events);
                }
                VisitOutcome::Finished => return AdvanceResult::Finished,
            }
        }
    }

    /// Called when one of the events registered by the last
    /// `XorEventGate` fires. Cancels every sibling event that did not
    /// fire, moves control to `fired_node`, and resumes walking.
    pub fn resume(
        &self,
        fired_node: NodeId,
        time: Time,
        entity: &Rc<dyn EventEntity>,
        loop_: &Rc<EventLoop>,
        state: &SimState,
    ) -> AdvanceResult {
        for (node_id, event) in self.pending.borrow_mut().drain(..) {
            if node_id != fired_node {
                event.cancel(time);
            }
        }
        self.current.set(fired_node);
        self.advance(time, entity, loop_, state)
    }
}
