//! Concrete node types: entry/exit markers, a plain action step, and
//! the three exclusive-choice gateways.

use crate::activity::node::{fire_primers, Node, NodeCore, VisitOutcome};
use crate::activity::types::{Condition, EventPrimer, NodeId, NodeType, SwitchFunction, SwitchKey, TaskFn};
use crate::event::{EventEntity, EventLoop, SimState};
use crate::time::Time;
use std::collections::HashMap;
use std::rc::Rc;

/// The single entry point of a graph.
pub struct Start {
    core: NodeCore,
    output: NodeId,
}

impl Start {
    pub fn new(id: NodeId, label: impl Into<String>, output: NodeId) -> Self {
        Self { core: NodeCore::new(id, label), output }
    }
}

impl Node for Start {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::Start
    }
    fn visit(&self, _time: Time, _entity: &Rc<dyn EventEntity>, _loop_: &Rc<EventLoop>, _state: &SimState) -> VisitOutcome {
        VisitOutcome::Advance(self.output)
    }
}

/// A terminal node. Visiting it ends the activity.
pub struct End {
    core: NodeCore,
}

impl End {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self { core: NodeCore::new(id, label) }
    }
}

impl Node for End {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::End
    }
    fn visit(&self, _time: Time, _entity: &Rc<dyn EventEntity>, _loop_: &Rc<EventLoop>, _state: &SimState) -> VisitOutcome {
        VisitOutcome::Finished
    }
}

/// Runs an arbitrary action, then advances unconditionally.
pub struct Task {
    core: NodeCore,
    output: NodeId,
    action: TaskFn,
}

impl Task {
    pub fn new(id: NodeId, label: impl Into<String>, output: NodeId, action: TaskFn) -> Self {
        Self { core: NodeCore::new(id, label), output, action }
    }
}

impl Node for Task {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::Task
    }
    fn visit(&self, time: Time, entity: &Rc<dyn EventEntity>, _loop_: &Rc<EventLoop>, _state: &SimState) -> VisitOutcome {
        (self.action)(time, entity);
        VisitOutcome::Advance(self.output)
    }
}

/// Exclusive branch chosen by evaluating conditions in order; the last
/// registered branch with no condition acts as the default.
pub struct XorGate {
    core: NodeCore,
    branches: Vec<(NodeId, Condition)>,
    default: NodeId,
}

impl XorGate {
    pub fn new(id: NodeId, label: impl Into<String>, branches: Vec<(NodeId, Condition)>, default: NodeId) -> Self {
        Self { core: NodeCore::new(id, label), branches, default }
    }
}

impl Node for XorGate {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::XorGate
    }
    fn visit(&self, time: Time, entity: &Rc<dyn EventEntity>, _loop_: &Rc<EventLoop>, _state: &SimState) -> VisitOutcome {
        for (next, cond) in &self.branches {
            if cond(time, entity) {
                return VisitOutcome::Advance(*next);
            }
        }
        VisitOutcome::Advance(self.default)
    }
}

/// Exclusive branch chosen by a computed lookup key rather than an
/// ordered list of conditions.
pub struct XorSwitchGate {
    core: NodeCore,
    switch_fn: SwitchFunction,
    table: HashMap<SwitchKey, NodeId>,
    default: NodeId,
}

impl XorSwitchGate {
    pub fn new(
        id: NodeId,
        label: impl Into<String>,
        switch_fn: SwitchFunction,
        table: HashMap<SwitchKey, NodeId>,
        default: NodeId,
    ) -> Self {
        Self { core: NodeCore::new(id, label), switch_fn, table, default }
    }
}

impl Node for XorSwitchGate {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::XorSwitchGate
    }
    fn visit(&self, time: Time, entity: &Rc<dyn EventEntity>, _loop_: &Rc<EventLoop>, _state: &SimState) -> VisitOutcome {
        let key = (self.switch_fn)(time, entity);
        let next = self.table.get(&key).copied().unwrap_or(self.default);
        VisitOutcome::Advance(next)
    }
}

/// Waits for one of several events to fire before continuing. Each
/// output has its own primer that registers the event for that branch
/// when the gate is visited; whichever fires first wins, and the
/// interpreter is responsible for cancelling the rest.
pub struct XorEventGate {
    core: NodeCore,
    primers: Vec<(NodeId, EventPrimer)>,
}

impl XorEventGate {
    pub fn new(id: NodeId, label: impl Into<String>, primers: Vec<(NodeId, EventPrimer)>) -> Self {
        Self { core: NodeCore::new(id, label), primers }
    }
}

impl Node for XorEventGate {
    fn id(&self) -> NodeId {
        self.core.id()
    }
    fn label(&self) -> &str {
        self.core.label()
    }
    fn node_type(&self) -> NodeType {
        NodeType::XorEventGate
    }
    fn visit(&self, time: Time, entity: &Rc<dyn EventEntity>, loop_: &Rc<EventLoop>, state: &SimState) -> VisitOutcome {
        VisitOutcome::Wait(fire_primers(&self.primers, time, entity, loop_, state))
    }
}
