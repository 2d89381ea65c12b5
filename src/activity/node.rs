//! `Node`: the common surface every activity-graph node implements.

use crate::activity::types::{EventPrimer, NodeId, NodeType};
use crate::event::{Event, EventEntity, EventLoop, SimState};
use crate::time::Time;
use std::rc::Rc;

/// What happened when a node was visited.
pub enum VisitOutcome {
    /// Control continues immediately at the named node.
    Advance(NodeId),
    /// The node registered one event per listed output and the
    /// interpreter must suspend until one of them fires.
    Wait(Vec<(NodeId, Rc<Event>)>),
    /// The graph reached an [`super::End`] node.
    Finished,
}

pub trait Node {
    fn id(&self) -> NodeId;
    fn label(&self) -> &str;
    fn node_type(&self) -> NodeType;

    /// Perform this node's action and decide where control goes next.
    fn visit(&self, time: Time, entity: &Rc<dyn EventEntity>, loop_: &Rc<EventLoop>, state: &SimState) -> VisitOutcome;
}

/// Shared id/label storage every concrete node embeds.
pub(super) struct NodeCore {
    id: NodeId,
    label: String,
}

impl NodeCore {
    pub(super) fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self { id, label: label.into() }
    }

    pub(super) fn id(&self) -> NodeId {
        self.id
    }

    pub(super) fn label(&self) -> &str {
        &self.label
    }
}

pub(super) fn fire_primers(
    primers: &[(NodeId, EventPrimer)],
    time: Time,
    entity: &Rc<dyn EventEntity>,
    loop_: &Rc<EventLoop>,
    state: &SimState,
) -> Vec<(NodeId, Rc<Event>)> {
    primers
        .iter()
        .filter_map(|(next_id, primer)| primer(time, entity, loop_, state).map(|ev| (*next_id, ev)))
        .collect()
}
