//! Shared type aliases for the activity-graph nodes.

use crate::event::{Event, EventEntity, EventLoop, SimState};
use crate::time::Time;
use std::rc::Rc;

pub type NodeId = usize;

/// What kind of node a graph node is, for diagnostics and `match`-free
/// dispatch where the caller only needs the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Start,
    End,
    Task,
    XorGate,
    XorSwitchGate,
    XorEventGate,
}

/// Registers an event on the loop for the branch associated with a
/// [`super::XorEventGate`] output, returning the event created (so the
/// gate can cancel the sibling primers' events once one of them fires).
pub type EventPrimer = Rc<dyn Fn(Time, &Rc<dyn EventEntity>, &Rc<EventLoop>, &SimState) -> Option<Rc<Event>>>;

/// Decides whether a [`super::XorGate`] branch is taken.
pub type Condition = Rc<dyn Fn(Time, &Rc<dyn EventEntity>) -> bool>;

/// Lookup key computed from current state, used by [`super::XorSwitchGate`].
pub type SwitchKey = i64;

/// Computes the lookup key for a [`super::XorSwitchGate`].
pub type SwitchFunction = Rc<dyn Fn(Time, &Rc<dyn EventEntity>) -> SwitchKey>;

/// The work a [`super::Task`] node performs when visited.
pub type TaskFn = Rc<dyn Fn(Time, &Rc<dyn EventEntity>)>;
