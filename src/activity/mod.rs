//! A thin directed-graph DSL layered on top of the event loop: nodes
//! run actions and resolve branches synchronously, except for
//! `XorEventGate`, which suspends the walk until one of several
//! registered events fires.

mod gates;
mod graph;
mod node;
mod types;

pub use gates::{End, Start, Task, XorEventGate, XorGate, XorSwitchGate};
pub use graph::{ActivityGraph, AdvanceResult};
pub use node::{Node, VisitOutcome};
pub use types::{Condition, EventPrimer, NodeId, NodeType, SwitchFunction, SwitchKey, TaskFn};
