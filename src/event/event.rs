//! `Event`: one scheduled (target, handler) pair.

use crate::event::entity::EventEntity;
use crate::event::handler::{EventHandler, ParamMap};
use crate::time::{Time, TIME_MIN};
use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// A single scheduled invocation of an [`EventHandler`] against a
/// target [`EventEntity`].
///
/// `Event` holds only a *weak* reference to its target, matching the
/// ownership discipline in DESIGN.md: targets (curves, container
/// curves, host entities) hold the strong references to the events
/// that depend on them, and the queue holds the strong reference to
/// the event itself. Cancelling an event means nulling its weak
/// target, not dropping it out of the heap immediately — see
/// [`crate::event::EventQueue`].
pub struct Event {
    id: usize,
    entity: RefCell<Weak<dyn EventEntity>>,
    handler: Rc<dyn EventHandler>,
    params: ParamMap,
    time: Cell<Time>,
    last_change_time: Cell<Time>,
}

impl Event {
    pub fn new(id: usize, entity: &Rc<dyn EventEntity>, handler: Rc<dyn EventHandler>, params: ParamMap, time: Time) -> Self {
        Self {
            id,
            entity: RefCell::new(Rc::downgrade(entity)),
            handler,
            params,
            time: Cell::new(time),
            last_change_time: Cell::new(TIME_MIN),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn target(&self) -> Option<Rc<dyn EventEntity>> {
        self.entity.borrow().upgrade()
    }

    pub fn handler(&self) -> &Rc<dyn EventHandler> {
        &self.handler
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn time(&self) -> Time {
        self.time.get()
    }

    pub fn set_time(&self, at: Time) {
        self.time.set(at);
    }

    pub fn last_change_time(&self) -> Time {
        self.last_change_time.get()
    }

    pub fn set_last_change_time(&self, at: Time) {
        self.last_change_time.set(at);
    }

    /// Register this event (already wrapped in `Rc`) as a dependent
    /// of `dependency`.
    pub fn depend_on(self: &Rc<Self>, dependency: &Rc<dyn EventEntity>) -> crate::error::CoreResult<()> {
        dependency.add_dependent(self.clone())
    }

    /// Cancel the event by nulling its weak target. The heap entry
    /// referencing this event becomes stale and is discarded, without
    /// counting toward `execute_events`, the next time it is popped.
    pub fn cancel(&self, reference_time: Time) {
        struct Null;
        impl EventEntity for Null {
            fn entity_id(&self) -> usize {
                usize::MAX
            }
            fn entity_idstr(&self) -> &str {
                ""
            }
            fn add_dependent(&self, _event: Rc<Event>) -> crate::error::CoreResult<()> {
                unreachable!()
            }
            fn notify_changes(&self, _at: Time) {}
            fn notify_trigger(&self, _last_valid: Time) {}
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
        *self.entity.borrow_mut() = Weak::<Null>::new();
        self.last_change_time.set(reference_time);
    }

    pub fn is_cancelled(&self) -> bool {
        self.entity.borrow().upgrade().is_none()
    }

    /// Dedup key: a change against the same (target, handler) pair
    /// collapses into a single pending entry.
    pub fn dedup_key(&self) -> (usize, String) {
        let target_id = self.target().map(|t| t.entity_id()).unwrap_or(usize::MAX);
        (target_id, self.handler.id().to_string())
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
