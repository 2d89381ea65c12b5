//! Event handlers: the registered logic that fires when an event
//! reaches the front of the loop, plus the five scheduling disciplines
//! ("trigger types") that decide when that happens.

use crate::error::CoreResult;
use crate::event::entity::EventEntity;
use crate::event::loop_::EventLoop;
use crate::event::state::SimState;
use crate::time::Time;
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

/// The five scheduling disciplines an [`EventHandler`] can declare.
///
/// See [`crate::event::EventQueue::create_event`] for the storage
/// consequence of each: DEPENDENCY, DEPENDENCY_IMMEDIATELY and TRIGGER
/// events live only in [`crate::event::EventQueue`]'s side sets until a
/// change promotes them; REPEAT and ONCE are pushed straight onto the
/// main heap when created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerType {
    /// Fires the next time its dependency target changes, at a time
    /// computed by [`EventHandler::predict_invoke_time`].
    Dependency,
    /// Fires immediately when its dependency target changes, without
    /// a predicted future time.
    DependencyImmediately,
    /// Fires only when explicitly triggered via [`EventEntity::trigger`],
    /// never from ordinary `changes` notifications.
    Trigger,
    /// Fires, then reschedules itself by recomputing
    /// `predict_invoke_time` after every invocation, until that
    /// prediction returns [`crate::time::TIME_MIN`].
    Repeat,
    /// Fires exactly once and is then dropped from its target's
    /// dependent list.
    Once,
}

/// A string-keyed, type-erased parameter bag attached to each
/// scheduled [`crate::event::Event`].
#[derive(Default)]
pub struct ParamMap {
    values: HashMap<String, Box<dyn Any>>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn check_type<T: 'static>(&self, key: &str) -> bool {
        self.values.get(key).map(|v| v.is::<T>()).unwrap_or(false)
    }

    /// Returns the stored value cloned, or `default` if the key is
    /// absent or stored under a different type.
    pub fn get<T: Clone + 'static>(&self, key: &str, default: T) -> T {
        match self.values.get(key).and_then(|v| v.downcast_ref::<T>()) {
            Some(v) => v.clone(),
            None => default,
        }
    }
}

/// Registered event logic.
///
/// Implementations are small, usually stateless structs; the engine
/// calls [`Self::predict_invoke_time`] whenever it needs to know where
/// on the timeline to place the event and [`Self::invoke`] when the
/// event actually fires.
pub trait EventHandler {
    /// Stable identifier used for dedup keys and error messages.
    fn id(&self) -> &str;

    fn trigger_type(&self) -> TriggerType;

    /// Compute the next time this handler should fire for `target`,
    /// given the event last fired (or was created) at `reference`.
    /// Returning [`crate::time::TIME_MIN`] means "never" — the loop
    /// drops the event instead of scheduling it.
    fn predict_invoke_time(
        &self,
        target: &Rc<dyn EventEntity>,
        params: &ParamMap,
        reference: Time,
    ) -> Time;

    /// Run the handler's logic. `loop_` is shared, not exclusive: the
    /// event loop uses interior mutability throughout so a handler can
    /// schedule further events from within its own invocation without
    /// the borrow checker treating that as reentrancy into a `&mut`
    /// call — the Rust analogue of the original's recursive mutex.
    fn invoke(
        &self,
        loop_: &EventLoop,
        target: &Rc<dyn EventEntity>,
        params: &ParamMap,
        state: &SimState,
        at: Time,
    ) -> CoreResult<()>;
}
