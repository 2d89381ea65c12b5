//! `EventLoop`: settles a simulation forward to a target time by
//! alternately folding pending changes into the schedule and executing
//! whatever is now due, until a round produces no new executions.

use crate::error::{CoreError, CoreResult};
use crate::event::entity::{ChangeNotifier, EventEntity};
use crate::event::event::Event;
use crate::event::handler::{EventHandler, ParamMap, TriggerType};
use crate::event::queue::EventQueue;
use crate::event::state::SimState;
use crate::time::Time;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Tunables for [`EventLoop::reach_time`].
///
/// This is a plain struct, not a file- or env-backed configuration
/// layer: the crate is a simulation core embedded in a host
/// application, not a standalone service, so there is nothing to read
/// configuration *from*.
#[derive(Clone, Copy, Debug)]
pub struct EventLoopConfig {
    /// Settling rounds allowed per `reach_time` call before it is
    /// considered non-convergent and reported as a fatal error. A
    /// well-formed dependency graph settles in one or two rounds; this
    /// cap only exists to catch a pathological or cyclic handler setup
    /// instead of spinning forever.
    pub max_attempts: u32,
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self { max_attempts: 10 }
    }
}

/// The scheduler. Holds the event queue and the registry of handlers
/// by id; all mutation happens through interior mutability so the
/// loop can be shared (`Rc<EventLoop>`) with the curves and container
/// curves that need to notify it of changes.
pub struct EventLoop {
    queue: EventQueue,
    handlers: RefCell<HashMap<String, Rc<dyn EventHandler>>>,
    config: EventLoopConfig,
}

impl EventLoop {
    pub fn new(config: EventLoopConfig) -> Rc<Self> {
        Rc::new(Self { queue: EventQueue::new(), handlers: RefCell::new(HashMap::new()), config })
    }

    /// A weak handle curves and container curves store so they can
    /// route their own change notifications back here without holding
    /// a strong (cycle-forming) reference to the loop.
    pub fn notifier(self: &Rc<Self>) -> std::rc::Weak<dyn ChangeNotifier> {
        let trait_obj: Rc<dyn ChangeNotifier> = self.clone();
        Rc::downgrade(&trait_obj)
    }

    pub fn add_event_handler(&self, handler: Rc<dyn EventHandler>) {
        self.handlers.borrow_mut().insert(handler.id().to_string(), handler);
    }

    pub fn handler(&self, id: &str) -> CoreResult<Rc<dyn EventHandler>> {
        self.handlers
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownHandler { id: id.to_string() })
    }

    /// Register a new event for `(target, handler)`. Returns `None`
    /// if the handler predicts it should never fire.
    pub fn create_event(
        &self,
        target: &Rc<dyn EventEntity>,
        handler: Rc<dyn EventHandler>,
        params: ParamMap,
        reference_time: Time,
    ) -> Option<Rc<Event>> {
        self.queue.create_event(target, handler, params, reference_time)
    }

    /// Record that `event`'s target changed at `at`.
    pub fn create_change(&self, event: Rc<Event>, at: Time) {
        self.queue.add_change(event, at);
    }

    /// Fold every pending change into the schedule: DEPENDENCY and
    /// ONCE events are re-predicted from the change time and either
    /// enqueued at their new time or dropped if that prediction is
    /// `TIME_MIN`; TRIGGER and DEPENDENCY_IMMEDIATELY events are
    /// enqueued at the change time directly. REPEAT events reschedule
    /// themselves only inside `execute_events`, so they are ignored
    /// here entirely.
    pub fn update_changes(&self) {
        for change in self.queue.take_changes() {
            let target = match change.event.target() {
                Some(t) => t,
                None => {
                    self.queue.remove(&change.event, change.time);
                    continue;
                }
            };
            match change.event.handler().trigger_type() {
                TriggerType::Once | TriggerType::Dependency => {
                    let next = change.event.handler().predict_invoke_time(&target, change.event.params(), change.time);
                    if next.is_min() {
                        self.queue.remove(&change.event, change.time);
                    } else {
                        self.queue.enqueue(change.event.clone(), next);
                    }
                }
                TriggerType::Trigger | TriggerType::DependencyImmediately => {
                    self.queue.enqueue(change.event.clone(), change.time);
                }
                TriggerType::Repeat => {}
            }
        }
    }

    /// Run every event due at or before `time_until`, in time order.
    /// Returns how many actually executed (a target that has expired
    /// in the meantime is silently skipped and does not count).
    pub fn execute_events(&self, time_until: Time, state: &SimState) -> CoreResult<u32> {
        let mut count = 0u32;
        while let Some(event) = self.queue.take_event(time_until) {
            let target = match event.target() {
                Some(t) => t,
                None => {
                    log::debug!("event {} skipped: target expired", event.id());
                    continue;
                }
            };
            let at = event.time();
            let handler = event.handler().clone();
            log::trace!("invoking handler {:?} on entity {} at {}", handler.id(), target.entity_id(), at);
            handler.invoke(self, &target, event.params(), state, at)?;
            count += 1;
            if handler.trigger_type() == TriggerType::Repeat {
                let next = handler.predict_invoke_time(&target, event.params(), at);
                if !next.is_min() {
                    self.queue.reenqueue(event.clone(), next);
                }
            }
        }
        Ok(count)
    }

    /// Advance the simulation to `time_until`.
    ///
    /// Repeatedly folds pending changes into the schedule and executes
    /// whatever becomes due, until a round executes nothing. Each
    /// executed event may itself produce further changes (a curve
    /// write notifying its dependents), so convergence is not
    /// guaranteed in one pass; it is capped at
    /// [`EventLoopConfig::max_attempts`] rounds, after which a
    /// non-converging dependency graph is reported as fatal rather
    /// than looping forever.
    pub fn reach_time(&self, time_until: Time, state: &SimState) -> CoreResult<()> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            if attempts > self.config.max_attempts {
                return Err(CoreError::SettlingThresholdExceeded { attempts, target: time_until });
            }
            self.update_changes();
            let executed = self.execute_events(time_until, state)?;
            log::debug!("reach_time attempt {attempts}: executed {executed} event(s)");
            if executed == 0 {
                break;
            }
        }
        self.queue.swap_changesets();
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && !self.queue.has_pending_changes()
    }
}

impl ChangeNotifier for EventLoop {
    fn notify_change(&self, event: Rc<Event>, at: Time) {
        self.queue.add_change(event, at);
    }

    fn notify_trigger(&self, event: Rc<Event>, at: Time) {
        self.queue.add_change(event, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::entity::EntityCore;
    use crate::time::TIME_ZERO;
    use std::any::Any;
    use std::cell::Cell as StdCell;

    struct Counter {
        core: EntityCore,
        value: StdCell<i32>,
    }
    impl EventEntity for Counter {
        fn entity_id(&self) -> usize { self.core.id() }
        fn entity_idstr(&self) -> &str { self.core.idstr() }
        fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()> { self.core.add_dependent(event) }
        fn notify_changes(&self, at: Time) { self.core.notify_changes(at) }
        fn notify_trigger(&self, at: Time) { self.core.notify_trigger(at) }
        fn as_any(&self) -> &dyn Any { self }
    }

    struct TickHandler;
    impl EventHandler for TickHandler {
        fn id(&self) -> &str { "tick" }
        fn trigger_type(&self) -> TriggerType { TriggerType::Repeat }
        fn predict_invoke_time(&self, _t: &Rc<dyn EventEntity>, _p: &ParamMap, reference: Time) -> Time {
            reference + Time::from_secs(1)
        }
        fn invoke(&self, _loop_: &EventLoop, target: &Rc<dyn EventEntity>, _p: &ParamMap, _s: &SimState, _at: Time) -> CoreResult<()> {
            let counter = target.as_any().downcast_ref::<Counter>().unwrap();
            counter.value.set(counter.value.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn repeat_handler_fires_once_per_second_up_to_target() {
        let loop_ = EventLoop::new(EventLoopConfig::default());
        let counter: Rc<dyn EventEntity> = Rc::new(Counter {
            core: EntityCore::new(1, "counter", loop_.notifier()),
            value: StdCell::new(0),
        });
        loop_.create_event(&counter, Rc::new(TickHandler), ParamMap::new(), TIME_ZERO);
        let state = SimState::new(());
        loop_.reach_time(Time::from_secs(5), &state).unwrap();
        let counter_ref = counter.as_any().downcast_ref::<Counter>().unwrap();
        // First tick lands at t=1 (predicted from reference t=0), then
        // every second through t=5: five firings in total.
        assert_eq!(counter_ref.value.get(), 5);
    }

    #[test]
    fn non_converging_graph_is_reported_as_fatal() {
        // A handler that, every time it fires, nudges its own
        // dependency entity forward by one mantissa unit and depends
        // on it again — an artificial but legitimate way to keep
        // `reach_time` busy past its settling cap.
        struct LoopingHandler;
        impl EventHandler for LoopingHandler {
            fn id(&self) -> &str { "loop" }
            fn trigger_type(&self) -> TriggerType { TriggerType::Dependency }
            fn predict_invoke_time(&self, _t: &Rc<dyn EventEntity>, _p: &ParamMap, reference: Time) -> Time { reference }
            fn invoke(&self, _loop_: &EventLoop, target: &Rc<dyn EventEntity>, _p: &ParamMap, _s: &SimState, at: Time) -> CoreResult<()> {
                target.notify_changes(at + Time::from_raw(1));
                Ok(())
            }
        }
        let loop_ = EventLoop::new(EventLoopConfig { max_attempts: 3 });
        let entity: Rc<dyn EventEntity> = Rc::new(Counter {
            core: EntityCore::new(1, "looper", loop_.notifier()),
            value: StdCell::new(0),
        });
        let handler: Rc<dyn EventHandler> = Rc::new(LoopingHandler);
        let event = loop_.create_event(&entity, handler.clone(), ParamMap::new(), TIME_ZERO).unwrap();
        event.depend_on(&entity).unwrap();
        entity.notify_changes(TIME_ZERO);
        let state = SimState::new(());
        let result = loop_.reach_time(Time::from_secs(100), &state);
        assert!(result.is_err());
    }
}
