//! REPEAT and ONCE are the two trigger kinds that schedule themselves
//! onto the main heap directly rather than waiting in a side set —
//! this exercises their termination and single-invocation contracts.

use chronoset::error::CoreResult;
use chronoset::event::{EntityCore, EventEntity, EventHandler, EventLoop, EventLoopConfig, ParamMap, SimState, TriggerType};
use chronoset::time::{Time, TIME_MIN, TIME_ZERO};
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

struct Counter {
    core: EntityCore,
    value: Cell<i32>,
}
impl EventEntity for Counter {
    fn entity_id(&self) -> usize {
        self.core.id()
    }
    fn entity_idstr(&self) -> &str {
        self.core.idstr()
    }
    fn add_dependent(&self, event: Rc<chronoset::event::Event>) -> CoreResult<()> {
        self.core.add_dependent(event)
    }
    fn notify_changes(&self, at: Time) {
        self.core.notify_changes(at)
    }
    fn notify_trigger(&self, at: Time) {
        self.core.notify_trigger(at)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fires once a second forever, but the loop stops scheduling it past
/// a fixed cutoff by predicting `TIME_MIN` ("never again").
struct RepeatUntil {
    cutoff: Time,
}
impl EventHandler for RepeatUntil {
    fn id(&self) -> &str {
        "repeat_until"
    }
    fn trigger_type(&self) -> TriggerType {
        TriggerType::Repeat
    }
    fn predict_invoke_time(&self, _target: &Rc<dyn EventEntity>, _params: &ParamMap, reference: Time) -> Time {
        let next = reference + Time::from_secs(1);
        if next > self.cutoff {
            TIME_MIN
        } else {
            next
        }
    }
    fn invoke(&self, _loop_: &EventLoop, target: &Rc<dyn EventEntity>, _params: &ParamMap, _state: &SimState, _at: Time) -> CoreResult<()> {
        let counter = target.as_any().downcast_ref::<Counter>().unwrap();
        counter.value.set(counter.value.get() + 1);
        Ok(())
    }
}

#[test]
fn repeat_handler_stops_predicting_past_its_cutoff() {
    let loop_ = EventLoop::new(EventLoopConfig::default());
    let counter: Rc<dyn EventEntity> = Rc::new(Counter { core: EntityCore::new(1, "repeater", loop_.notifier()), value: Cell::new(0) });
    loop_.create_event(&counter, Rc::new(RepeatUntil { cutoff: Time::from_secs(4) }), ParamMap::new(), TIME_ZERO);

    let state = SimState::new(());
    // Ask for far more time than the cutoff allows; the handler must
    // stop itself rather than rely on the target time to cut it off.
    loop_.reach_time(Time::from_secs(1000), &state).unwrap();

    let value = counter.as_any().downcast_ref::<Counter>().unwrap().value.get();
    assert_eq!(value, 4);
    assert!(loop_.is_idle());
}

struct OnceHandler;
impl EventHandler for OnceHandler {
    fn id(&self) -> &str {
        "once"
    }
    fn trigger_type(&self) -> TriggerType {
        TriggerType::Once
    }
    fn predict_invoke_time(&self, _target: &Rc<dyn EventEntity>, _params: &ParamMap, reference: Time) -> Time {
        reference
    }
    fn invoke(&self, _loop_: &EventLoop, target: &Rc<dyn EventEntity>, _params: &ParamMap, _state: &SimState, _at: Time) -> CoreResult<()> {
        let counter = target.as_any().downcast_ref::<Counter>().unwrap();
        counter.value.set(counter.value.get() + 1);
        Ok(())
    }
}

#[test]
fn once_handler_fires_a_single_time_even_after_repeated_changes() {
    let loop_ = EventLoop::new(EventLoopConfig::default());
    let counter: Rc<dyn EventEntity> = Rc::new(Counter { core: EntityCore::new(1, "once_target", loop_.notifier()), value: Cell::new(0) });
    let event = loop_.create_event(&counter, Rc::new(OnceHandler), ParamMap::new(), Time::from_secs(5)).unwrap();
    event.depend_on(&counter).unwrap();

    // Notify the same dependent multiple times before it ever runs.
    counter.notify_changes(TIME_ZERO);
    counter.notify_changes(Time::from_secs(1));
    counter.notify_changes(Time::from_secs(2));

    let state = SimState::new(());
    loop_.reach_time(Time::from_secs(10), &state).unwrap();
    assert_eq!(counter.as_any().downcast_ref::<Counter>().unwrap().value.get(), 1);

    // A further notification after it already fired (and was dropped
    // from the dependent list) has no effect.
    counter.notify_changes(Time::from_secs(9));
    loop_.reach_time(Time::from_secs(20), &state).unwrap();
    assert_eq!(counter.as_any().downcast_ref::<Counter>().unwrap().value.get(), 1);
}
