//! Two counters that bounce a value back and forth, each one's change
//! scheduling the other's next change three time units later, settled
//! in a single `reach_time` call.

use chronoset::curve::Discrete;
use chronoset::error::CoreResult;
use chronoset::event::{EventEntity, EventHandler, EventLoop, EventLoopConfig, ParamMap, SimState, TriggerType};
use chronoset::time::{Time, TIME_ZERO};
use std::rc::Rc;

struct BounceHandler {
    id: String,
    other: Rc<Discrete<i32>>,
    delay: Time,
}

impl EventHandler for BounceHandler {
    fn id(&self) -> &str {
        &self.id
    }

    fn trigger_type(&self) -> TriggerType {
        TriggerType::DependencyImmediately
    }

    fn predict_invoke_time(&self, _target: &Rc<dyn EventEntity>, _params: &ParamMap, reference: Time) -> Time {
        reference
    }

    fn invoke(
        &self,
        _loop_: &EventLoop,
        target: &Rc<dyn EventEntity>,
        _params: &ParamMap,
        _state: &SimState,
        at: Time,
    ) -> CoreResult<()> {
        let source = target.as_any().downcast_ref::<Discrete<i32>>().expect("bounce handler target is always a Discrete<i32>");
        let value = source.get(at);
        println!("t={:>5} | {} hits back, bounce count {}", at, target.entity_idstr(), value);
        self.other.set_insert(at + self.delay, value + 1);
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let loop_ = EventLoop::new(EventLoopConfig::default());
    let paddle_a = Discrete::new(1, "paddle_a", 0, loop_.notifier());
    let paddle_b = Discrete::new(2, "paddle_b", 0, loop_.notifier());

    let delay = Time::from_secs(3);
    let handler_a_to_b = Rc::new(BounceHandler { id: "a_to_b".into(), other: paddle_b.clone(), delay });
    let handler_b_to_a = Rc::new(BounceHandler { id: "b_to_a".into(), other: paddle_a.clone(), delay });

    let a_entity: Rc<dyn EventEntity> = paddle_a.clone();
    let b_entity: Rc<dyn EventEntity> = paddle_b.clone();

    let event_a = loop_.create_event(&a_entity, handler_a_to_b, ParamMap::new(), TIME_ZERO).expect("DependencyImmediately always fires");
    event_a.depend_on(&a_entity).unwrap();

    let event_b = loop_.create_event(&b_entity, handler_b_to_a, ParamMap::new(), TIME_ZERO).expect("DependencyImmediately always fires");
    event_b.depend_on(&b_entity).unwrap();

    // Serve: paddle_a hits first at t=0.
    paddle_a.set_insert(TIME_ZERO, 1);

    let state = SimState::new(());
    loop_.reach_time(Time::from_secs(18), &state).expect("rally settles within the default attempt cap");

    println!(
        "\nfinal state: paddle_a={}, paddle_b={}",
        paddle_a.get(Time::from_secs(18)),
        paddle_b.get(Time::from_secs(18))
    );
}
