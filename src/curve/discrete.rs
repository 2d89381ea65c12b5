//! `Discrete<T>`: a curve with no interpolation — the value at `t` is
//! whatever the most recent keyframe at or before `t` holds.

use crate::curve::core::CurveCore;
#[cfg(test)]
use crate::curve::keyframe::Keyframe;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::Time;
use std::any::Any;
use std::rc::{Rc, Weak};

pub struct Discrete<T> {
    core: CurveCore<T>,
}

impl<T: Clone + PartialEq + 'static> Discrete<T> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { core: CurveCore::new(id, idstr, default_value, notifier) })
    }

    pub fn get(&self, time: Time) -> T {
        let hint = self.core.last_element();
        let (idx, value) = {
            let c = self.core.container();
            let idx = c.last(time, hint);
            (idx, c.get(idx).value.clone())
        };
        self.core.set_last_element(idx);
        value
    }

    /// The value immediately before the keyframe active at `time`, or
    /// `None` if `time` falls within the sentinel's range.
    pub fn get_previous(&self, time: Time) -> Option<T> {
        let hint = self.core.last_element();
        let c = self.core.container();
        let idx = c.last(time, hint);
        if idx == 0 {
            None
        } else {
            Some(c.get(idx - 1).value.clone())
        }
    }

    pub fn set_last(&self, time: Time, value: T) {
        self.core.set_last(time, value);
    }

    pub fn set_insert(&self, time: Time, value: T) {
        self.core.set_insert(time, value);
    }

    pub fn set_replace(&self, time: Time, value: T) {
        self.core.set_replace(time, value);
    }

    pub fn erase(&self, time: Time) {
        self.core.erase(time);
    }

    pub fn check_integrity(&self) -> CoreResult<()> {
        self.core.check_integrity()
    }

    pub fn sync(&self, other: &Discrete<T>, start: Time) {
        self.core.sync_from(&other.core, start);
    }

    #[cfg(test)]
    fn keyframes(&self) -> Vec<Keyframe<T>> {
        self.core.container().iter().cloned().collect()
    }
}

impl<T: Clone + PartialEq + 'static> EventEntity for Discrete<T> {
    fn entity_id(&self) -> usize {
        self.core.id()
    }
    fn entity_idstr(&self) -> &str {
        self.core.idstr()
    }
    fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()> {
        self.core.add_dependent(event)
    }
    fn notify_changes(&self, at: Time) {
        self.core.notify_changes(at);
    }
    fn notify_trigger(&self, at: Time) {
        self.core.notify_trigger(at);
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TIME_ZERO;

    fn unobserved() -> Weak<dyn ChangeNotifier> {
        struct Noop;
        impl ChangeNotifier for Noop {
            fn notify_change(&self, _event: Rc<Event>, _at: Time) {}
            fn notify_trigger(&self, _event: Rc<Event>, _at: Time) {}
        }
        Weak::<Noop>::new()
    }

    #[test]
    fn get_holds_last_value_between_keyframes() {
        let curve = Discrete::new(1, "hp", 100, unobserved());
        curve.set_insert(Time::from_secs(10), 80);
        curve.set_insert(Time::from_secs(20), 60);
        assert_eq!(curve.get(TIME_ZERO), 100);
        assert_eq!(curve.get(Time::from_secs(15)), 80);
        assert_eq!(curve.get(Time::from_secs(25)), 60);
    }

    #[test]
    fn set_last_discards_future_keyframes() {
        let curve = Discrete::new(1, "hp", 100, unobserved());
        curve.set_insert(Time::from_secs(10), 80);
        curve.set_insert(Time::from_secs(20), 60);
        curve.set_last(Time::from_secs(5), 90);
        assert_eq!(curve.keyframes().len(), 2); // sentinel + the new keyframe
        assert_eq!(curve.get(Time::from_secs(100)), 90);
    }

    #[test]
    fn get_previous_steps_back_one_keyframe() {
        let curve = Discrete::new(1, "hp", 100, unobserved());
        curve.set_insert(Time::from_secs(10), 80);
        assert_eq!(curve.get_previous(TIME_ZERO), None);
        assert_eq!(curve.get_previous(Time::from_secs(10)), Some(100));
    }
}
