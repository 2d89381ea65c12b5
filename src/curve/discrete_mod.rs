//! `DiscreteMod<T>`: a [`super::Discrete`] curve whose query time wraps
//! cyclically around the span of recorded keyframes — for repeating
//! schedules (patrol routes, day/night cycles) rather than open-ended
//! histories.

use crate::curve::core::CurveCore;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::{Time, TIME_ZERO};
use std::any::Any;
use std::cell::Cell;
use std::rc::{Rc, Weak};

pub struct DiscreteMod<T> {
    core: CurveCore<T>,
    time_length: Cell<Time>,
}

impl<T: Clone + PartialEq + 'static> DiscreteMod<T> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { core: CurveCore::new(id, idstr, default_value, notifier), time_length: Cell::new(TIME_ZERO) })
    }

    fn recompute_length(&self) {
        let last_time = self.core.container().iter().last().map(|kf| kf.time).unwrap_or(TIME_ZERO);
        self.time_length.set(last_time);
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

    /// Query at `time`, wrapped into `[start, start + time_length)`.
    /// If nothing has been recorded yet (`time_length == 0`), falls
    /// back to the value at the origin instead of dividing by zero.
    pub fn get_mod(&self, time: Time, start: Time) -> T {
        let interval_length = self.time_length.get();
        if interval_length.raw() == 0 {
            return self.get(TIME_ZERO);
        }
        let elapsed = time - start;
        self.get(elapsed % interval_length)
    }

    pub fn set_last(&self, time: Time, value: T) {
        self.core.set_last(time, value);
        self.recompute_length();
    }

    pub fn set_insert(&self, time: Time, value: T) {
        self.core.set_insert(time, value);
        self.recompute_length();
    }

    pub fn set_replace(&self, time: Time, value: T) {
        self.core.set_replace(time, value);
        self.recompute_length();
    }

    pub fn erase(&self, time: Time) {
        self.core.erase(time);
        self.recompute_length();
    }

    pub fn time_length(&self) -> Time {
        self.time_length.get()
    }

    pub fn check_integrity(&self) -> CoreResult<()> {
        self.core.check_integrity()
    }
}

impl<T: Clone + PartialEq + 'static> EventEntity for DiscreteMod<T> {
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

    fn unobserved() -> Weak<dyn ChangeNotifier> {
        struct Noop;
        impl ChangeNotifier for Noop {
            fn notify_change(&self, _event: Rc<Event>, _at: Time) {}
            fn notify_trigger(&self, _event: Rc<Event>, _at: Time) {}
        }
        Weak::<Noop>::new()
    }

    #[test]
    fn wraps_queries_into_the_recorded_span() {
        let patrol = DiscreteMod::new(1, "patrol", "idle", unobserved());
        patrol.set_insert(Time::from_secs(0), "point_a");
        patrol.set_insert(Time::from_secs(5), "point_b");
        patrol.set_insert(Time::from_secs(10), "point_c");
        assert_eq!(patrol.get_mod(Time::from_secs(12), TIME_ZERO), patrol.get_mod(Time::from_secs(2), TIME_ZERO));
    }

    #[test]
    fn empty_curve_falls_back_to_origin_value() {
        let patrol: Rc<DiscreteMod<&str>> = DiscreteMod::new(1, "patrol", "idle", unobserved());
        assert_eq!(patrol.get_mod(Time::from_secs(99), TIME_ZERO), "idle");
    }
}
