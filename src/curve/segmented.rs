//! `Segmented<T>`: like [`super::Continuous`], but permits explicit
//! jumps by writing two keyframes at the same timestamp — the curve
//! interpolates within each segment and snaps at the shared boundary.

use crate::curve::core::CurveCore;
use crate::curve::interpolate::Interpolatable;
use crate::curve::keyframe::Keyframe;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::Time;
use std::any::Any;
use std::rc::{Rc, Weak};

pub struct Segmented<T> {
    core: CurveCore<T>,
}

impl<T: Interpolatable + PartialEq + 'static> Segmented<T> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { core: CurveCore::new(id, idstr, default_value, notifier) })
    }

    /// Same interpolation rule as [`super::Continuous::get`]: linear
    /// between the bracketing keyframes, exact at the edges.
    pub fn get(&self, time: Time) -> T {
        let hint = self.core.last_element();
        let (idx, value) = {
            let c = self.core.container();
            let e = c.last(time, hint);
            let nxt = e + 1;
            let value = if nxt == c.len() {
                c.get(e).value.clone()
            } else {
                let interval = c.get(nxt).time - c.get(e).time;
                let offset = time - c.get(e).time;
                if offset.raw() == 0 || interval.raw() == 0 {
                    c.get(e).value.clone()
                } else {
                    let frac = offset / interval;
                    c.get(e).value.lerp(&c.get(nxt).value, frac)
                }
            };
            (e, value)
        };
        self.core.set_last_element(idx);
        value
    }

    pub fn set_insert(&self, time: Time, value: T) {
        self.core.set_insert(time, value);
    }

    pub fn set_last(&self, time: Time, value: T) {
        self.core.set_last(time, value);
    }

    pub fn set_replace(&self, time: Time, value: T) {
        self.core.set_replace(time, value);
    }

    /// Write a discontinuous jump at `at`: the curve approaches `left`
    /// from before `at` and `right` from `at` onward, without
    /// disturbing any keyframes beyond `at`.
    pub fn set_insert_jump(&self, at: Time, left: T, right: T) {
        let hint = self.core.last_element();
        let idx_right = {
            let mut c = self.core.container_mut();
            let idx_left = c.insert_overwrite(Keyframe::new(at, left), hint, true);
            c.insert_after(Keyframe::new(at, right), idx_left)
        };
        self.core.set_last_element(idx_right);
        self.core.notify_changes(at);
    }

    /// Like [`Self::set_insert_jump`] but also discards every keyframe
    /// after the cached hint first, matching [`CurveCore::set_last`]'s
    /// "overwrite the future" semantics.
    pub fn set_last_jump(&self, at: Time, left: T, right: T) {
        let hint = self.core.last_element();
        let idx_right = {
            let mut c = self.core.container_mut();
            c.erase_after(hint);
            let idx_left = c.insert_before(Keyframe::new(at, left), hint);
            c.insert_after(Keyframe::new(at, right), idx_left)
        };
        self.core.set_last_element(idx_right);
        self.core.notify_changes(at);
    }

    pub fn erase(&self, time: Time) {
        self.core.erase(time);
    }

    pub fn check_integrity(&self) -> CoreResult<()> {
        self.core.check_integrity()
    }

    pub fn sync(&self, other: &Segmented<T>, start: Time) {
        self.core.sync_from(&other.core, start);
    }
}

impl<T: Interpolatable + PartialEq + 'static> EventEntity for Segmented<T> {
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
    fn jump_snaps_to_the_right_side_value_at_the_boundary() {
        let curve = Segmented::new(1, "hp", 100.0f64, unobserved());
        curve.set_insert(TIME_ZERO, 100.0);
        curve.set_insert_jump(Time::from_secs(10), 50.0, 0.0);
        curve.set_insert(Time::from_secs(20), 100.0);
        assert_eq!(curve.get(TIME_ZERO), 100.0);
        // Querying exactly at the jump returns the post-jump (right) value.
        assert_eq!(curve.get(Time::from_secs(10)), 0.0);
        assert!((curve.get(Time::from_secs(15)) - 50.0).abs() < 1e-9);
    }
}
