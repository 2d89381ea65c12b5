//! `Continuous<T>`: a curve that linearly interpolates between
//! keyframes, always returning a value that varies smoothly as `t`
//! advances (no jumps — see [`super::Segmented`] for those).

use crate::curve::core::CurveCore;
use crate::curve::interpolate::Interpolatable;
use crate::curve::keyframe::Keyframe;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::Time;
use std::any::Any;
use std::rc::{Rc, Weak};

pub struct Continuous<T> {
    core: CurveCore<T>,
}

impl<T: Interpolatable + PartialEq + 'static> Continuous<T> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { core: CurveCore::new(id, idstr, default_value, notifier) })
    }

    /// Interpolated value at `time`. Falls back to the exact keyframe
    /// value (no division) when there is no following keyframe, or
    /// the two bracketing keyframes share a timestamp.
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

    /// Replace or insert a keyframe without disturbing the future.
    /// Aliased to `set_replace` rather than a raw insert-after so a
    /// repeated write at the same instant does not introduce a
    /// spurious jump.
    pub fn set_insert(&self, time: Time, value: T) {
        self.core.set_replace(time, value);
    }

    pub fn set_last(&self, time: Time, value: T) {
        self.core.set_last(time, value);
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

    pub fn sync(&self, other: &Continuous<T>, start: Time) {
        self.core.sync_from(&other.core, start);
    }

    /// Drop every interior keyframe after `start` whose value is
    /// already reproduced by interpolating between its neighbors,
    /// shrinking a long recorded history without changing `get` for
    /// any time in range.
    pub fn compress(&self, start: Time)
    where
        T: PartialEq,
    {
        let mut c = self.core.container_mut();
        let first = c.last_before(start, 0);
        let all: Vec<Keyframe<T>> = c.iter().skip(first).cloned().collect();
        if all.len() < 3 {
            return;
        }
        let mut kept = vec![all[0].clone()];
        for window in all.windows(3) {
            let (prev_kept, candidate, next) = (kept.last().unwrap(), &window[1], &window[2]);
            let interval = next.time - prev_kept.time;
            let offset = candidate.time - prev_kept.time;
            let reproduced = if interval.raw() == 0 {
                prev_kept.value == candidate.value
            } else {
                let frac = offset / interval;
                prev_kept.value.lerp(&next.value, frac) == candidate.value
            };
            if !reproduced {
                kept.push(candidate.clone());
            }
        }
        kept.push(all.last().unwrap().clone());
        c.erase_after(first);
        for kf in kept.into_iter().skip(1) {
            c.insert_after(kf, first);
        }
    }
}

impl<T: Interpolatable + PartialEq + 'static> EventEntity for Continuous<T> {
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
    fn interpolates_linearly_between_keyframes() {
        let curve = Continuous::new(1, "pos", 0.0f64, unobserved());
        curve.set_insert(Time::from_secs(0), 0.0);
        curve.set_insert(Time::from_secs(10), 100.0);
        assert!((curve.get(Time::from_secs(5)) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn holds_last_value_past_final_keyframe() {
        let curve = Continuous::new(1, "pos", 0.0f64, unobserved());
        curve.set_insert(Time::from_secs(0), 0.0);
        curve.set_insert(Time::from_secs(10), 100.0);
        assert_eq!(curve.get(Time::from_secs(50)), 100.0);
    }

    #[test]
    fn compress_drops_keyframes_reproducible_by_interpolation() {
        let curve = Continuous::new(1, "pos", 0.0f64, unobserved());
        curve.set_insert(Time::from_secs(0), 0.0);
        curve.set_insert(Time::from_secs(5), 50.0); // exactly on the line 0->100
        curve.set_insert(Time::from_secs(10), 100.0);
        curve.compress(TIME_ZERO);
        // The t=5 keyframe is redundant; only the sentinel, t=0 and t=10 remain.
        assert_eq!(curve.core.container().len(), 3);
    }
}
