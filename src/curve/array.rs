//! `Array<T, N>`: `N` independent discrete channels sharing one
//! dependency list, for grouped per-slot state (e.g. per-weapon
//! cooldowns on a unit) that a single [`super::Discrete`] curve cannot
//! express on its own.

use crate::curve::container::KeyframeContainer;
use crate::curve::keyframe::Keyframe;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::Time;
use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct Array<T, const N: usize> {
    entity: crate::event::EntityCore,
    channels: RefCell<Vec<KeyframeContainer<T>>>,
    hints: RefCell<Vec<usize>>,
}

impl<T: Clone + PartialEq + 'static, const N: usize> Array<T, N> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        let channels = (0..N).map(|_| KeyframeContainer::new(default_value.clone())).collect();
        Rc::new(Self {
            entity: crate::event::EntityCore::new(id, idstr, notifier),
            channels: RefCell::new(channels),
            hints: RefCell::new(vec![0; N]),
        })
    }

    pub const fn len(&self) -> usize {
        N
    }

    /// Value of `channel` at `time`.
    pub fn at(&self, channel: usize, time: Time) -> T {
        let hint = self.hints.borrow()[channel];
        let channels = self.channels.borrow();
        let idx = channels[channel].last(time, hint);
        let value = channels[channel].get(idx).value.clone();
        self.hints.borrow_mut()[channel] = idx;
        value
    }

    /// Write `channel`, discarding any recorded future on that channel
    /// first, matching the single-channel curves' `set_last` semantics.
    pub fn set_insert(&self, channel: usize, time: Time, value: T) {
        let hint = self.hints.borrow()[channel];
        let idx = {
            let mut channels = self.channels.borrow_mut();
            let chan = &mut channels[channel];
            chan.erase_after(hint);
            chan.insert_after(Keyframe::new(time, value), hint)
        };
        self.hints.borrow_mut()[channel] = idx;
        self.entity.notify_changes(time);
    }

    /// Snapshot of every channel's value at `time`.
    pub fn get(&self, time: Time) -> Vec<T> {
        (0..N).map(|c| self.at(c, time)).collect()
    }

    pub fn check_integrity(&self) -> CoreResult<()> {
        for chan in self.channels.borrow().iter() {
            chan.check_integrity()?;
        }
        Ok(())
    }
}

impl<T: Clone + PartialEq + 'static, const N: usize> EventEntity for Array<T, N> {
    fn entity_id(&self) -> usize {
        self.entity.id()
    }
    fn entity_idstr(&self) -> &str {
        self.entity.idstr()
    }
    fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()> {
        self.entity.add_dependent(event)
    }
    fn notify_changes(&self, at: Time) {
        self.entity.notify_changes(at);
    }
    fn notify_trigger(&self, at: Time) {
        self.entity.notify_trigger(at);
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
    fn channels_are_independent() {
        let cooldowns: Rc<Array<f64, 3>> = Array::new(1, "weapon_cooldowns", 0.0, unobserved());
        cooldowns.set_insert(0, Time::from_secs(5), 1.0);
        cooldowns.set_insert(2, Time::from_secs(5), 2.0);
        assert_eq!(cooldowns.at(0, Time::from_secs(10)), 1.0);
        assert_eq!(cooldowns.at(1, Time::from_secs(10)), 0.0);
        assert_eq!(cooldowns.at(2, Time::from_secs(10)), 2.0);
    }

    #[test]
    fn snapshot_collects_every_channel() {
        let slots: Rc<Array<i32, 2>> = Array::new(1, "slots", -1, unobserved());
        slots.set_insert(0, TIME_ZERO, 10);
        slots.set_insert(1, TIME_ZERO, 20);
        assert_eq!(slots.get(Time::from_secs(1)), vec![10, 20]);
    }
}
