//! `Queue<T>`: a FIFO container curve. Elements are never physically
//! removed on pop — they are stamped dead at the pop time, so a query
//! at an earlier time still sees them, matching the curve's general
//! "history, not just current state" character.

use crate::curve::iter::AliveIter;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::{Time, TIME_MAX};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

struct QueueEntry<T> {
    alive: Time,
    dead: Cell<Time>,
    value: T,
}

pub struct Queue<T> {
    entity: crate::event::EntityCore,
    entries: RefCell<VecDeque<QueueEntry<T>>>,
}

impl<T: Clone + 'static> Queue<T> {
    pub fn new(id: usize, idstr: impl Into<String>, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { entity: crate::event::EntityCore::new(id, idstr, notifier), entries: RefCell::new(VecDeque::new()) })
    }

    fn first_alive_idx(&self, time: Time) -> Option<usize> {
        self.entries.borrow().iter().position(|e| e.alive <= time && e.dead.get() > time)
    }

    /// The oldest element alive at `time`, without removing it.
    pub fn front(&self, time: Time) -> Option<T> {
        let idx = self.first_alive_idx(time)?;
        Some(self.entries.borrow()[idx].value.clone())
    }

    /// Pop the oldest element alive at `time` by marking it dead as of
    /// `time`. Returns its value, or `None` if nothing is alive.
    pub fn pop_front(&self, time: Time) -> Option<T> {
        let idx = self.first_alive_idx(time)?;
        let value = {
            let entries = self.entries.borrow();
            let entry = &entries[idx];
            entry.dead.set(time);
            entry.value.clone()
        };
        self.entity.notify_changes(time);
        Some(value)
    }

    pub fn empty(&self, time: Time) -> bool {
        self.first_alive_idx(time).is_none()
    }

    /// Insert `value` as alive starting at `time`, keeping the queue
    /// ordered by insertion time.
    pub fn insert(&self, time: Time, value: T) {
        let mut entries = self.entries.borrow_mut();
        let pos = entries.iter().position(|e| e.alive > time).unwrap_or(entries.len());
        entries.insert(pos, QueueEntry { alive: time, dead: Cell::new(TIME_MAX), value });
        drop(entries);
        self.entity.notify_changes(time);
    }

    /// Mark every element alive at `time` as dead as of `time`.
    pub fn clear(&self, time: Time) {
        for entry in self.entries.borrow().iter() {
            if entry.alive <= time && entry.dead.get() > time {
                entry.dead.set(time);
            }
        }
        self.entity.notify_changes(time);
    }

    /// Every element whose lifetime overlaps `[start, end)`, oldest
    /// first.
    pub fn between(&self, start: Time, end: Time) -> impl Iterator<Item = T> {
        let snapshot: Vec<(Time, Time, T)> =
            self.entries.borrow().iter().map(|e| (e.alive, e.dead.get(), e.value.clone())).collect();
        AliveIter::new(snapshot.into_iter(), start, end)
    }
}

impl<T: Clone + 'static> EventEntity for Queue<T> {
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

    fn unobserved() -> Weak<dyn ChangeNotifier> {
        struct Noop;
        impl ChangeNotifier for Noop {
            fn notify_change(&self, _event: Rc<Event>, _at: Time) {}
            fn notify_trigger(&self, _event: Rc<Event>, _at: Time) {}
        }
        Weak::<Noop>::new()
    }

    #[test]
    fn fifo_order_is_preserved() {
        let q = Queue::new(1, "waiting_units", unobserved());
        q.insert(Time::from_secs(0), "a");
        q.insert(Time::from_secs(1), "b");
        assert_eq!(q.pop_front(Time::from_secs(5)), Some("a"));
        assert_eq!(q.pop_front(Time::from_secs(5)), Some("b"));
        assert_eq!(q.pop_front(Time::from_secs(5)), None);
    }

    #[test]
    fn popped_element_still_visible_before_the_pop_time() {
        let q = Queue::new(1, "waiting_units", unobserved());
        q.insert(Time::from_secs(0), "a");
        q.pop_front(Time::from_secs(10));
        assert_eq!(q.front(Time::from_secs(5)), Some("a"));
        assert_eq!(q.front(Time::from_secs(10)), None);
    }
}
