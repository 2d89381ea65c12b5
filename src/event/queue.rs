//! `EventQueue`: the scheduling heap plus the three side sets that
//! hold DEPENDENCY / DEPENDENCY_IMMEDIATELY / TRIGGER events before
//! they are first promoted onto the heap.

use crate::event::entity::EventEntity;
use crate::event::event::Event;
use crate::event::handler::{EventHandler, ParamMap, TriggerType};
use crate::time::Time;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::rc::Rc;

type DedupKey = (usize, String);

struct HeapEntry {
    at: Time,
    event: Rc<Event>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    // Reversed so `BinaryHeap`, a max-heap, pops the earliest time first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at).reverse()
    }
}

/// A pending change notification waiting to be folded into the heap
/// by [`crate::event::EventLoop::update_changes`].
pub struct Change {
    pub event: Rc<Event>,
    pub time: Time,
}

#[derive(Default)]
pub struct EventQueue {
    next_id: Cell<usize>,
    heap: RefCell<BinaryHeap<HeapEntry>>,
    dependency_events: RefCell<HashMap<DedupKey, Rc<Event>>>,
    dependency_immediately_events: RefCell<HashMap<DedupKey, Rc<Event>>>,
    trigger_events: RefCell<HashMap<DedupKey, Rc<Event>>>,
    changes: RefCell<HashMap<DedupKey, Change>>,
    future_changes: RefCell<HashMap<DedupKey, Change>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_event_id(&self) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Create and store a new event for `(target, handler)`. Returns
    /// `None` without storing anything if a DEPENDENCY/REPEAT/ONCE
    /// handler predicts it should never fire.
    pub fn create_event(
        &self,
        target: &Rc<dyn EventEntity>,
        handler: Rc<dyn EventHandler>,
        params: ParamMap,
        reference_time: Time,
    ) -> Option<Rc<Event>> {
        let kind = handler.trigger_type();
        let time = match kind {
            TriggerType::Dependency | TriggerType::Repeat | TriggerType::Once => {
                handler.predict_invoke_time(target, &params, reference_time)
            }
            TriggerType::DependencyImmediately | TriggerType::Trigger => reference_time,
        };
        if matches!(kind, TriggerType::Dependency | TriggerType::Repeat | TriggerType::Once) && time.is_min() {
            return None;
        }

        let id = self.next_event_id();
        let event = Rc::new(Event::new(id, target, handler, params, time));
        match kind {
            TriggerType::Dependency => {
                self.dependency_events.borrow_mut().insert(event.dedup_key(), event.clone());
            }
            TriggerType::DependencyImmediately => {
                self.dependency_immediately_events.borrow_mut().insert(event.dedup_key(), event.clone());
            }
            TriggerType::Trigger => {
                self.trigger_events.borrow_mut().insert(event.dedup_key(), event.clone());
            }
            TriggerType::Repeat | TriggerType::Once => {
                self.heap.borrow_mut().push(HeapEntry { at: time, event: event.clone() });
            }
        }
        Some(event)
    }

    /// Record that `event` changed at `at`. Dedups against any already
    /// pending change for the same (target, handler) pair, keeping
    /// whichever is earlier; changes older than the event's own
    /// `last_change_time` are deferred to the following round.
    pub fn add_change(&self, event: Rc<Event>, at: Time) {
        let key = event.dedup_key();
        if event.last_change_time() < at {
            let mut changes = self.changes.borrow_mut();
            let replace = match changes.get(&key) {
                Some(existing) => at < existing.time,
                None => true,
            };
            if replace {
                changes.insert(key, Change { event: event.clone(), time: at });
            }
        } else {
            self.future_changes.borrow_mut().insert(key, Change { event: event.clone(), time: at });
        }
        event.set_last_change_time(at);
    }

    pub fn take_changes(&self) -> Vec<Change> {
        self.changes.borrow_mut().drain().map(|(_, v)| v).collect()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.borrow().is_empty()
    }

    /// Swap the current and future change sets. Called once after a
    /// `reach_time` call has fully settled, never between rounds of
    /// the same call.
    pub fn swap_changesets(&self) {
        let mut changes = self.changes.borrow_mut();
        let mut future = self.future_changes.borrow_mut();
        std::mem::swap(&mut *changes, &mut *future);
        future.clear();
    }

    /// Place `event` on the main heap at `at`. DEPENDENCY /
    /// DEPENDENCY_IMMEDIATELY / TRIGGER events stay registered in their
    /// side set even after this promotion, since that side set is
    /// their only strong owner and they must be re-promotable on every
    /// subsequent change.
    pub fn enqueue(&self, event: Rc<Event>, at: Time) {
        event.set_time(at);
        self.heap.borrow_mut().push(HeapEntry { at, event });
    }

    /// Reschedule an event already known to the heap (used by REPEAT
    /// handlers after they fire).
    pub fn reenqueue(&self, event: Rc<Event>, at: Time) {
        event.set_time(at);
        self.heap.borrow_mut().push(HeapEntry { at, event });
    }

    /// Cancel `event`; its heap entry (if any) is discarded the next
    /// time it is popped instead of being removed now. Does not remove
    /// `event` from the dependency/trigger side sets — those sets keep
    /// owning it regardless of cancellation state.
    pub fn remove(&self, event: &Rc<Event>, reference_time: Time) {
        event.cancel(reference_time);
    }

    /// Pop the earliest event with `time <= time_until`, skipping
    /// stale heap entries (cancelled, or superseded by a later
    /// reschedule of the same event).
    pub fn take_event(&self, time_until: Time) -> Option<Rc<Event>> {
        loop {
            let ready = matches!(self.heap.borrow().peek(), Some(top) if top.at <= time_until);
            if !ready {
                return None;
            }
            let entry = self.heap.borrow_mut().pop().expect("peeked Some above");
            if entry.event.is_cancelled() || entry.event.time() != entry.at {
                continue;
            }
            return Some(entry.event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::entity::EntityCore;
    use crate::event::state::SimState;
    use crate::time::TIME_ZERO;
    use std::any::Any;

    struct DummyEntity {
        core: EntityCore,
    }
    impl EventEntity for DummyEntity {
        fn entity_id(&self) -> usize { self.core.id() }
        fn entity_idstr(&self) -> &str { self.core.idstr() }
        fn add_dependent(&self, event: Rc<Event>) -> crate::error::CoreResult<()> { self.core.add_dependent(event) }
        fn notify_changes(&self, at: Time) { self.core.notify_changes(at) }
        fn notify_trigger(&self, at: Time) { self.core.notify_trigger(at) }
        fn as_any(&self) -> &dyn Any { self }
    }

    struct OnceHandler;
    impl EventHandler for OnceHandler {
        fn id(&self) -> &str { "once" }
        fn trigger_type(&self) -> TriggerType { TriggerType::Once }
        fn predict_invoke_time(&self, _t: &Rc<dyn EventEntity>, _p: &ParamMap, reference: Time) -> Time { reference }
        fn invoke(&self, _l: &crate::event::loop_::EventLoop, _t: &Rc<dyn EventEntity>, _p: &ParamMap, _s: &SimState, _at: Time) -> crate::error::CoreResult<()> { Ok(()) }
    }

    struct NoNotifier;
    impl crate::event::entity::ChangeNotifier for NoNotifier {
        fn notify_change(&self, _event: Rc<Event>, _at: Time) {}
        fn notify_trigger(&self, _event: Rc<Event>, _at: Time) {}
    }

    fn entity() -> Rc<dyn EventEntity> {
        let notifier: std::rc::Weak<dyn crate::event::entity::ChangeNotifier> = std::rc::Weak::<NoNotifier>::new();
        Rc::new(DummyEntity { core: EntityCore::new(1, "dummy", notifier) })
    }

    #[test]
    fn once_handler_is_pushed_straight_to_heap() {
        let queue = EventQueue::new();
        let target = entity();
        let event = queue.create_event(&target, Rc::new(OnceHandler), ParamMap::new(), TIME_ZERO).unwrap();
        assert!(!queue.is_empty());
        let popped = queue.take_event(TIME_ZERO).unwrap();
        assert_eq!(popped.id(), event.id());
    }

    #[test]
    fn stale_heap_entry_is_skipped() {
        let queue = EventQueue::new();
        let target = entity();
        let event = queue.create_event(&target, Rc::new(OnceHandler), ParamMap::new(), TIME_ZERO).unwrap();
        queue.enqueue(event.clone(), Time::from_secs(5));
        // Original entry at TIME_ZERO is now stale; only the rescheduled one should pop.
        assert!(queue.take_event(TIME_ZERO).is_none());
        let popped = queue.take_event(Time::from_secs(5)).unwrap();
        assert_eq!(popped.id(), event.id());
    }
}
