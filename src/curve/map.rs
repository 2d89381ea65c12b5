//! `UnorderedMap<K, V>`: a keyed container curve. Each key's binding
//! carries its own alive/dead lifetime, so a query can ask "what was
//! bound to this key at time t" even after the key has been
//! overwritten or killed.

use crate::curve::iter::AliveIter;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, Event, EventEntity};
use crate::time::{Time, TIME_MAX};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

struct MapEntry<V> {
    value: V,
    alive: Time,
    dead: Cell<Time>,
}

pub struct UnorderedMap<K, V> {
    entity: crate::event::EntityCore,
    entries: RefCell<HashMap<K, MapEntry<V>>>,
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> UnorderedMap<K, V> {
    pub fn new(id: usize, idstr: impl Into<String>, notifier: Weak<dyn ChangeNotifier>) -> Rc<Self> {
        Rc::new(Self { entity: crate::event::EntityCore::new(id, idstr, notifier), entries: RefCell::new(HashMap::new()) })
    }

    /// Bind `key` to `value`, alive from `time` onward.
    pub fn insert(&self, time: Time, key: K, value: V) {
        self.entries.borrow_mut().insert(key, MapEntry { value, alive: time, dead: Cell::new(TIME_MAX) });
        self.entity.notify_changes(time);
    }

    /// Alias for [`Self::insert`], matching the vocabulary used
    /// elsewhere for "this binding starts existing now".
    pub fn birth(&self, time: Time, key: K, value: V) {
        self.insert(time, key, value);
    }

    /// Value bound to `key` at `time`, if the binding is alive then.
    pub fn at(&self, time: Time, key: &K) -> Option<V> {
        let entries = self.entries.borrow();
        let entry = entries.get(key)?;
        if entry.alive <= time && entry.dead.get() > time {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Mark `key`'s current binding dead as of `time`, without
    /// removing the entry (a later `at` before `time` still sees it).
    pub fn kill(&self, time: Time, key: &K) {
        if let Some(entry) = self.entries.borrow().get(key) {
            entry.dead.set(time);
        }
        self.entity.notify_changes(time);
    }

    /// Drop entries whose binding died at or before `time`; these can
    /// never again be observed by `at`, so they are safe to forget.
    pub fn clean(&self, time: Time) {
        self.entries.borrow_mut().retain(|_, entry| entry.dead.get() > time);
    }

    /// Every value whose binding overlaps `[start, end)`.
    pub fn between(&self, start: Time, end: Time) -> impl Iterator<Item = V> {
        let snapshot: Vec<(Time, Time, V)> =
            self.entries.borrow().values().map(|e| (e.alive, e.dead.get(), e.value.clone())).collect();
        AliveIter::new(snapshot.into_iter(), start, end)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> EventEntity for UnorderedMap<K, V> {
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
