//! `CurveCore<T>`: the state and mutators shared by every curve
//! variant (Discrete, Continuous, Segmented, DiscreteMod).
//!
//! Rather than a deep inheritance tree, each variant is a thin wrapper
//! that composes one of these and exposes only the query/mutation
//! methods that make sense for its own interpolation behavior (see
//! DESIGN.md for why).

use crate::curve::keyframe::Keyframe;
use crate::error::CoreResult;
use crate::event::{ChangeNotifier, EntityCore, Event};
use crate::time::Time;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::container::KeyframeContainer;

pub struct CurveCore<T> {
    entity: EntityCore,
    container: RefCell<KeyframeContainer<T>>,
    last_element: Cell<usize>,
}

impl<T: Clone> CurveCore<T> {
    pub fn new(id: usize, idstr: impl Into<String>, default_value: T, notifier: Weak<dyn ChangeNotifier>) -> Self {
        Self {
            entity: EntityCore::new(id, idstr, notifier),
            container: RefCell::new(KeyframeContainer::new(default_value)),
            last_element: Cell::new(0),
        }
    }

    pub fn id(&self) -> usize {
        self.entity.id()
    }

    pub fn idstr(&self) -> &str {
        self.entity.idstr()
    }

    pub fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()> {
        self.entity.add_dependent(event)
    }

    pub fn notify_changes(&self, at: Time) {
        self.entity.notify_changes(at);
    }

    pub fn notify_trigger(&self, at: Time) {
        self.entity.notify_trigger(at);
    }

    pub fn container(&self) -> Ref<'_, KeyframeContainer<T>> {
        self.container.borrow()
    }

    pub fn container_mut(&self) -> RefMut<'_, KeyframeContainer<T>> {
        self.container.borrow_mut()
    }

    pub fn last_element(&self) -> usize {
        self.last_element.get()
    }

    pub fn set_last_element(&self, idx: usize) {
        self.last_element.set(idx);
    }

    /// Overwrite the future: drop every keyframe after the cached
    /// hint, then insert the new keyframe ahead of any remaining
    /// same-time siblings.
    pub fn set_last(&self, time: Time, value: T) {
        let hint = self.last_element.get();
        let idx = {
            let mut c = self.container.borrow_mut();
            c.erase_after(hint);
            c.insert_before(Keyframe::new(time, value), hint)
        };
        self.last_element.set(idx);
        self.notify_changes(time);
    }

    /// Insert a keyframe without disturbing existing future keyframes.
    pub fn set_insert(&self, time: Time, value: T) {
        let hint = self.last_element.get();
        let idx = self.container.borrow_mut().insert_after(Keyframe::new(time, value), hint);
        self.last_element.set(idx);
        self.notify_changes(time);
    }

    /// Overwrite a single existing keyframe at `time`, or insert one
    /// if none exists yet.
    pub fn set_replace(&self, time: Time, value: T) {
        let hint = self.last_element.get();
        let idx = self.container.borrow_mut().insert_overwrite(Keyframe::new(time, value), hint, false);
        self.last_element.set(idx);
        self.notify_changes(time);
    }

    pub fn erase(&self, time: Time) {
        let hint = self.last_element.get();
        let idx = self.container.borrow_mut().erase_at(time, hint);
        self.last_element.set(idx);
        self.notify_changes(time);
    }

    pub fn check_integrity(&self) -> CoreResult<()> {
        self.container.borrow().check_integrity()
    }

    pub fn sync_from(&self, other: &CurveCore<T>, start: Time) {
        self.container.borrow_mut().sync(&other.container.borrow(), start);
        self.last_element.set(0);
        self.notify_changes(start);
    }
}
