//! `EventEntity`: anything that can be the target of a dependency and
//! notify its dependents when it changes.

use crate::error::{CoreError, CoreResult};
use crate::event::event::Event;
use crate::event::handler::TriggerType;
use crate::time::Time;
use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Callback surface an [`EventEntity`] uses to hand a changed or
/// triggered dependent back to the loop that owns it.
///
/// Implemented by [`crate::event::EventLoop`]; kept as a trait (rather
/// than a concrete type) so curve types do not need to depend on the
/// loop's full definition.
pub trait ChangeNotifier {
    fn notify_change(&self, event: Rc<Event>, at: Time);
    fn notify_trigger(&self, event: Rc<Event>, at: Time);
}

/// Anything that can be depended on by events: curves, container
/// curves, and any host-defined gamestate object that participates in
/// the dependency graph.
pub trait EventEntity: Any {
    fn entity_id(&self) -> usize;
    fn entity_idstr(&self) -> &str;

    /// Register `event` as a dependent. Fails for handlers of kind
    /// TRIGGER or REPEAT, which do not participate in change
    /// notification.
    fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()>;

    /// Notify DEPENDENCY / DEPENDENCY_IMMEDIATELY / ONCE dependents
    /// that this entity changed at `at`. ONCE dependents are removed
    /// from the list after being notified.
    fn notify_changes(&self, at: Time);

    /// Notify only TRIGGER dependents, with the last time at which
    /// this entity was known to be valid.
    fn notify_trigger(&self, last_valid: Time);

    fn as_any(&self) -> &dyn Any;
}

/// Shared bookkeeping for an `EventEntity` implementation: the
/// dependent list and a weak handle back to the notifier (event loop)
/// that routes changes onward.
///
/// Curve and container-curve types embed one of these and delegate
/// their `EventEntity` methods to it.
pub struct EntityCore {
    id: usize,
    idstr: String,
    dependents: RefCell<Vec<Weak<Event>>>,
    notifier: Weak<dyn ChangeNotifier>,
}

impl EntityCore {
    pub fn new(id: usize, idstr: impl Into<String>, notifier: Weak<dyn ChangeNotifier>) -> Self {
        Self { id, idstr: idstr.into(), dependents: RefCell::new(Vec::new()), notifier }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn idstr(&self) -> &str {
        &self.idstr
    }

    pub fn add_dependent(&self, event: Rc<Event>) -> CoreResult<()> {
        let kind = event.handler().trigger_type();
        if matches!(kind, TriggerType::Trigger | TriggerType::Repeat) {
            return Err(CoreError::InvalidDependent {
                handler_id: event.handler().id().to_string(),
                kind,
            });
        }
        self.dependents.borrow_mut().push(Rc::downgrade(&event));
        Ok(())
    }

    pub fn notify_changes(&self, at: Time) {
        let notifier = match self.notifier.upgrade() {
            Some(n) => n,
            None => return,
        };
        self.dependents.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(event) => {
                match event.handler().trigger_type() {
                    TriggerType::Dependency | TriggerType::DependencyImmediately => {
                        notifier.notify_change(event, at);
                        true
                    }
                    TriggerType::Once => {
                        notifier.notify_change(event, at);
                        false
                    }
                    TriggerType::Trigger | TriggerType::Repeat => true,
                }
            }
            None => false,
        });
    }

    pub fn notify_trigger(&self, last_valid: Time) {
        let notifier = match self.notifier.upgrade() {
            Some(n) => n,
            None => return,
        };
        for weak in self.dependents.borrow().iter() {
            if let Some(event) = weak.upgrade() {
                if event.handler().trigger_type() == TriggerType::Trigger {
                    notifier.notify_trigger(event, last_valid);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn dependent_count(&self) -> usize {
        self.dependents.borrow().len()
    }
}
