//! Opaque simulation state passed through to handler invocations.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// A type-erased handle to whatever the host application's gamestate
/// object is.
///
/// The event loop never interprets this data; it only threads it
/// through to [`crate::event::EventHandler::invoke`], which downcasts
/// it back to the concrete type the host registered.
#[derive(Clone)]
pub struct SimState(Rc<RefCell<dyn Any>>);

impl SimState {
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Borrow the underlying state, downcast to `T`, and hand it to
    /// `f`. Panics if `T` does not match the type the state was
    /// constructed with, mirroring a failed `dynamic_pointer_cast` in
    /// the original.
    pub fn with<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let borrow = self.0.borrow();
        let value = borrow.downcast_ref::<T>().expect("SimState type mismatch");
        f(value)
    }

    pub fn with_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut borrow = self.0.borrow_mut();
        let value = borrow.downcast_mut::<T>().expect("SimState type mismatch");
        f(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_mut_sees_prior_writes() {
        let state = SimState::new(0i32);
        state.with_mut(|v: &mut i32| *v += 1);
        state.with_mut(|v: &mut i32| *v += 1);
        assert_eq!(state.with(|v: &i32| *v), 2);
    }
}
