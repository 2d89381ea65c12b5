//! Fatal error conditions.
//!
//! Every error here is treated as unrecoverable by the simulation:
//! none of them are meant to be caught and retried by a caller mid-run.
//! Expired weak event targets are deliberately *not* represented as an
//! error variant — they are a silent, expected skip inside
//! [`crate::event::EventLoop::execute_events`].

use crate::event::TriggerType;
use crate::time::Time;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// `reach_time` exceeded its configured settling attempts without
    /// the change/execute cycle quiescing.
    #[error("settling did not converge after {attempts} attempt(s) while reaching {target}")]
    SettlingThresholdExceeded { attempts: u32, target: Time },

    /// A change or trigger referenced a handler id that was never
    /// registered with the loop.
    #[error("no event handler registered for id {id:?}")]
    UnknownHandler { id: String },

    /// `add_dependent` was called on a handler kind that does not
    /// support dependency notification (TRIGGER, REPEAT).
    #[error("handler {handler_id:?} of kind {kind:?} cannot take dependents")]
    InvalidDependent { handler_id: String, kind: TriggerType },

    /// A keyframe container's non-decreasing-time invariant was
    /// violated.
    #[error("keyframe integrity violated at time {at}")]
    IntegrityViolation { at: Time },
}

pub type CoreResult<T> = Result<T, CoreError>;
