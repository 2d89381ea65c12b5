//! chronoset: time-indexed curve containers and a dependency-tracking
//! event loop for deterministic, rewindable simulation.
//!
//! Two subsystems interlock:
//! - [`curve`] stores a full history of an attribute's values, keyed
//!   by [`time::Time`], queryable at any recorded instant — past,
//!   present, or a written-ahead future.
//! - [`event`] schedules handlers against curves (and any other
//!   [`event::EventEntity`]): a handler declares when it should next
//!   fire and what it does when it does, and [`event::EventLoop`]
//!   settles a batch of interdependent handlers forward to a target
//!   time.
//!
//! [`activity`] is a thin graph DSL built on top of `event`,
//! demonstrating the loop's reactive contract end to end.
//!
//! # Quick example
//!
//! ```
//! use chronoset::curve::Discrete;
//! use chronoset::event::EventLoop;
//! use chronoset::time::{Time, TIME_ZERO};
//! use std::rc::Weak;
//!
//! let hp = Discrete::new(1, "hp", 100i32, Weak::<EventLoop>::new());
//! hp.set_insert(Time::from_secs(10), 80);
//! assert_eq!(hp.get(TIME_ZERO), 100);
//! assert_eq!(hp.get(Time::from_secs(15)), 80);
//! ```

pub mod activity;
pub mod curve;
pub mod error;
pub mod event;
pub mod time;

pub use error::{CoreError, CoreResult};
pub use time::{Time, TIME_MAX, TIME_MIN, TIME_ZERO};
