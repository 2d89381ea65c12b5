//! A single time-value sample stored in a [`super::container::KeyframeContainer`].

use crate::time::{Time, TIME_MIN};

/// One (time, value) sample.
///
/// The first keyframe of every container is a sentinel at
/// [`TIME_MIN`] so that a lookup at any representable time always has
/// something to fall back on.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub time: Time,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: Time, value: T) -> Self {
        Self { time, value }
    }

    pub fn sentinel(value: T) -> Self {
        Self { time: TIME_MIN, value }
    }

    pub fn as_pair(&self) -> (Time, &T) {
        (self.time, &self.value)
    }
}
