//! Fixed-point simulation time.
//!
//! The simulation never uses floating point for its time axis: every
//! instant and every duration is a [`Time`], a signed 64-bit integer
//! scaled by `2^FRACTIONAL_BITS`. Fixed point keeps ordering and
//! equality exact, which curve lookups and event scheduling both rely
//! on.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};

const FRACTIONAL_BITS: u32 = 16;
const SCALE: i64 = 1 << FRACTIONAL_BITS;

/// A point in simulation time, or a duration between two such points.
///
/// `Time` is a single type for both roles, matching how the curve and
/// event-loop algorithms this crate implements freely subtract two
/// instants to get a duration and then add that duration back onto an
/// instant.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(i64);

/// The smallest representable time. Used as the sentinel timestamp for
/// the first keyframe in every [`crate::curve::KeyframeContainer`].
pub const TIME_MIN: Time = Time(i64::MIN);

/// The largest representable time.
pub const TIME_MAX: Time = Time(i64::MAX);

/// The origin of simulation time.
pub const TIME_ZERO: Time = Time(0);

impl Time {
    /// Construct a `Time` from a whole number of seconds.
    pub fn from_secs(secs: i64) -> Self {
        Time(secs * SCALE)
    }

    /// Construct a `Time` from a fractional number of seconds.
    pub fn from_secs_f64(secs: f64) -> Self {
        Time((secs * SCALE as f64).round() as i64)
    }

    /// Construct a `Time` from milliseconds.
    pub fn from_millis(ms: i64) -> Self {
        Time((ms * SCALE) / 1000)
    }

    /// The value as a floating-point number of seconds. Used only at
    /// the boundary with the outside world (logging, interpolation
    /// fractions); never for comparisons or storage.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Absolute value. Used where the original C++ code kept a
    /// separate unsigned duration type; this crate reuses `Time` for
    /// both roles and takes `.abs()` at the few call sites that need a
    /// non-negative magnitude (see DESIGN.md).
    pub fn abs(self) -> Self {
        Time(self.0.abs())
    }

    /// The raw fixed-point mantissa, for tests and debugging.
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Construct a `Time` from a raw fixed-point mantissa.
    pub fn from_raw(raw: i64) -> Self {
        Time(raw)
    }

    pub fn is_min(self) -> bool {
        self == TIME_MIN
    }

    pub fn is_max(self) -> bool {
        self == TIME_MAX
    }
}

impl Add for Time {
    type Output = Time;
    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;
    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Neg for Time {
    type Output = Time;
    fn neg(self) -> Time {
        Time(-self.0)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Time) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Time {
    type Output = Time;
    fn mul(self, rhs: f64) -> Time {
        Time(((self.0 as f64) * rhs).round() as i64)
    }
}

impl Div<f64> for Time {
    type Output = Time;
    fn div(self, rhs: f64) -> Time {
        Time(((self.0 as f64) / rhs).round() as i64)
    }
}

impl Div for Time {
    type Output = f64;
    fn div(self, rhs: Time) -> f64 {
        self.0 as f64 / rhs.0 as f64
    }
}

/// Modulo against another `Time`, used by [`crate::curve::DiscreteMod`]
/// to wrap a query time into a curve's cyclic range.
impl Rem for Time {
    type Output = Time;
    fn rem(self, rhs: Time) -> Time {
        Time(self.0.rem_euclid(rhs.0))
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({:.6})", self.as_secs_f64())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_secs_f64())
    }
}
