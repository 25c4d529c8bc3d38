// Time units for the arrangement model
// A clip collection is monomorphic in its unit: audio tracks arrange in
// wall-clock seconds, MIDI tracks in musical pulses. The newtypes keep the
// two from ever being mixed in one collection.

use std::fmt;
use std::ops::{Add, Sub};

/// Unit of time a clip collection is expressed in.
///
/// Implemented by [`Seconds`] and [`Pulses`]. All edit operations work in
/// terms of this trait, so the same algorithms serve both track kinds.
pub trait ClipUnit:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + fmt::Debug
{
    /// The zero position/duration.
    fn zero() -> Self;
}

/// Wall-clock seconds (audio material)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Seconds(pub f64);

impl Add for Seconds {
    type Output = Seconds;

    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl Sub for Seconds {
    type Output = Seconds;

    fn sub(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 - rhs.0)
    }
}

impl ClipUnit for Seconds {
    fn zero() -> Self {
        Seconds(0.0)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

/// Musical pulses (MIDI material), at TICKS_PER_QUARTER resolution
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Pulses(pub i64);

impl Add for Pulses {
    type Output = Pulses;

    fn add(self, rhs: Pulses) -> Pulses {
        Pulses(self.0 + rhs.0)
    }
}

impl Sub for Pulses {
    type Output = Pulses;

    fn sub(self, rhs: Pulses) -> Pulses {
        Pulses(self.0 - rhs.0)
    }
}

impl ClipUnit for Pulses {
    fn zero() -> Self {
        Pulses(0)
    }
}

impl fmt::Display for Pulses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_arithmetic() {
        let a = Seconds(1.5);
        let b = Seconds(0.5);

        assert_eq!(a + b, Seconds(2.0));
        assert_eq!(a - b, Seconds(1.0));
        assert!(b < a);
        assert_eq!(Seconds::zero(), Seconds(0.0));
    }

    #[test]
    fn test_pulses_arithmetic() {
        let a = Pulses(96);
        let b = Pulses(24);

        assert_eq!(a + b, Pulses(120));
        assert_eq!(a - b, Pulses(72));
        assert!(b < a);
        assert_eq!(Pulses::zero(), Pulses(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Seconds(1.25).to_string(), "1.250s");
        assert_eq!(Pulses(48).to_string(), "48p");
    }
}
