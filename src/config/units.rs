//! Unit types for machine quantities.
//!
//! Provides type-safe representations of lengths, feed rates, step rates and
//! travel extents so that millimetres are never confused with steps.

use core::fmt;

use serde::Deserialize;

use crate::error::ValidationError;

/// Angle in degrees (motor step angle).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whole steps per motor revolution for this step angle.
    #[inline]
    pub fn steps_per_revolution(self) -> f32 {
        libm::roundf(360.0 / self.0)
    }
}

/// Linear distance in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f32);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Feed rate in millimetres per minute.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct MmPerMin(pub f32);

impl MmPerMin {
    /// Create a new MmPerMin value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Maximum whole (not micro) steps per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct StepsPerSec(pub u16);

impl StepsPerSec {
    /// Create a new StepsPerSec value.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

/// Microstep divisor (1, 2, 4, 8).
///
/// Validated at construction; the stepper driver only decodes these four modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Microsteps(u8);

impl Microsteps {
    /// Full step (no microstepping).
    pub const FULL: Self = Self(1);
    /// Half step.
    pub const HALF: Self = Self(2);
    /// Quarter step.
    pub const QUARTER: Self = Self(4);
    /// Eighth step (finest mode).
    pub const EIGHTH: Self = Self(8);

    /// Valid microstep values.
    pub const VALID_VALUES: [u8; 4] = [1, 2, 4, 8];

    /// Create a new Microsteps value with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMicrosteps` if the value is not 1, 2, 4 or 8.
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if Self::VALID_VALUES.contains(&v) => Ok(Self(v)),
            _ => Err(ValidationError::InvalidMicrosteps(value)),
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::EIGHTH
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = i32::deserialize(deserializer)?;
        Microsteps::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

/// Axis travel extent: a bounded length or no limit at all.
///
/// The raw representation shared with storage and the command interface
/// encodes [`Travel::Unbounded`] as `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Travel {
    /// Full excursion from axis minimum to maximum
    Bounded(Millimeters),
    /// No travel limit (typical for a rotary axis)
    Unbounded,
}

impl Travel {
    /// Raw sentinel for an unbounded axis.
    pub const UNBOUNDED_RAW: f32 = -1.0;

    /// Create a bounded travel extent.
    #[inline]
    pub const fn bounded(mm: f32) -> Self {
        Travel::Bounded(Millimeters(mm))
    }

    /// Decode the raw representation.
    ///
    /// Returns `None` for anything that is neither the sentinel nor a positive finite length.
    pub fn from_raw(raw: f32) -> Option<Self> {
        if raw == Self::UNBOUNDED_RAW {
            Some(Travel::Unbounded)
        } else if raw.is_finite() && raw > 0.0 {
            Some(Travel::Bounded(Millimeters(raw)))
        } else {
            None
        }
    }

    /// Encode into the raw representation.
    #[inline]
    pub fn to_raw(self) -> f32 {
        match self {
            Travel::Bounded(mm) => mm.0,
            Travel::Unbounded => Self::UNBOUNDED_RAW,
        }
    }

    /// Travel extent, if bounded.
    #[inline]
    pub fn extent(self) -> Option<Millimeters> {
        match self {
            Travel::Bounded(mm) => Some(mm),
            Travel::Unbounded => None,
        }
    }

    /// True for the unbounded sentinel.
    #[inline]
    pub fn is_unbounded(self) -> bool {
        matches!(self, Travel::Unbounded)
    }
}

impl fmt::Display for Travel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Travel::Bounded(mm) => write!(f, "{} mm", mm.0),
            Travel::Unbounded => write!(f, "unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for Travel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f32::deserialize(deserializer)?;
        Travel::from_raw(raw).ok_or_else(|| {
            serde::de::Error::custom("travel must be a positive length or -1 for unbounded")
        })
    }
}
