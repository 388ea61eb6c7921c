//! Axis identifiers and per-axis parameter records.

use core::fmt;

use serde::Deserialize;

use crate::error::ValidationError;

use super::units::{Degrees, Microsteps, Millimeters, MmPerMin, StepsPerSec, Travel};

/// Number of controlled axes.
pub const AXIS_COUNT: usize = 4;

/// One of the four motion axes.
///
/// The discriminant is the axis mapping index and is used as an array index
/// throughout the firmware; the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    /// Linear X axis
    X = 0,
    /// Linear Y axis
    Y = 1,
    /// Linear Z axis
    Z = 2,
    /// Rotary A axis
    A = 3,
}

impl AxisId {
    /// All axes in mapping order.
    pub const ALL: [AxisId; AXIS_COUNT] = [AxisId::X, AxisId::Y, AxisId::Z, AxisId::A];

    /// Array index of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis for an array index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(AxisId::X),
            1 => Some(AxisId::Y),
            2 => Some(AxisId::Z),
            3 => Some(AxisId::A),
            _ => None,
        }
    }

    /// True for the rotary axis.
    #[inline]
    pub const fn is_rotary(self) -> bool {
        matches!(self, AxisId::A)
    }

    /// Lowercase axis letter.
    pub const fn letter(self) -> &'static str {
        match self {
            AxisId::X => "x",
            AxisId::Y => "y",
            AxisId::Z => "z",
            AxisId::A => "a",
        }
    }

    /// Parse a lowercase or uppercase axis letter.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "x" | "X" => Some(AxisId::X),
            "y" | "Y" => Some(AxisId::Y),
            "z" | "Z" => Some(AxisId::Z),
            "a" | "A" => Some(AxisId::A),
            _ => None,
        }
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Axis operating mode.
///
/// Linear axes accept `Normal` and `Disabled`; the rotary axis accepts
/// `Normal`, `Extruder` and `CoordinatedSpindle`. The numeric codes used by
/// storage and the command interface are per axis class, see [`AxisMode::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum AxisMode {
    /// Axis moves normally
    #[default]
    Normal,
    /// Linear axis ignored (dry runs)
    Disabled,
    /// Rotary axis drives an extruder
    Extruder,
    /// Rotary axis runs as a coordinated spindle
    CoordinatedSpindle,
}

impl AxisMode {
    /// Check whether the mode is legal for an axis.
    pub const fn is_valid_for(self, axis: AxisId) -> bool {
        match self {
            AxisMode::Normal => true,
            AxisMode::Disabled => !axis.is_rotary(),
            AxisMode::Extruder | AxisMode::CoordinatedSpindle => axis.is_rotary(),
        }
    }

    /// Numeric mode code for an axis class.
    pub const fn code(self) -> i32 {
        match self {
            AxisMode::Normal => 0,
            AxisMode::Disabled | AxisMode::Extruder => 1,
            AxisMode::CoordinatedSpindle => 2,
        }
    }

    /// Decode a numeric mode code for an axis.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMode` if the code is not defined for the axis class.
    pub fn from_code(axis: AxisId, code: i32) -> Result<Self, ValidationError> {
        match (axis.is_rotary(), code) {
            (_, 0) => Ok(AxisMode::Normal),
            (false, 1) => Ok(AxisMode::Disabled),
            (true, 1) => Ok(AxisMode::Extruder),
            (true, 2) => Ok(AxisMode::CoordinatedSpindle),
            _ => Err(ValidationError::InvalidMode { axis, code }),
        }
    }
}

/// Motor direction polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Direction pin follows commanded direction
    #[default]
    Forward,
    /// Direction pin inverted
    Reverse,
}

impl Polarity {
    /// Numeric polarity code (0 forward, 1 reverse).
    pub const fn code(self) -> i32 {
        match self {
            Polarity::Forward => 0,
            Polarity::Reverse => 1,
        }
    }

    /// Decode a numeric polarity code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Polarity::Forward),
            1 => Some(Polarity::Reverse),
            _ => None,
        }
    }
}

/// Per-axis values that cannot be derived and are supplied directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstants {
    /// Axis mapping index (0..=3).
    pub map_index: u8,
    /// Operating mode.
    pub mode: AxisMode,
    /// Motor direction polarity.
    pub polarity: Polarity,
    /// Low-power idle enabled.
    pub power_idle_enabled: bool,
    /// Limit switches present and enabled.
    pub limit_switch_enabled: bool,
    /// Axis takes part in the homing cycle.
    pub homing_enabled: bool,
    /// Configured travel extent.
    pub travel: Travel,
}

impl AxisConstants {
    /// Compiled per-axis constants.
    pub const fn compiled(axis: AxisId) -> Self {
        match axis {
            AxisId::X => Self::linear(0, true, Travel::bounded(400.0)),
            AxisId::Y => Self::linear(1, true, Travel::bounded(400.0)),
            AxisId::Z => Self::linear(2, false, Travel::bounded(50.0)),
            AxisId::A => Self {
                map_index: 3,
                mode: AxisMode::Normal,
                polarity: Polarity::Reverse,
                power_idle_enabled: true,
                limit_switch_enabled: false,
                homing_enabled: false,
                travel: Travel::Unbounded,
            },
        }
    }

    const fn linear(map_index: u8, homing_enabled: bool, travel: Travel) -> Self {
        Self {
            map_index,
            mode: AxisMode::Normal,
            polarity: Polarity::Forward,
            power_idle_enabled: true,
            limit_switch_enabled: true,
            homing_enabled,
            travel,
        }
    }
}

/// Fully resolved parameter record for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisParameters {
    /// Axis mapping index (0..=3).
    pub map_index: u8,
    /// Operating mode.
    pub mode: AxisMode,
    /// Degrees per whole motor step.
    pub step_angle: Degrees,
    /// Driver microstep mode.
    pub microsteps: Microsteps,
    /// Motor direction polarity.
    pub polarity: Polarity,
    /// Low-power idle enabled.
    pub power_idle_enabled: bool,
    /// Limit switches present and enabled.
    pub limit_switch_enabled: bool,
    /// Travel per motor revolution (degrees for a geared rotary axis).
    pub travel_per_rev: Millimeters,
    /// Full excursion from axis minimum to maximum.
    pub travel_max: Travel,
    /// Soft travel warning threshold.
    pub travel_warn: Travel,
    /// Axis takes part in the homing cycle.
    pub homing_enabled: bool,
    /// Offset to machine zero from the axis minimum.
    pub homing_offset: Millimeters,
    /// Homing seek rate.
    pub homing_rate: MmPerMin,
    /// Distance to back off a switch after it trips.
    pub homing_backoff: Millimeters,
    /// Maximum whole steps per second for G0 motion.
    pub seek_steps: StepsPerSec,
    /// Maximum whole steps per second for feed motion.
    pub feed_steps: StepsPerSec,
}

impl AxisParameters {
    /// Microsteps per motor revolution.
    pub fn microsteps_per_revolution(&self) -> f32 {
        self.step_angle.steps_per_revolution() * self.microsteps.value() as f32
    }

    /// Microsteps per millimetre of travel (or per degree on a geared rotary axis).
    pub fn steps_per_unit(&self) -> f32 {
        self.microsteps_per_revolution() / self.travel_per_rev.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order_is_mapping_index() {
        for (i, axis) in AxisId::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
            assert_eq!(AxisId::from_index(i), Some(*axis));
        }
        assert_eq!(AxisId::from_index(4), None);
    }

    #[test]
    fn test_mode_codes_depend_on_axis_class() {
        assert_eq!(AxisMode::from_code(AxisId::X, 1), Ok(AxisMode::Disabled));
        assert_eq!(AxisMode::from_code(AxisId::A, 1), Ok(AxisMode::Extruder));
        assert_eq!(AxisMode::from_code(AxisId::A, 2), Ok(AxisMode::CoordinatedSpindle));
        assert!(AxisMode::from_code(AxisId::Z, 2).is_err());
        assert!(AxisMode::from_code(AxisId::A, 3).is_err());
        assert!(!AxisMode::Extruder.is_valid_for(AxisId::Y));
        assert!(!AxisMode::Disabled.is_valid_for(AxisId::A));
    }

    #[test]
    fn test_compiled_constants() {
        let a = AxisConstants::compiled(AxisId::A);
        assert!(a.travel.is_unbounded());
        assert_eq!(a.polarity, Polarity::Reverse);
        assert!(!a.limit_switch_enabled);

        let z = AxisConstants::compiled(AxisId::Z);
        assert_eq!(z.travel, Travel::bounded(50.0));
        assert!(!z.homing_enabled);
    }

    #[test]
    fn test_step_resolution_of_compiled_x_axis() {
        use crate::config::MachineDefaults;

        let resolved = MachineDefaults::compiled().resolve();
        let x = resolved.axis(AxisId::X);

        // 1.8 deg motor at 1/8 microstepping on a 2.54 mm/rev leadscrew
        assert_eq!(x.microsteps_per_revolution(), 1600.0);
        assert!((x.steps_per_unit() - 1600.0 / 2.54).abs() < 0.01);
    }
}
