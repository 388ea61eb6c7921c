//! Axis-independent machine parameters and shared base constants.

use serde::Deserialize;

use super::units::{Degrees, Microsteps, Millimeters, MmPerMin};

/// One radian in degrees; with this rotary radius mm/min equals degrees/min.
pub const RADIAN: f32 = 57.295_78;

/// Active plane for arcs and canned cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum CanonPlane {
    /// G17
    #[default]
    Xy,
    /// G18
    Xz,
    /// G19
    Yz,
}

impl CanonPlane {
    /// Numeric code (0 XY, 1 XZ, 2 YZ).
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a numeric code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CanonPlane::Xy),
            1 => Some(CanonPlane::Xz),
            2 => Some(CanonPlane::Yz),
            _ => None,
        }
    }
}

/// Programming units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum UnitsMode {
    /// G20
    Inches,
    /// G21
    #[default]
    Millimeters,
}

impl UnitsMode {
    /// Numeric code (0 inches, 1 millimetres).
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a numeric code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(UnitsMode::Inches),
            1 => Some(UnitsMode::Millimeters),
            _ => None,
        }
    }
}

/// Path control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum PathControl {
    /// G61.1: stop at the end of every segment
    #[default]
    ExactStop,
    /// G61: follow the programmed path exactly
    ExactPath,
    /// G64: blend between segments
    Continuous,
}

impl PathControl {
    /// Numeric code (0 exact stop, 1 exact path, 2 continuous).
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Decode a numeric code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PathControl::ExactStop),
            1 => Some(PathControl::ExactPath),
            2 => Some(PathControl::Continuous),
            _ => None,
        }
    }
}

/// G-code interpreter power-on state.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GcodeDefaults {
    /// Active plane.
    pub plane: CanonPlane,
    /// Programming units.
    pub units: UnitsMode,
    /// Path control mode.
    pub path_control: PathControl,
    /// Selected tool number.
    pub tool: u16,
    /// Feed rate.
    pub feed_rate: MmPerMin,
    /// Spindle speed in rpm.
    pub spindle_speed: f32,
}

impl GcodeDefaults {
    /// Compiled G-code power-on defaults.
    pub const COMPILED: Self = Self {
        plane: CanonPlane::Xy,
        units: UnitsMode::Millimeters,
        path_control: PathControl::ExactStop,
        tool: 1,
        feed_rate: MmPerMin(400.0),
        spindle_speed: 1500.0,
    };
}

impl Default for GcodeDefaults {
    fn default() -> Self {
        Self::COMPILED
    }
}

/// Global, axis-independent machine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalMachineParameters {
    /// Chord length used to approximate arcs.
    pub arc_segment_length: Millimeters,
    /// Minimum duration of a planned segment in microseconds.
    pub min_segment_time_us: f32,
    /// Linear jerk limit in mm/min³.
    pub max_linear_jerk: f32,
    /// Angular jerk limit in deg/min³.
    pub max_angular_jerk: f32,
    /// Radius used to convert rotary feed rates.
    pub rotary_radius: Millimeters,
    /// Run the homing cycle at power-on.
    pub power_on_homing: bool,
    /// G-code power-on defaults.
    #[serde(skip)]
    pub gcode: GcodeDefaults,
}

impl GlobalMachineParameters {
    /// Compiled global parameters.
    pub const COMPILED: Self = Self {
        arc_segment_length: Millimeters(0.05),
        min_segment_time_us: 20_000.0,
        max_linear_jerk: 1_000_000.0,
        max_angular_jerk: 100_000_000.0,
        rotary_radius: Millimeters(RADIAN),
        power_on_homing: false,
        gcode: GcodeDefaults::COMPILED,
    };
}

impl Default for GlobalMachineParameters {
    fn default() -> Self {
        Self::COMPILED
    }
}

/// Motor constants fanned out identically to every axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorDefaults {
    /// Degrees per whole step (1.8 or 0.9 for most motors).
    pub step_angle: Degrees,
    /// Driver microstep mode.
    pub microsteps: Microsteps,
}

impl MotorDefaults {
    /// Compiled motor constants.
    pub const COMPILED: Self = Self {
        step_angle: Degrees(1.8),
        microsteps: Microsteps::EIGHTH,
    };
}

impl Default for MotorDefaults {
    fn default() -> Self {
        Self::COMPILED
    }
}

/// Homing constants fanned out identically to every axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomingDefaults {
    /// Homing seek rate.
    pub rate: MmPerMin,
    /// Switch backoff distance.
    pub backoff: Millimeters,
}

impl HomingDefaults {
    /// Compiled homing constants.
    pub const COMPILED: Self = Self {
        rate: MmPerMin(500.0),
        backoff: Millimeters(10.0),
    };
}

impl Default for HomingDefaults {
    fn default() -> Self {
        Self::COMPILED
    }
}

/// Base values the derivation engine works from (profile bundle aside).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BaseParameters {
    /// Global machine parameters.
    pub global: GlobalMachineParameters,
    /// Shared motor constants.
    pub motor: MotorDefaults,
    /// Shared homing constants.
    pub homing: HomingDefaults,
}

impl BaseParameters {
    /// Compiled base parameters.
    pub const COMPILED: Self = Self {
        global: GlobalMachineParameters::COMPILED,
        motor: MotorDefaults::COMPILED,
        homing: HomingDefaults::COMPILED,
    };
}
