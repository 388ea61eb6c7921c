//! Parameter identifiers and values.
//!
//! Every configurable field has a [`ParamId`] from a closed enumeration so
//! the command interface and the storage collaborator can list, validate and
//! address parameters without knowing how any of them are derived.

use core::fmt;
use core::str::FromStr;

use crate::error::ValidationError;

use super::axis::{AxisId, AXIS_COUNT};

/// Kind of value a parameter stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    /// 32-bit float
    Float,
    /// 32-bit signed integer (also used for enum codes)
    Int,
    /// Boolean flag
    Bool,
}

/// Parameter value as seen by the command interface and storage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamValue {
    /// Float value
    Float(f32),
    /// Integer or enum code
    Int(i32),
    /// Flag
    Bool(bool),
}

impl ParamValue {
    /// Kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Float(_) => ValueKind::Float,
            ParamValue::Int(_) => ValueKind::Int,
            ParamValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Encode as a 32-bit word for word-addressed storage.
    pub fn to_bits(self) -> u32 {
        match self {
            ParamValue::Float(v) => v.to_bits(),
            ParamValue::Int(v) => v as u32,
            ParamValue::Bool(v) => v as u32,
        }
    }

    /// Decode a 32-bit word of a known kind.
    pub fn from_bits(bits: u32, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Float => ParamValue::Float(f32::from_bits(bits)),
            ValueKind::Int => ParamValue::Int(bits as i32),
            ValueKind::Bool => ParamValue::Bool(bits != 0),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", *v as u8),
        }
    }
}

/// Per-axis parameter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisField {
    /// Axis mapping index
    MapIndex,
    /// Axis mode code
    Mode,
    /// Degrees per whole step
    StepAngle,
    /// Microstep mode
    Microsteps,
    /// Motor polarity code
    Polarity,
    /// Low-power idle
    PowerIdle,
    /// Limit switches
    LimitSwitch,
    /// Travel per revolution
    TravelPerRev,
    /// Maximum travel (-1 unbounded)
    TravelMax,
    /// Travel warning threshold (-1 unbounded)
    TravelWarn,
    /// Homing enabled
    HomingEnabled,
    /// Homing offset
    HomingOffset,
    /// Homing rate
    HomingRate,
    /// Homing backoff
    HomingBackoff,
    /// Seek whole steps per second
    SeekSteps,
    /// Feed whole steps per second
    FeedSteps,
}

/// Number of per-axis fields.
pub const AXIS_FIELD_COUNT: usize = 16;

impl AxisField {
    /// All fields in storage order.
    pub const ALL: [AxisField; AXIS_FIELD_COUNT] = [
        AxisField::MapIndex,
        AxisField::Mode,
        AxisField::StepAngle,
        AxisField::Microsteps,
        AxisField::Polarity,
        AxisField::PowerIdle,
        AxisField::LimitSwitch,
        AxisField::TravelPerRev,
        AxisField::TravelMax,
        AxisField::TravelWarn,
        AxisField::HomingEnabled,
        AxisField::HomingOffset,
        AxisField::HomingRate,
        AxisField::HomingBackoff,
        AxisField::SeekSteps,
        AxisField::FeedSteps,
    ];

    /// Position in [`AxisField::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Command-interface name.
    pub const fn name(self) -> &'static str {
        match self {
            AxisField::MapIndex => "map",
            AxisField::Mode => "mode",
            AxisField::StepAngle => "step_angle",
            AxisField::Microsteps => "microsteps",
            AxisField::Polarity => "polarity",
            AxisField::PowerIdle => "power_idle",
            AxisField::LimitSwitch => "limit_switch",
            AxisField::TravelPerRev => "travel_per_rev",
            AxisField::TravelMax => "travel_max",
            AxisField::TravelWarn => "travel_warn",
            AxisField::HomingEnabled => "homing_enable",
            AxisField::HomingOffset => "homing_offset",
            AxisField::HomingRate => "homing_rate",
            AxisField::HomingBackoff => "homing_backoff",
            AxisField::SeekSteps => "seek_steps",
            AxisField::FeedSteps => "feed_steps",
        }
    }

    /// Value kind stored by this field.
    pub const fn kind(self) -> ValueKind {
        match self {
            AxisField::MapIndex
            | AxisField::Mode
            | AxisField::Microsteps
            | AxisField::Polarity
            | AxisField::SeekSteps
            | AxisField::FeedSteps => ValueKind::Int,
            AxisField::PowerIdle | AxisField::LimitSwitch | AxisField::HomingEnabled => {
                ValueKind::Bool
            }
            AxisField::StepAngle
            | AxisField::TravelPerRev
            | AxisField::TravelMax
            | AxisField::TravelWarn
            | AxisField::HomingOffset
            | AxisField::HomingRate
            | AxisField::HomingBackoff => ValueKind::Float,
        }
    }

    /// Fields re-derived when this field changes.
    pub const fn dependents(self) -> &'static [AxisField] {
        match self {
            AxisField::TravelMax => &[AxisField::TravelWarn, AxisField::HomingOffset],
            _ => &[],
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Global parameter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GlobalField {
    /// Arc chord length
    ArcSegmentLength,
    /// Minimum segment duration
    MinSegmentTime,
    /// Linear jerk limit
    MaxLinearJerk,
    /// Angular jerk limit
    MaxAngularJerk,
    /// Rotary conversion radius
    RotaryRadius,
    /// Power-on homing
    PowerOnHoming,
    /// G-code plane code
    GcodePlane,
    /// G-code units code
    GcodeUnits,
    /// G-code path control code
    GcodePathControl,
    /// G-code tool
    GcodeTool,
    /// G-code feed rate
    GcodeFeedRate,
    /// G-code spindle speed
    GcodeSpindleSpeed,
}

/// Number of global fields.
pub const GLOBAL_FIELD_COUNT: usize = 12;

impl GlobalField {
    /// All global fields in storage order.
    pub const ALL: [GlobalField; GLOBAL_FIELD_COUNT] = [
        GlobalField::ArcSegmentLength,
        GlobalField::MinSegmentTime,
        GlobalField::MaxLinearJerk,
        GlobalField::MaxAngularJerk,
        GlobalField::RotaryRadius,
        GlobalField::PowerOnHoming,
        GlobalField::GcodePlane,
        GlobalField::GcodeUnits,
        GlobalField::GcodePathControl,
        GlobalField::GcodeTool,
        GlobalField::GcodeFeedRate,
        GlobalField::GcodeSpindleSpeed,
    ];

    /// Position in [`GlobalField::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Command-interface name.
    pub const fn name(self) -> &'static str {
        match self {
            GlobalField::ArcSegmentLength => "arc_segment",
            GlobalField::MinSegmentTime => "min_segment_time",
            GlobalField::MaxLinearJerk => "max_linear_jerk",
            GlobalField::MaxAngularJerk => "max_angular_jerk",
            GlobalField::RotaryRadius => "rotary_radius",
            GlobalField::PowerOnHoming => "power_on_homing",
            GlobalField::GcodePlane => "gcode_plane",
            GlobalField::GcodeUnits => "gcode_units",
            GlobalField::GcodePathControl => "gcode_path_control",
            GlobalField::GcodeTool => "gcode_tool",
            GlobalField::GcodeFeedRate => "gcode_feed_rate",
            GlobalField::GcodeSpindleSpeed => "gcode_spindle_speed",
        }
    }

    /// Value kind stored by this field.
    pub const fn kind(self) -> ValueKind {
        match self {
            GlobalField::PowerOnHoming => ValueKind::Bool,
            GlobalField::GcodePlane
            | GlobalField::GcodeUnits
            | GlobalField::GcodePathControl
            | GlobalField::GcodeTool => ValueKind::Int,
            _ => ValueKind::Float,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Total number of addressable parameters.
pub const PARAM_COUNT: usize = AXIS_COUNT * AXIS_FIELD_COUNT + GLOBAL_FIELD_COUNT;

/// Identifier of one configurable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamId {
    /// Field of one axis
    Axis(AxisId, AxisField),
    /// Global field
    Global(GlobalField),
}

impl ParamId {
    /// Stable index in `0..PARAM_COUNT`; axis fields first, then globals.
    pub const fn index(self) -> usize {
        match self {
            ParamId::Axis(axis, field) => axis.index() * AXIS_FIELD_COUNT + field.index(),
            ParamId::Global(field) => AXIS_COUNT * AXIS_FIELD_COUNT + field.index(),
        }
    }

    /// Identifier for a stable index.
    pub fn from_index(index: usize) -> Option<Self> {
        let axis_params = AXIS_COUNT * AXIS_FIELD_COUNT;
        if index < axis_params {
            let axis = AxisId::from_index(index / AXIS_FIELD_COUNT)?;
            Some(ParamId::Axis(axis, AxisField::ALL[index % AXIS_FIELD_COUNT]))
        } else {
            GlobalField::ALL
                .get(index - axis_params)
                .map(|f| ParamId::Global(*f))
        }
    }

    /// Every parameter in index order.
    pub fn all() -> impl Iterator<Item = ParamId> {
        (0..PARAM_COUNT).filter_map(ParamId::from_index)
    }

    /// Value kind stored by this parameter.
    pub const fn kind(self) -> ValueKind {
        match self {
            ParamId::Axis(_, field) => field.kind(),
            ParamId::Global(field) => field.kind(),
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::Axis(axis, field) => write!(f, "{}.{}", axis, field.name()),
            ParamId::Global(field) => f.write_str(field.name()),
        }
    }
}

impl FromStr for ParamId {
    type Err = ValidationError;

    /// Parse `"<axis>.<field>"` or a global field name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.split_once('.') {
            Some((axis, field)) => AxisId::from_letter(axis)
                .zip(AxisField::from_name(field))
                .map(|(a, f)| ParamId::Axis(a, f)),
            None => GlobalField::from_name(s).map(ParamId::Global),
        };
        parsed.ok_or_else(|| {
            let mut name = heapless::String::new();
            for c in s.chars() {
                if name.push(c).is_err() {
                    break;
                }
            }
            ValidationError::UnknownParameter(name)
        })
    }
}
