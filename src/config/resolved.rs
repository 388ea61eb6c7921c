//! Resolved configuration: the table read by the rest of the firmware.

use crate::error::ValidationError;

use super::axis::{AxisId, AxisMode, AxisParameters, Polarity, AXIS_COUNT};
use super::global::{CanonPlane, GlobalMachineParameters, PathControl, UnitsMode};
use super::param::{AxisField, GlobalField, ParamId, ParamValue};
use super::profile::MachineProfile;
use super::units::{Degrees, Microsteps, Millimeters, MmPerMin, StepsPerSec, Travel};
use super::validation::validate_value;

/// Global parameters, active profile and one record per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfiguration {
    /// Active machine profile.
    pub profile: MachineProfile,
    /// Global machine parameters.
    pub global: GlobalMachineParameters,
    /// Axis records indexed by [`AxisId::index`].
    pub axes: [AxisParameters; AXIS_COUNT],
}

impl ResolvedConfiguration {
    /// Parameters of one axis.
    #[inline]
    pub fn axis(&self, axis: AxisId) -> &AxisParameters {
        &self.axes[axis.index()]
    }

    /// Current value of a parameter.
    pub fn value(&self, param: ParamId) -> ParamValue {
        match param {
            ParamId::Axis(axis, field) => axis_value(self.axis(axis), field),
            ParamId::Global(field) => global_value(&self.global, field),
        }
    }

    /// Write one parameter.
    ///
    /// The value is validated first; on error nothing is modified. Dependent
    /// fields are not touched here.
    pub fn apply(&mut self, param: ParamId, value: ParamValue) -> Result<(), ValidationError> {
        validate_value(param, value)?;
        match param {
            ParamId::Axis(axis, field) => {
                apply_axis(&mut self.axes[axis.index()], axis, field, value)
            }
            ParamId::Global(field) => apply_global(&mut self.global, field, value),
        }
    }
}

fn axis_value(params: &AxisParameters, field: AxisField) -> ParamValue {
    match field {
        AxisField::MapIndex => ParamValue::Int(params.map_index as i32),
        AxisField::Mode => ParamValue::Int(params.mode.code()),
        AxisField::StepAngle => ParamValue::Float(params.step_angle.value()),
        AxisField::Microsteps => ParamValue::Int(params.microsteps.value() as i32),
        AxisField::Polarity => ParamValue::Int(params.polarity.code()),
        AxisField::PowerIdle => ParamValue::Bool(params.power_idle_enabled),
        AxisField::LimitSwitch => ParamValue::Bool(params.limit_switch_enabled),
        AxisField::TravelPerRev => ParamValue::Float(params.travel_per_rev.value()),
        AxisField::TravelMax => ParamValue::Float(params.travel_max.to_raw()),
        AxisField::TravelWarn => ParamValue::Float(params.travel_warn.to_raw()),
        AxisField::HomingEnabled => ParamValue::Bool(params.homing_enabled),
        AxisField::HomingOffset => ParamValue::Float(params.homing_offset.value()),
        AxisField::HomingRate => ParamValue::Float(params.homing_rate.value()),
        AxisField::HomingBackoff => ParamValue::Float(params.homing_backoff.value()),
        AxisField::SeekSteps => ParamValue::Int(params.seek_steps.value() as i32),
        AxisField::FeedSteps => ParamValue::Int(params.feed_steps.value() as i32),
    }
}

fn global_value(global: &GlobalMachineParameters, field: GlobalField) -> ParamValue {
    match field {
        GlobalField::ArcSegmentLength => ParamValue::Float(global.arc_segment_length.value()),
        GlobalField::MinSegmentTime => ParamValue::Float(global.min_segment_time_us),
        GlobalField::MaxLinearJerk => ParamValue::Float(global.max_linear_jerk),
        GlobalField::MaxAngularJerk => ParamValue::Float(global.max_angular_jerk),
        GlobalField::RotaryRadius => ParamValue::Float(global.rotary_radius.value()),
        GlobalField::PowerOnHoming => ParamValue::Bool(global.power_on_homing),
        GlobalField::GcodePlane => ParamValue::Int(global.gcode.plane.code()),
        GlobalField::GcodeUnits => ParamValue::Int(global.gcode.units.code()),
        GlobalField::GcodePathControl => ParamValue::Int(global.gcode.path_control.code()),
        GlobalField::GcodeTool => ParamValue::Int(global.gcode.tool as i32),
        GlobalField::GcodeFeedRate => ParamValue::Float(global.gcode.feed_rate.value()),
        GlobalField::GcodeSpindleSpeed => ParamValue::Float(global.gcode.spindle_speed),
    }
}

fn apply_axis(
    params: &mut AxisParameters,
    axis: AxisId,
    field: AxisField,
    value: ParamValue,
) -> Result<(), ValidationError> {
    let param = ParamId::Axis(axis, field);
    let mismatch = || ValidationError::TypeMismatch {
        param,
        expected: field.kind(),
    };
    let out_of_range = || ValidationError::OutOfRange { param, value };

    match (field, value) {
        (AxisField::MapIndex, ParamValue::Int(v)) => {
            params.map_index = u8::try_from(v).map_err(|_| out_of_range())?
        }
        (AxisField::Mode, ParamValue::Int(v)) => params.mode = AxisMode::from_code(axis, v)?,
        (AxisField::StepAngle, ParamValue::Float(v)) => params.step_angle = Degrees(v),
        (AxisField::Microsteps, ParamValue::Int(v)) => params.microsteps = Microsteps::new(v)?,
        (AxisField::Polarity, ParamValue::Int(v)) => {
            params.polarity = Polarity::from_code(v).ok_or_else(out_of_range)?
        }
        (AxisField::PowerIdle, ParamValue::Bool(v)) => params.power_idle_enabled = v,
        (AxisField::LimitSwitch, ParamValue::Bool(v)) => params.limit_switch_enabled = v,
        (AxisField::TravelPerRev, ParamValue::Float(v)) => params.travel_per_rev = Millimeters(v),
        (AxisField::TravelMax, ParamValue::Float(v)) => {
            params.travel_max = Travel::from_raw(v).ok_or_else(out_of_range)?
        }
        (AxisField::TravelWarn, ParamValue::Float(v)) => {
            params.travel_warn = Travel::from_raw(v).ok_or_else(out_of_range)?
        }
        (AxisField::HomingEnabled, ParamValue::Bool(v)) => params.homing_enabled = v,
        (AxisField::HomingOffset, ParamValue::Float(v)) => params.homing_offset = Millimeters(v),
        (AxisField::HomingRate, ParamValue::Float(v)) => params.homing_rate = MmPerMin(v),
        (AxisField::HomingBackoff, ParamValue::Float(v)) => params.homing_backoff = Millimeters(v),
        (AxisField::SeekSteps, ParamValue::Int(v)) => {
            params.seek_steps = StepsPerSec(u16::try_from(v).map_err(|_| out_of_range())?)
        }
        (AxisField::FeedSteps, ParamValue::Int(v)) => {
            params.feed_steps = StepsPerSec(u16::try_from(v).map_err(|_| out_of_range())?)
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn apply_global(
    global: &mut GlobalMachineParameters,
    field: GlobalField,
    value: ParamValue,
) -> Result<(), ValidationError> {
    let param = ParamId::Global(field);
    let mismatch = || ValidationError::TypeMismatch {
        param,
        expected: field.kind(),
    };
    let out_of_range = || ValidationError::OutOfRange { param, value };

    match (field, value) {
        (GlobalField::ArcSegmentLength, ParamValue::Float(v)) => {
            global.arc_segment_length = Millimeters(v)
        }
        (GlobalField::MinSegmentTime, ParamValue::Float(v)) => global.min_segment_time_us = v,
        (GlobalField::MaxLinearJerk, ParamValue::Float(v)) => global.max_linear_jerk = v,
        (GlobalField::MaxAngularJerk, ParamValue::Float(v)) => global.max_angular_jerk = v,
        (GlobalField::RotaryRadius, ParamValue::Float(v)) => global.rotary_radius = Millimeters(v),
        (GlobalField::PowerOnHoming, ParamValue::Bool(v)) => global.power_on_homing = v,
        (GlobalField::GcodePlane, ParamValue::Int(v)) => {
            global.gcode.plane = CanonPlane::from_code(v).ok_or_else(out_of_range)?
        }
        (GlobalField::GcodeUnits, ParamValue::Int(v)) => {
            global.gcode.units = UnitsMode::from_code(v).ok_or_else(out_of_range)?
        }
        (GlobalField::GcodePathControl, ParamValue::Int(v)) => {
            global.gcode.path_control = PathControl::from_code(v).ok_or_else(out_of_range)?
        }
        (GlobalField::GcodeTool, ParamValue::Int(v)) => {
            global.gcode.tool = u16::try_from(v).map_err(|_| out_of_range())?
        }
        (GlobalField::GcodeFeedRate, ParamValue::Float(v)) => global.gcode.feed_rate = MmPerMin(v),
        (GlobalField::GcodeSpindleSpeed, ParamValue::Float(v)) => global.gcode.spindle_speed = v,
        _ => return Err(mismatch()),
    }
    Ok(())
}
