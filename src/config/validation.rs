//! Parameter validation.
//!
//! One set of constraints covers compiled defaults, persisted overrides and
//! runtime `set` requests.

use crate::error::{BuildError, ValidationError};

use super::axis::{AxisConstants, AxisId, AxisMode, Polarity, AXIS_COUNT};
use super::global::{CanonPlane, PathControl, UnitsMode};
use super::param::{AxisField, GlobalField, ParamId, ParamValue};
use super::resolved::ResolvedConfiguration;
use super::units::{Microsteps, Travel};

/// Validate a proposed value for a parameter.
///
/// Checks:
/// - Value kind matches the parameter
/// - Float values are finite
/// - Numeric ranges and enum codes
pub fn validate_value(param: ParamId, value: ParamValue) -> Result<(), ValidationError> {
    if value.kind() != param.kind() {
        return Err(ValidationError::TypeMismatch {
            param,
            expected: param.kind(),
        });
    }
    if let ParamValue::Float(v) = value {
        if !v.is_finite() {
            return Err(ValidationError::NotFinite(param));
        }
    }

    match param {
        ParamId::Axis(axis, field) => validate_axis_field(param, axis, field, value),
        ParamId::Global(field) => validate_global_field(param, field, value),
    }
}

fn validate_axis_field(
    param: ParamId,
    axis: AxisId,
    field: AxisField,
    value: ParamValue,
) -> Result<(), ValidationError> {
    match (field, value) {
        (AxisField::MapIndex, ParamValue::Int(v)) => int_range(param, v, 0, AXIS_COUNT as i32 - 1),
        (AxisField::Mode, ParamValue::Int(v)) => AxisMode::from_code(axis, v).map(|_| ()),
        (AxisField::StepAngle, ParamValue::Float(v)) => {
            if v > 0.0 && v <= 360.0 {
                Ok(())
            } else {
                Err(out_of_range(param, value))
            }
        }
        (AxisField::Microsteps, ParamValue::Int(v)) => Microsteps::new(v).map(|_| ()),
        (AxisField::Polarity, ParamValue::Int(v)) => match Polarity::from_code(v) {
            Some(_) => Ok(()),
            None => Err(out_of_range(param, value)),
        },
        (AxisField::TravelMax | AxisField::TravelWarn, ParamValue::Float(v)) => {
            match Travel::from_raw(v) {
                Some(_) => Ok(()),
                None => Err(out_of_range(param, value)),
            }
        }
        (AxisField::TravelPerRev | AxisField::HomingRate, ParamValue::Float(v)) => {
            positive(param, v)
        }
        (AxisField::HomingBackoff, ParamValue::Float(v)) => {
            if v >= 0.0 {
                Ok(())
            } else {
                Err(out_of_range(param, value))
            }
        }
        (AxisField::SeekSteps | AxisField::FeedSteps, ParamValue::Int(v)) => {
            int_range(param, v, 1, u16::MAX as i32)
        }
        // Flags and the homing offset accept any value of the right kind
        _ => Ok(()),
    }
}

fn validate_global_field(
    param: ParamId,
    field: GlobalField,
    value: ParamValue,
) -> Result<(), ValidationError> {
    match (field, value) {
        (GlobalField::GcodePlane, ParamValue::Int(v)) => match CanonPlane::from_code(v) {
            Some(_) => Ok(()),
            None => Err(out_of_range(param, value)),
        },
        (GlobalField::GcodeUnits, ParamValue::Int(v)) => match UnitsMode::from_code(v) {
            Some(_) => Ok(()),
            None => Err(out_of_range(param, value)),
        },
        (GlobalField::GcodePathControl, ParamValue::Int(v)) => match PathControl::from_code(v) {
            Some(_) => Ok(()),
            None => Err(out_of_range(param, value)),
        },
        (GlobalField::GcodeTool, ParamValue::Int(v)) => int_range(param, v, 1, u16::MAX as i32),
        (_, ParamValue::Float(v)) => positive(param, v),
        _ => Ok(()),
    }
}

/// Validate every field of a resolved configuration.
///
/// Used on the compiled defaults; the first offending field is reported.
pub fn validate_resolved(config: &ResolvedConfiguration) -> Result<(), BuildError> {
    for param in ParamId::all() {
        validate_value(param, config.value(param))
            .map_err(|reason| BuildError::InvalidDefault { param, reason })?;
    }
    Ok(())
}

/// Validate the per-axis constants that have no numeric encoding check.
pub fn validate_constants(constants: &[AxisConstants; AXIS_COUNT]) -> Result<(), BuildError> {
    for axis in AxisId::ALL {
        let mode = constants[axis.index()].mode;
        if !mode.is_valid_for(axis) {
            return Err(BuildError::InvalidAxisMode { axis, mode });
        }
    }
    Ok(())
}

fn positive(param: ParamId, v: f32) -> Result<(), ValidationError> {
    if v > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(param, ParamValue::Float(v)))
    }
}

fn int_range(param: ParamId, v: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if (min..=max).contains(&v) {
        Ok(())
    } else {
        Err(out_of_range(param, ParamValue::Int(v)))
    }
}

fn out_of_range(param: ParamId, value: ParamValue) -> ValidationError {
    ValidationError::OutOfRange { param, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x(field: AxisField) -> ParamId {
        ParamId::Axis(AxisId::X, field)
    }

    #[test]
    fn test_type_mismatch() {
        let result = validate_value(x(AxisField::TravelMax), ParamValue::Int(300));
        assert!(matches!(result, Err(ValidationError::TypeMismatch { .. })));
    }

    #[test]
    fn test_invalid_microsteps() {
        let result = validate_value(x(AxisField::Microsteps), ParamValue::Int(3));
        assert_eq!(result, Err(ValidationError::InvalidMicrosteps(3)));
        assert!(validate_value(x(AxisField::Microsteps), ParamValue::Int(4)).is_ok());
    }

    #[test]
    fn test_travel_accepts_sentinel_only() {
        assert!(validate_value(x(AxisField::TravelMax), ParamValue::Float(-1.0)).is_ok());
        assert!(validate_value(x(AxisField::TravelMax), ParamValue::Float(-5.0)).is_err());
        assert!(validate_value(x(AxisField::TravelWarn), ParamValue::Float(0.0)).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let result = validate_value(x(AxisField::HomingOffset), ParamValue::Float(f32::NAN));
        assert!(matches!(result, Err(ValidationError::NotFinite(_))));
    }

    #[test]
    fn test_jerk_must_be_positive() {
        let jerk = ParamId::Global(GlobalField::MaxLinearJerk);
        assert!(validate_value(jerk, ParamValue::Float(0.0)).is_err());
        assert!(validate_value(jerk, ParamValue::Float(-1.0)).is_err());
        assert!(validate_value(jerk, ParamValue::Float(5.0e6)).is_ok());
    }

    #[test]
    fn test_rotary_mode_codes() {
        let mode = ParamId::Axis(AxisId::A, AxisField::Mode);
        assert!(validate_value(mode, ParamValue::Int(2)).is_ok());
        let result = validate_value(x(AxisField::Mode), ParamValue::Int(2));
        assert_eq!(
            result,
            Err(ValidationError::InvalidMode {
                axis: AxisId::X,
                code: 2
            })
        );
    }
}
