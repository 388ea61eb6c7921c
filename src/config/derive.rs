//! Derivation engine.
//!
//! Pure functions that turn the base parameters, the active profile bundle
//! and the per-axis constants into fully populated [`AxisParameters`].
//! Nothing here keeps state; the same inputs always give identical output.

use super::axis::{AxisConstants, AxisId, AxisParameters, AXIS_COUNT};
use super::global::BaseParameters;
use super::param::AxisField;
use super::profile::ProfileBundle;
use super::units::{Millimeters, Travel};

#[cfg(feature = "defmt")]
use defmt::info;

// Stub macro when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

/// Homing offset for an axis: zero sits at the middle of its travel.
///
/// A profile override wins outright. An unbounded axis has no middle, so the
/// offset is zero instead of a division by the sentinel.
#[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
pub fn derive_homing_offset(
    axis: AxisId,
    travel: Travel,
    profile_override: Option<Millimeters>,
) -> Millimeters {
    if let Some(offset) = profile_override {
        return offset;
    }
    match travel.extent() {
        Some(extent) => Millimeters(-(extent.0 / 2.0)),
        None => {
            info!("axis {} travel is unbounded, homing offset set to 0", axis);
            Millimeters(0.0)
        }
    }
}

/// Derive the full parameter record for one axis.
pub fn derive_axis(
    axis: AxisId,
    base: &BaseParameters,
    bundle: &ProfileBundle,
    constants: &AxisConstants,
) -> AxisParameters {
    let polarity = match bundle.polarity_override {
        Some(polarities) => polarities[axis.index()],
        None => constants.polarity,
    };

    AxisParameters {
        map_index: constants.map_index,
        mode: constants.mode,
        step_angle: base.motor.step_angle,
        microsteps: base.motor.microsteps,
        polarity,
        power_idle_enabled: constants.power_idle_enabled,
        limit_switch_enabled: constants.limit_switch_enabled,
        travel_per_rev: bundle.travel_per_rev_for(axis),
        travel_max: constants.travel,
        travel_warn: constants.travel,
        homing_enabled: constants.homing_enabled,
        homing_offset: derive_homing_offset(axis, constants.travel, bundle.homing_offset_override),
        homing_rate: base.homing.rate,
        homing_backoff: base.homing.backoff,
        seek_steps: bundle.seek_steps,
        feed_steps: bundle.feed_steps,
    }
}

/// Derive the parameter records for all axes, in mapping order.
pub fn derive_table(
    base: &BaseParameters,
    bundle: &ProfileBundle,
    constants: &[AxisConstants; AXIS_COUNT],
) -> [AxisParameters; AXIS_COUNT] {
    AxisId::ALL.map(|axis| derive_axis(axis, base, bundle, &constants[axis.index()]))
}

/// Recompute the fields that depend on `changed`.
///
/// Fields for which `is_pinned` returns true carry an explicit value and are
/// left alone.
pub fn rederive_dependents<F>(
    axis: AxisId,
    params: &mut AxisParameters,
    bundle: &ProfileBundle,
    changed: AxisField,
    is_pinned: F,
) where
    F: Fn(AxisField) -> bool,
{
    for &dependent in changed.dependents() {
        if is_pinned(dependent) {
            continue;
        }
        match dependent {
            AxisField::TravelWarn => params.travel_warn = params.travel_max,
            AxisField::HomingOffset => {
                params.homing_offset =
                    derive_homing_offset(axis, params.travel_max, bundle.homing_offset_override)
            }
            _ => {}
        }
    }
}
