//! Configuration module for cnc-settings.
//!
//! Provides the machine profiles, base parameters, per-axis records and the
//! derivation engine that combines them, plus loading of defaults files
//! (with `std` feature).

mod axis;
mod defaults;
mod derive;
mod global;
#[cfg(feature = "std")]
mod loader;
mod param;
mod profile;
mod resolved;
pub mod units;
mod validation;

pub use axis::{AxisConstants, AxisId, AxisMode, AxisParameters, Polarity, AXIS_COUNT};
pub use defaults::{DefaultsBuilder, MachineDefaults};
pub use derive::{derive_axis, derive_homing_offset, derive_table, rederive_dependents};
pub use global::{
    BaseParameters, CanonPlane, GcodeDefaults, GlobalMachineParameters, HomingDefaults,
    MotorDefaults, PathControl, UnitsMode, RADIAN,
};
pub use param::{
    AxisField, GlobalField, ParamId, ParamValue, ValueKind, AXIS_FIELD_COUNT, GLOBAL_FIELD_COUNT,
    PARAM_COUNT,
};
pub use profile::{select_profile, select_profile_named, MachineProfile, ProfileBundle};
pub use resolved::ResolvedConfiguration;
pub use validation::{validate_constants, validate_resolved, validate_value};

#[cfg(feature = "std")]
pub use loader::{load_defaults, parse_defaults};

// Re-export unit types at config level
pub use units::{Degrees, Microsteps, Millimeters, MmPerMin, StepsPerSec, Travel};
