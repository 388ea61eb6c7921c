//! # cnc-settings
//!
//! Machine configuration parameter model for CNC motion controllers.
//!
//! ## Features
//!
//! - **Machine profiles**: Exactly one leadscrew or belt-drive profile supplies the mechanical base values
//! - **Derived values**: Per-axis step rates, travel and homing offsets computed by pure functions
//! - **Closed parameter set**: Every field addressable as a [`ParamId`] for command interfaces
//! - **Persisted overrides**: Compiled defaults < valid persisted overrides, validated the same way as `set`
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cnc_settings::{AxisField, AxisId, ConfigurationStore, MemoryStorage, ParamValue};
//!
//! // Compiled defaults merged with whatever storage holds
//! let (store, report) = ConfigurationStore::initialize(MemoryStorage::new())?;
//! assert!(report.is_clean());
//!
//! // Homing offset is derived from travel
//! assert_eq!(store.get_axis(AxisId::X, AxisField::HomingOffset), ParamValue::Float(-200.0));
//!
//! // Runtime change from the command interface
//! store.set_axis(AxisId::X, AxisField::TravelMax, ParamValue::Float(300.0))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables TOML defaults files and the host critical-section implementation
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod store;

// Re-exports for ergonomic API
pub use config::{
    AxisField, AxisId, AxisMode, AxisParameters, GlobalField, GlobalMachineParameters,
    MachineDefaults, MachineProfile, ParamId, ParamValue, ResolvedConfiguration,
};
pub use error::{BuildError, Error, PersistenceError, Result, ValidationError};
pub use store::{ConfigurationStore, InitReport, MemoryStorage, OverrideStorage, StorageFault};

// Defaults loading (std only)
#[cfg(feature = "std")]
pub use config::{load_defaults, parse_defaults};

// Unit types
pub use config::units::{Degrees, Microsteps, Millimeters, MmPerMin, StepsPerSec, Travel};
