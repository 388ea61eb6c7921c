//! Resolved configuration store.
//!
//! Owns the table the planner and stepper driver read. The table is built
//! once from compiled defaults plus persisted overrides and afterwards only
//! changes through [`ConfigurationStore::set`]. Reads and the single-field
//! write each run inside one critical section, so a reader never observes a
//! partially updated axis record.
//!
//! Dependent fields cascade: changing `travel_max` re-derives `travel_warn`
//! and `homing_offset` unless those carry an explicit override of their own.
//! Only the field passed to `set` is persisted, and `initialize` applies the
//! same rule, so the table after a restart matches the live one.

mod storage;

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{
    rederive_dependents, validate_value, AxisField, AxisId, AxisParameters,
    GlobalMachineParameters, MachineDefaults, MachineProfile, ParamId, ParamValue,
    ResolvedConfiguration, PARAM_COUNT,
};
use crate::error::{PersistenceError, Result, ValidationError};

pub use storage::{MemoryStorage, OverrideStorage, Overrides, StorageFault};

#[cfg(feature = "defmt")]
use defmt::{debug, warn};

// Stub macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// A persisted override that failed validation during initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedOverride {
    /// Target parameter
    pub param: ParamId,
    /// Persisted value
    pub value: ParamValue,
    /// Constraint it violated
    pub reason: ValidationError,
}

/// Outcome of merging persisted overrides at initialization.
///
/// Rejected overrides and a failed load are not fatal: the compiled default
/// stays in place and the fact is reported here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitReport {
    /// Number of overrides applied.
    pub applied: usize,
    /// Overrides that failed validation.
    pub rejected: heapless::Vec<RejectedOverride, PARAM_COUNT>,
    /// Fault returned by `load`, if it failed.
    pub load_fault: Option<StorageFault>,
}

impl InitReport {
    /// True if every persisted override was applied.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.load_fault.is_none()
    }
}

/// Bit set over [`ParamId::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ParamMask(u128);

impl ParamMask {
    #[inline]
    fn insert(&mut self, param: ParamId) {
        self.0 |= 1u128 << param.index();
    }

    #[inline]
    fn contains(self, param: ParamId) -> bool {
        self.0 & (1u128 << param.index()) != 0
    }
}

#[derive(Debug, Clone)]
struct Table {
    config: ResolvedConfiguration,
    overridden: ParamMask,
}

impl Table {
    fn apply(
        &mut self,
        param: ParamId,
        value: ParamValue,
    ) -> core::result::Result<(), ValidationError> {
        self.config.apply(param, value)?;
        self.overridden.insert(param);

        if let ParamId::Axis(axis, field) = param {
            let bundle = self.config.profile.bundle();
            let overridden = self.overridden;
            rederive_dependents(
                axis,
                &mut self.config.axes[axis.index()],
                &bundle,
                field,
                |dependent| overridden.contains(ParamId::Axis(axis, dependent)),
            );
        }
        Ok(())
    }
}

/// The resolved configuration store.
pub struct ConfigurationStore<S: OverrideStorage> {
    table: Mutex<RefCell<Table>>,
    defaults: ResolvedConfiguration,
    storage: S,
}

impl<S: OverrideStorage> ConfigurationStore<S> {
    /// Build the store from the compiled defaults and persisted overrides.
    ///
    /// # Errors
    ///
    /// Returns `Error::Build` if the compiled defaults are invalid.
    pub fn initialize(storage: S) -> Result<(Self, InitReport)> {
        Self::initialize_with(&MachineDefaults::compiled(), storage)
    }

    /// Build the store from the given defaults and persisted overrides.
    ///
    /// Each persisted override is validated against the same constraints as
    /// a `set`; invalid ones are skipped and listed in the report.
    ///
    /// An override only replaces its own field, except that a persisted
    /// `travel_max` also re-derives `travel_warn` and `homing_offset` on that
    /// axis unless those carry persisted overrides of their own.
    ///
    /// # Errors
    ///
    /// Returns `Error::Build` if `defaults` are invalid.
    pub fn initialize_with(defaults: &MachineDefaults, storage: S) -> Result<(Self, InitReport)> {
        defaults.validate()?;
        let resolved = defaults.resolve();

        let mut table = Table {
            config: resolved,
            overridden: ParamMask::default(),
        };
        let mut report = InitReport::default();

        match storage.load() {
            Ok(overrides) => {
                for &(param, value) in overrides.iter() {
                    match table.apply(param, value) {
                        Ok(()) => report.applied += 1,
                        Err(reason) => {
                            warn!("persisted value for {} rejected, keeping default", param);
                            let _ = report.rejected.push(RejectedOverride {
                                param,
                                value,
                                reason,
                            });
                        }
                    }
                }
            }
            Err(fault) => {
                warn!("failed to load persisted overrides: {}", fault);
                report.load_fault = Some(fault);
            }
        }
        debug!("{} persisted overrides applied", report.applied);

        let store = Self {
            table: Mutex::new(RefCell::new(table)),
            defaults: resolved,
            storage,
        };
        Ok((store, report))
    }

    /// Current value of a parameter.
    pub fn get(&self, param: ParamId) -> ParamValue {
        critical_section::with(|cs| self.table.borrow_ref(cs).config.value(param))
    }

    /// Current value of an axis field.
    pub fn get_axis(&self, axis: AxisId, field: AxisField) -> ParamValue {
        self.get(ParamId::Axis(axis, field))
    }

    /// Copy of one axis record.
    pub fn axis(&self, axis: AxisId) -> AxisParameters {
        critical_section::with(|cs| *self.table.borrow_ref(cs).config.axis(axis))
    }

    /// Copy of the global parameters.
    pub fn global(&self) -> GlobalMachineParameters {
        critical_section::with(|cs| self.table.borrow_ref(cs).config.global)
    }

    /// Active machine profile.
    pub fn profile(&self) -> MachineProfile {
        self.defaults.profile
    }

    /// Consistent copy of the whole table, for use across a motion segment.
    pub fn snapshot(&self) -> ResolvedConfiguration {
        critical_section::with(|cs| self.table.borrow_ref(cs).config)
    }

    /// Compiled default of a parameter.
    pub fn default_value(&self, param: ParamId) -> ParamValue {
        self.defaults.value(param)
    }

    /// True if the parameter carries a persisted or `set` override.
    pub fn is_overridden(&self, param: ParamId) -> bool {
        critical_section::with(|cs| self.table.borrow_ref(cs).overridden.contains(param))
    }

    /// Validate and apply a new value, then persist it.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if the value violates the field's constraint; the
    ///   table is unchanged and nothing is persisted
    /// - `Error::Persistence` if storage failed; the new value is already live
    ///   but will not survive a restart
    pub fn set(&self, param: ParamId, value: ParamValue) -> Result<()> {
        validate_value(param, value)?;
        critical_section::with(|cs| self.table.borrow_ref_mut(cs).apply(param, value))?;

        self.storage
            .store(param, value)
            .map_err(|fault| PersistenceError { param, fault })?;
        Ok(())
    }

    /// Validate and apply a new value for an axis field, then persist it.
    pub fn set_axis(&self, axis: AxisId, field: AxisField, value: ParamValue) -> Result<()> {
        self.set(ParamId::Axis(axis, field), value)
    }

    /// Storage collaborator.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
