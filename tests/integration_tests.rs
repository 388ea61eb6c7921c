//! Integration tests for cnc-settings.
//!
//! These tests exercise the complete workflow from defaults assembly through
//! persisted overrides to runtime `set` calls.

use std::cell::Cell;

use cnc_settings::config::{
    validate_value, AxisField, AxisId, GlobalField, MachineDefaults, MachineProfile, ParamId,
    ParamValue, Travel, PARAM_COUNT,
};
use cnc_settings::store::{ConfigurationStore, MemoryStorage, OverrideStorage, Overrides, StorageFault};
use cnc_settings::{BuildError, Error, PersistenceError, ValidationError};

// =============================================================================
// Test storage doubles
// =============================================================================

/// Wraps a `MemoryStorage`, counting writes and optionally failing them.
struct CountingStorage {
    inner: MemoryStorage,
    stores: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl CountingStorage {
    fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            stores: Cell::new(0),
            fail_writes: Cell::new(false),
        }
    }
}

impl OverrideStorage for CountingStorage {
    fn load(&self) -> Result<Overrides, StorageFault> {
        self.inner.load()
    }

    fn store(&self, param: ParamId, value: ParamValue) -> Result<(), StorageFault> {
        self.stores.set(self.stores.get() + 1);
        if self.fail_writes.get() {
            return Err(StorageFault::WriteFailed);
        }
        self.inner.store(param, value)
    }
}

/// Storage whose medium never answers.
struct DeadStorage;

impl OverrideStorage for DeadStorage {
    fn load(&self) -> Result<Overrides, StorageFault> {
        Err(StorageFault::Unavailable)
    }

    fn store(&self, _param: ParamId, _value: ParamValue) -> Result<(), StorageFault> {
        Err(StorageFault::Unavailable)
    }
}

fn axis(axis: AxisId, field: AxisField) -> ParamId {
    ParamId::Axis(axis, field)
}

fn virgin_store() -> ConfigurationStore<CountingStorage> {
    let (store, report) =
        ConfigurationStore::initialize(CountingStorage::new(MemoryStorage::new())).unwrap();
    assert!(report.is_clean());
    store
}

// =============================================================================
// Compiled defaults
// =============================================================================

#[test]
fn compiled_defaults_satisfy_every_field_constraint() {
    let store = virgin_store();

    let mut checked = 0;
    for param in ParamId::all() {
        let value = store.get(param);
        assert!(
            validate_value(param, value).is_ok(),
            "{} = {} violates its constraint",
            param,
            value
        );
        checked += 1;
    }
    assert_eq!(checked, PARAM_COUNT);
}

#[test]
fn compiled_axis_table_matches_settings() {
    let store = virgin_store();

    for id in [AxisId::X, AxisId::Y, AxisId::Z] {
        let params = store.axis(id);
        assert_eq!(params.map_index as usize, id.index());
        assert_eq!(params.travel_per_rev.value(), 2.54);
        assert_eq!(params.seek_steps.value(), 1000);
        assert_eq!(params.feed_steps.value(), 1000);
        assert_eq!(params.microsteps.value(), 8);
        assert!(params.limit_switch_enabled);
        assert_eq!(params.travel_warn, params.travel_max);
    }

    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-200.0));
    assert_eq!(store.get(axis(AxisId::Y, AxisField::HomingOffset)), ParamValue::Float(-200.0));
    assert_eq!(store.get(axis(AxisId::Z, AxisField::HomingOffset)), ParamValue::Float(-25.0));

    let a = store.axis(AxisId::A);
    assert_eq!(a.travel_max, Travel::Unbounded);
    assert_eq!(a.travel_warn, Travel::Unbounded);
    assert_eq!(a.homing_offset.value(), 0.0);
    assert!(!a.limit_switch_enabled);
    assert_eq!(store.get(axis(AxisId::A, AxisField::Polarity)), ParamValue::Int(1));
}

#[test]
fn compiled_globals_match_settings() {
    let store = virgin_store();
    let global = store.global();

    assert_eq!(global.arc_segment_length.value(), 0.05);
    assert_eq!(global.min_segment_time_us, 20_000.0);
    assert_eq!(global.max_linear_jerk, 1_000_000.0);
    assert_eq!(global.max_angular_jerk, 100_000_000.0);
    assert!(!global.power_on_homing);
    assert_eq!(global.gcode.tool, 1);
    assert_eq!(store.get(ParamId::Global(GlobalField::GcodeFeedRate)), ParamValue::Float(400.0));
    assert_eq!(
        store.get(ParamId::Global(GlobalField::GcodeSpindleSpeed)),
        ParamValue::Float(1500.0)
    );
    assert_eq!(store.profile(), MachineProfile::CoarseLeadscrew);
}

// =============================================================================
// Profile selection
// =============================================================================

#[test]
fn two_profiles_is_a_build_error() {
    let result = MachineDefaults::builder()
        .profile(MachineProfile::CoarseLeadscrew)
        .profile(MachineProfile::FineLeadscrew)
        .build();

    assert_eq!(
        result,
        Err(Error::Build(BuildError::MultipleProfilesSelected {
            first: MachineProfile::CoarseLeadscrew,
            second: MachineProfile::FineLeadscrew,
        }))
    );
}

#[test]
fn belt_drive_profile_resolves_through_store() {
    let defaults = MachineDefaults::builder()
        .profile_named("makerbot")
        .build()
        .expect("belt drive defaults should build");
    let (store, _) = ConfigurationStore::initialize_with(&defaults, MemoryStorage::new()).unwrap();

    assert_eq!(store.profile(), MachineProfile::BeltDrive);
    assert_eq!(store.get(axis(AxisId::X, AxisField::SeekSteps)), ParamValue::Int(500));
    assert_eq!(store.get(axis(AxisId::Z, AxisField::TravelPerRev)), ParamValue::Float(1.27));
    assert_eq!(store.get(axis(AxisId::A, AxisField::HomingOffset)), ParamValue::Float(-50.0));
}

// =============================================================================
// Persisted overrides at initialization
// =============================================================================

#[test]
fn valid_override_wins_for_that_field_only() {
    let persisted = MemoryStorage::with_overrides([(
        axis(AxisId::Y, AxisField::Microsteps),
        ParamValue::Int(2),
    )]);
    let (store, report) = ConfigurationStore::initialize(persisted).unwrap();

    assert_eq!(report.applied, 1);
    assert!(report.is_clean());
    assert_eq!(store.get(axis(AxisId::Y, AxisField::Microsteps)), ParamValue::Int(2));

    let defaults = MachineDefaults::compiled().resolve();
    for param in ParamId::all() {
        if param != axis(AxisId::Y, AxisField::Microsteps) {
            assert_eq!(store.get(param), defaults.value(param), "{} changed", param);
        }
    }
}

#[test]
fn invalid_override_is_reported_and_default_kept() {
    let persisted = MemoryStorage::with_overrides([
        (axis(AxisId::X, AxisField::Microsteps), ParamValue::Int(3)),
        (axis(AxisId::Z, AxisField::HomingEnabled), ParamValue::Bool(true)),
    ]);
    let (store, report) = ConfigurationStore::initialize(persisted).unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(report.rejected.len(), 1);
    let rejected = &report.rejected[0];
    assert_eq!(rejected.param, axis(AxisId::X, AxisField::Microsteps));
    assert_eq!(rejected.reason, ValidationError::InvalidMicrosteps(3));

    assert_eq!(store.get(axis(AxisId::X, AxisField::Microsteps)), ParamValue::Int(8));
    assert!(!store.is_overridden(axis(AxisId::X, AxisField::Microsteps)));
    assert!(store.axis(AxisId::Z).homing_enabled);
}

#[test]
fn load_failure_falls_back_to_defaults() {
    let (store, report) = ConfigurationStore::initialize(DeadStorage).unwrap();

    assert_eq!(report.load_fault, Some(StorageFault::Unavailable));
    assert!(!report.is_clean());
    assert_eq!(store.snapshot(), MachineDefaults::compiled().resolve());
}

#[test]
fn persisted_travel_rederives_dependents() {
    let persisted = MemoryStorage::with_overrides([(
        axis(AxisId::X, AxisField::TravelMax),
        ParamValue::Float(300.0),
    )]);
    let (store, _) = ConfigurationStore::initialize(persisted).unwrap();

    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-150.0));
    assert_eq!(store.get(axis(AxisId::X, AxisField::TravelWarn)), ParamValue::Float(300.0));
}

#[test]
fn persisted_homing_offset_is_not_rederived() {
    // Order in storage must not matter
    let persisted = MemoryStorage::with_overrides([
        (axis(AxisId::X, AxisField::HomingOffset), ParamValue::Float(-10.0)),
        (axis(AxisId::X, AxisField::TravelMax), ParamValue::Float(300.0)),
    ]);
    let (store, _) = ConfigurationStore::initialize(persisted).unwrap();

    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-10.0));
    assert_eq!(store.get(axis(AxisId::X, AxisField::TravelWarn)), ParamValue::Float(300.0));
}

// =============================================================================
// Runtime set
// =============================================================================

#[test]
fn set_invalid_microsteps_leaves_value_unchanged() {
    let store = virgin_store();
    let param = axis(AxisId::X, AxisField::Microsteps);

    let result = store.set(param, ParamValue::Int(3));

    assert_eq!(result, Err(Error::Validation(ValidationError::InvalidMicrosteps(3))));
    assert_eq!(store.get(param), ParamValue::Int(8));
    assert_eq!(store.storage().stores.get(), 0);
}

#[test]
fn set_wrong_kind_is_a_validation_error() {
    let store = virgin_store();
    let result = store.set(axis(AxisId::Y, AxisField::LimitSwitch), ParamValue::Int(0));
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::TypeMismatch { .. }))
    ));
}

#[test]
fn set_valid_value_is_visible_and_stored_once() {
    let store = virgin_store();
    let param = axis(AxisId::Z, AxisField::Microsteps);

    store.set(param, ParamValue::Int(4)).unwrap();

    assert_eq!(store.get(param), ParamValue::Int(4));
    assert_eq!(store.storage().stores.get(), 1);
    assert_eq!(store.storage().inner.get(param), Some(ParamValue::Int(4)));
}

#[test]
fn set_with_failing_storage_keeps_new_value() {
    let store = virgin_store();
    store.storage().fail_writes.set(true);
    let param = axis(AxisId::A, AxisField::Mode);

    let result = store.set(param, ParamValue::Int(1));

    assert_eq!(
        result,
        Err(Error::Persistence(PersistenceError {
            param,
            fault: StorageFault::WriteFailed,
        }))
    );
    assert_eq!(store.get(param), ParamValue::Int(1));
    assert_eq!(store.storage().stores.get(), 1);
}

#[test]
fn set_travel_max_cascades_to_homing_offset() {
    let store = virgin_store();
    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-200.0));

    store
        .set(axis(AxisId::X, AxisField::TravelMax), ParamValue::Float(300.0))
        .unwrap();

    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-150.0));
    assert_eq!(store.get(axis(AxisId::X, AxisField::TravelWarn)), ParamValue::Float(300.0));
    // Only the base field is persisted
    assert_eq!(store.storage().stores.get(), 1);
}

#[test]
fn set_travel_to_unbounded_zeroes_homing_offset() {
    let store = virgin_store();
    store
        .set(axis(AxisId::Y, AxisField::TravelMax), ParamValue::Float(Travel::UNBOUNDED_RAW))
        .unwrap();

    assert_eq!(store.axis(AxisId::Y).travel_max, Travel::Unbounded);
    assert_eq!(store.axis(AxisId::Y).travel_warn, Travel::Unbounded);
    assert_eq!(store.get(axis(AxisId::Y, AxisField::HomingOffset)), ParamValue::Float(0.0));
}

#[test]
fn explicit_homing_offset_survives_travel_change() {
    let store = virgin_store();
    store
        .set(axis(AxisId::X, AxisField::HomingOffset), ParamValue::Float(-12.5))
        .unwrap();
    store
        .set(axis(AxisId::X, AxisField::TravelMax), ParamValue::Float(250.0))
        .unwrap();

    assert_eq!(store.get(axis(AxisId::X, AxisField::HomingOffset)), ParamValue::Float(-12.5));
    assert_eq!(store.get(axis(AxisId::X, AxisField::TravelWarn)), ParamValue::Float(250.0));
}

#[test]
fn restart_reproduces_live_table() {
    let storage = MemoryStorage::new();
    let live = {
        let (store, _) = ConfigurationStore::initialize(&storage).unwrap();
        store
            .set(axis(AxisId::X, AxisField::TravelMax), ParamValue::Float(300.0))
            .unwrap();
        store
            .set(axis(AxisId::Z, AxisField::HomingOffset), ParamValue::Float(-5.0))
            .unwrap();
        store
            .set(ParamId::Global(GlobalField::GcodePathControl), ParamValue::Int(2))
            .unwrap();
        store.snapshot()
    };

    let (restarted, report) = ConfigurationStore::initialize(&storage).unwrap();
    assert_eq!(report.applied, 3);
    assert_eq!(restarted.snapshot(), live);
}

// =============================================================================
// Concurrent readers
// =============================================================================

#[test]
fn readers_never_see_torn_axis_records() {
    let (store, _) = ConfigurationStore::initialize(MemoryStorage::new()).unwrap();
    let travel = axis(AxisId::X, AxisField::TravelMax);

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..500 {
                let t = 100.0 + (i % 50) as f32 * 2.0;
                store.set(travel, ParamValue::Float(t)).unwrap();
            }
        });

        for _ in 0..2 {
            s.spawn(|| {
                for _ in 0..500 {
                    let x = store.snapshot().axes[AxisId::X.index()];
                    let extent = x.travel_max.extent().unwrap().value();
                    assert_eq!(x.homing_offset.value(), -(extent / 2.0));
                    assert_eq!(x.travel_warn, x.travel_max);
                }
            });
        }
    });
}

// =============================================================================
// Command interface naming
// =============================================================================

#[test]
fn parameter_names_round_trip() {
    for param in ParamId::all() {
        let name = param.to_string();
        assert_eq!(name.parse::<ParamId>(), Ok(param), "{}", name);
    }
}

#[test]
fn set_by_name() {
    let store = virgin_store();
    let param: ParamId = "z.travel_max".parse().unwrap();
    store.set(param, ParamValue::Float(80.0)).unwrap();
    assert_eq!(store.get_axis(AxisId::Z, AxisField::HomingOffset), ParamValue::Float(-40.0));
}
