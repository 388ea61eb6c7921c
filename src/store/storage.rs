//! Storage collaborator interface.
//!
//! The persisted representation belongs to the storage implementation; the
//! store only exchanges `(ParamId, ParamValue)` pairs with it.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::config::{ParamId, ParamValue, PARAM_COUNT};

/// Persisted overrides returned by [`OverrideStorage::load`].
///
/// Partially populated; when a parameter appears twice the later entry wins.
pub type Overrides = heapless::Vec<(ParamId, ParamValue), PARAM_COUNT>;

/// Faults reported by a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageFault {
    /// Storage medium not present or not responding
    Unavailable,
    /// Write did not complete
    WriteFailed,
    /// No room left for another record
    Full,
    /// Persisted data failed its integrity check
    Corrupted,
}

impl fmt::Display for StorageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFault::Unavailable => write!(f, "storage unavailable"),
            StorageFault::WriteFailed => write!(f, "storage write failed"),
            StorageFault::Full => write!(f, "storage full"),
            StorageFault::Corrupted => write!(f, "stored data corrupted"),
        }
    }
}

/// Non-volatile store for parameter overrides.
///
/// Methods take `&self`: the backend owns whatever locking its medium needs,
/// so a slow write never runs while the resolved table is locked.
pub trait OverrideStorage {
    /// Read every persisted override.
    fn load(&self) -> Result<Overrides, StorageFault>;

    /// Durably record one override.
    fn store(&self, param: ParamId, value: ParamValue) -> Result<(), StorageFault>;
}

impl<T: OverrideStorage + ?Sized> OverrideStorage for &T {
    fn load(&self) -> Result<Overrides, StorageFault> {
        (**self).load()
    }

    fn store(&self, param: ParamId, value: ParamValue) -> Result<(), StorageFault> {
        (**self).store(param, value)
    }
}

/// In-RAM override storage for host builds and simulation.
///
/// Keeps one word per parameter, indexed by [`ParamId::index`], the way a
/// fixed-layout EEPROM table would.
pub struct MemoryStorage {
    words: Mutex<RefCell<[Option<u32>; PARAM_COUNT]>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Create an empty (virgin) storage.
    pub const fn new() -> Self {
        Self {
            words: Mutex::new(RefCell::new([None; PARAM_COUNT])),
        }
    }

    /// Create a storage pre-populated with overrides.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (ParamId, ParamValue)>,
    {
        let storage = Self::new();
        for (param, value) in overrides {
            storage.write(param, value);
        }
        storage
    }

    /// Persisted value of a parameter, if any.
    pub fn get(&self, param: ParamId) -> Option<ParamValue> {
        let word = critical_section::with(|cs| self.words.borrow_ref(cs)[param.index()]);
        word.map(|bits| ParamValue::from_bits(bits, param.kind()))
    }

    /// Number of persisted overrides.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| {
            self.words.borrow_ref(cs).iter().filter(|w| w.is_some()).count()
        })
    }

    /// True if nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, param: ParamId, value: ParamValue) {
        critical_section::with(|cs| {
            self.words.borrow_ref_mut(cs)[param.index()] = Some(value.to_bits());
        });
    }
}

impl OverrideStorage for MemoryStorage {
    fn load(&self) -> Result<Overrides, StorageFault> {
        let mut overrides = Overrides::new();
        for param in ParamId::all() {
            if let Some(value) = self.get(param) {
                overrides.push((param, value)).map_err(|_| StorageFault::Full)?;
            }
        }
        Ok(overrides)
    }

    fn store(&self, param: ParamId, value: ParamValue) -> Result<(), StorageFault> {
        self.write(param, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisField, AxisId};

    #[test]
    fn test_virgin_storage_loads_nothing() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_store_then_load() {
        let storage = MemoryStorage::new();
        let param = ParamId::Axis(AxisId::Z, AxisField::Microsteps);
        storage.store(param, ParamValue::Int(4)).unwrap();

        let overrides = storage.load().unwrap();
        assert_eq!(overrides.as_slice(), &[(param, ParamValue::Int(4))]);
        assert_eq!(storage.len(), 1);
    }
}
