//! Error types for cnc-settings.
//!
//! Three classes of failure exist: build errors abort startup, validation
//! errors reject a single proposed value, and persistence errors report that
//! an accepted value did not reach non-volatile storage.

use core::fmt;

use crate::config::{AxisId, AxisMode, MachineProfile, ParamId, ParamValue, ValueKind};
use crate::store::StorageFault;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all cnc-settings operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Defaults could not be assembled; startup must not continue
    Build(BuildError),
    /// A proposed value violates its field's constraint
    Validation(ValidationError),
    /// The storage collaborator failed to record an accepted value
    Persistence(PersistenceError),
}

/// Fatal errors detected while assembling the compiled defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// No machine profile was selected
    NoProfileSelected,
    /// More than one machine profile was selected
    MultipleProfilesSelected {
        /// First selected profile
        first: MachineProfile,
        /// Second selected profile
        second: MachineProfile,
    },
    /// Profile identifier does not name a supported profile
    UnknownProfile(heapless::String<32>),
    /// Axis mode is not legal for the axis class
    InvalidAxisMode {
        /// Offending axis
        axis: AxisId,
        /// Requested mode
        mode: AxisMode,
    },
    /// A compiled default violates its own field constraint
    InvalidDefault {
        /// Offending parameter
        param: ParamId,
        /// Constraint that was violated
        reason: ValidationError,
    },
    /// Failed to parse a TOML defaults file
    Parse(heapless::String<128>),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    Io(heapless::String<128>),
}

/// A proposed parameter value was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value has the wrong kind for the parameter
    TypeMismatch {
        /// Target parameter
        param: ParamId,
        /// Kind the parameter stores
        expected: ValueKind,
    },
    /// Microstep mode is not one of 1, 2, 4, 8
    InvalidMicrosteps(i32),
    /// Mode code is not legal for the axis class
    InvalidMode {
        /// Target axis
        axis: AxisId,
        /// Rejected mode code
        code: i32,
    },
    /// Value lies outside the parameter's range
    OutOfRange {
        /// Target parameter
        param: ParamId,
        /// Rejected value
        value: ParamValue,
    },
    /// Float value is NaN or infinite
    NotFinite(ParamId),
    /// Parameter name is not part of the field enumeration
    UnknownParameter(heapless::String<24>),
}

/// An accepted value could not be persisted.
///
/// The in-memory table already holds the new value when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceError {
    /// Parameter whose write failed
    pub param: ParamId,
    /// Fault reported by the storage collaborator
    pub fault: StorageFault,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Build(e) => write!(f, "Configuration build error: {}", e),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Persistence(e) => write!(f, "Persistence error: {}", e),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NoProfileSelected => write!(f, "No machine profile selected"),
            BuildError::MultipleProfilesSelected { first, second } => {
                write!(f, "Multiple machine profiles selected: '{}' and '{}'", first, second)
            }
            BuildError::UnknownProfile(name) => write!(f, "Unknown machine profile '{}'", name),
            BuildError::InvalidAxisMode { axis, mode } => {
                write!(f, "Mode {:?} is not valid for axis {}", mode, axis)
            }
            BuildError::InvalidDefault { param, reason } => {
                write!(f, "Default for '{}' is invalid: {}", param, reason)
            }
            BuildError::Parse(msg) => write!(f, "Parse error: {}", msg),
            #[cfg(feature = "std")]
            BuildError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TypeMismatch { param, expected } => {
                write!(f, "'{}' expects a {:?} value", param, expected)
            }
            ValidationError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8", v)
            }
            ValidationError::InvalidMode { axis, code } => {
                write!(f, "Mode {} is not valid for axis {}", code, axis)
            }
            ValidationError::OutOfRange { param, value } => {
                write!(f, "Value {} is out of range for '{}'", value, param)
            }
            ValidationError::NotFinite(param) => write!(f, "'{}' must be a finite number", param),
            ValidationError::UnknownParameter(name) => write!(f, "Unknown parameter '{}'", name),
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' was applied but not saved ({}); it will not survive a restart",
            self.param, self.fault
        )
    }
}

// Conversion impls
impl From<BuildError> for Error {
    fn from(e: BuildError) -> Self {
        Error::Build(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<PersistenceError> for Error {
    fn from(e: PersistenceError) -> Self {
        Error::Persistence(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

#[cfg(feature = "std")]
impl std::error::Error for PersistenceError {}
