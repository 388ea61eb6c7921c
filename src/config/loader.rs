//! Defaults loading from files (std only).
//!
//! A defaults file selects the machine profile and patches the compiled
//! values:
//!
//! ```toml
//! profiles = ["belt_drive"]
//!
//! [machine]
//! max_linear_jerk = 5000000.0
//!
//! [gcode]
//! feed_rate = 600.0
//!
//! [axes.z]
//! travel = 80.0
//! homing = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BuildError, Error, Result};

use super::axis::{AxisConstants, AxisId, AxisMode, Polarity};
use super::defaults::{DefaultsBuilder, MachineDefaults};
use super::global::{GcodeDefaults, GlobalMachineParameters, HomingDefaults, MotorDefaults};
use super::units::Travel;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefaultsFile {
    profiles: heapless::Vec<heapless::String<32>, 8>,
    #[serde(default)]
    machine: Option<GlobalMachineParameters>,
    #[serde(default)]
    gcode: Option<GcodeDefaults>,
    #[serde(default)]
    motor: Option<MotorDefaults>,
    #[serde(default)]
    homing: Option<HomingDefaults>,
    #[serde(default)]
    axes: AxesFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxesFile {
    x: Option<AxisPatch>,
    y: Option<AxisPatch>,
    z: Option<AxisPatch>,
    a: Option<AxisPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisPatch {
    map_index: Option<u8>,
    mode: Option<AxisMode>,
    polarity: Option<Polarity>,
    power_idle: Option<bool>,
    limit_switch: Option<bool>,
    homing: Option<bool>,
    travel: Option<Travel>,
}

impl AxisPatch {
    fn apply_to(&self, mut constants: AxisConstants) -> AxisConstants {
        if let Some(v) = self.map_index {
            constants.map_index = v;
        }
        if let Some(v) = self.mode {
            constants.mode = v;
        }
        if let Some(v) = self.polarity {
            constants.polarity = v;
        }
        if let Some(v) = self.power_idle {
            constants.power_idle_enabled = v;
        }
        if let Some(v) = self.limit_switch {
            constants.limit_switch_enabled = v;
        }
        if let Some(v) = self.homing {
            constants.homing_enabled = v;
        }
        if let Some(v) = self.travel {
            constants.travel = v;
        }
        constants
    }
}

/// Load defaults from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// resulting defaults fail to build.
///
/// # Example
///
/// ```rust,ignore
/// use cnc_settings::load_defaults;
///
/// let defaults = load_defaults("machine.toml")?;
/// ```
pub fn load_defaults<P: AsRef<Path>>(path: P) -> Result<MachineDefaults> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Build(BuildError::Io(msg))
    })?;

    parse_defaults(&content)
}

/// Parse defaults from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or the defaults fail to build.
pub fn parse_defaults(content: &str) -> Result<MachineDefaults> {
    let file: DefaultsFile = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Build(BuildError::Parse(msg))
    })?;

    let mut builder = DefaultsBuilder::new();
    for name in &file.profiles {
        builder = builder.profile_named(name.as_str());
    }
    if let Some(machine) = file.machine {
        builder = builder.global(machine);
    }
    if let Some(gcode) = file.gcode {
        builder = builder.gcode(gcode);
    }
    if let Some(motor) = file.motor {
        builder = builder.motor(motor);
    }
    if let Some(homing) = file.homing {
        builder = builder.homing(homing);
    }

    let patches = [&file.axes.x, &file.axes.y, &file.axes.z, &file.axes.a];
    for (axis, patch) in AxisId::ALL.into_iter().zip(patches) {
        if let Some(patch) = patch {
            builder = builder.axis(axis, patch.apply_to(AxisConstants::compiled(axis)));
        }
    }

    builder.build()
}

fn truncated(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
