//! Compiled defaults and the defaults builder.

use crate::error::{Error, Result};

use super::axis::{AxisConstants, AxisId, AXIS_COUNT};
use super::derive::derive_table;
use super::global::{BaseParameters, GcodeDefaults, GlobalMachineParameters, HomingDefaults, MotorDefaults};
use super::profile::{select_profile, MachineProfile};
use super::resolved::ResolvedConfiguration;
use super::units::Travel;
use super::validation::{validate_constants, validate_resolved};

/// Everything the derivation engine needs: the active profile, the base
/// parameters and the per-axis constants.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineDefaults {
    profile: MachineProfile,
    base: BaseParameters,
    axes: [AxisConstants; AXIS_COUNT],
}

impl MachineDefaults {
    /// The compiled defaults table.
    pub const fn compiled() -> Self {
        Self {
            profile: MachineProfile::COMPILED,
            base: BaseParameters::COMPILED,
            axes: [
                AxisConstants::compiled(AxisId::X),
                AxisConstants::compiled(AxisId::Y),
                AxisConstants::compiled(AxisId::Z),
                AxisConstants::compiled(AxisId::A),
            ],
        }
    }

    /// Start assembling defaults with no profile selected.
    pub fn builder() -> DefaultsBuilder {
        DefaultsBuilder::new()
    }

    /// Active machine profile.
    pub fn profile(&self) -> MachineProfile {
        self.profile
    }

    /// Base parameters.
    pub fn base(&self) -> &BaseParameters {
        &self.base
    }

    /// Per-axis constants.
    pub fn axis_constants(&self, axis: AxisId) -> &AxisConstants {
        &self.axes[axis.index()]
    }

    /// Run the derivation engine over these defaults.
    pub fn resolve(&self) -> ResolvedConfiguration {
        let bundle = self.profile.bundle();
        ResolvedConfiguration {
            profile: self.profile,
            global: self.base.global,
            axes: derive_table(&self.base, &bundle, &self.axes),
        }
    }

    /// Check that the defaults satisfy every field constraint.
    ///
    /// # Errors
    ///
    /// Returns `Error::Build` naming the first offending axis or parameter.
    pub fn validate(&self) -> Result<()> {
        validate_constants(&self.axes)?;
        validate_resolved(&self.resolve())?;
        Ok(())
    }
}

impl Default for MachineDefaults {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Builder for [`MachineDefaults`].
///
/// Starts from the compiled base values and axis constants but with no
/// profile selected; exactly one call to [`profile`](Self::profile) or
/// [`profile_named`](Self::profile_named) is required.
#[derive(Debug, Clone)]
pub struct DefaultsBuilder {
    profiles: heapless::Vec<MachineProfile, 8>,
    error: Option<Error>,
    base: BaseParameters,
    axes: [AxisConstants; AXIS_COUNT],
}

impl Default for DefaultsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        let compiled = MachineDefaults::compiled();
        Self {
            profiles: heapless::Vec::new(),
            error: None,
            base: compiled.base,
            axes: compiled.axes,
        }
    }

    /// Select a machine profile.
    ///
    /// Every call adds a selection; more than one fails at [`build`](Self::build).
    pub fn profile(mut self, profile: MachineProfile) -> Self {
        // Overflow still leaves at least two entries, which build rejects
        let _ = self.profiles.push(profile);
        self
    }

    /// Select a machine profile by identifier.
    pub fn profile_named(mut self, name: &str) -> Self {
        match name.parse::<MachineProfile>() {
            Ok(profile) => self.profile(profile),
            Err(e) => {
                self.error.get_or_insert(Error::Build(e));
                self
            }
        }
    }

    /// Set the global machine parameters (keeps the current G-code defaults).
    pub fn global(mut self, global: GlobalMachineParameters) -> Self {
        let gcode = self.base.global.gcode;
        self.base.global = GlobalMachineParameters { gcode, ..global };
        self
    }

    /// Set the G-code power-on defaults.
    pub fn gcode(mut self, gcode: GcodeDefaults) -> Self {
        self.base.global.gcode = gcode;
        self
    }

    /// Set the shared motor constants.
    pub fn motor(mut self, motor: MotorDefaults) -> Self {
        self.base.motor = motor;
        self
    }

    /// Set the shared homing constants.
    pub fn homing(mut self, homing: HomingDefaults) -> Self {
        self.base.homing = homing;
        self
    }

    /// Replace the constants of one axis.
    pub fn axis(mut self, axis: AxisId, constants: AxisConstants) -> Self {
        self.axes[axis.index()] = constants;
        self
    }

    /// Set the travel extent of one axis.
    pub fn travel(mut self, axis: AxisId, travel: Travel) -> Self {
        self.axes[axis.index()].travel = travel;
        self
    }

    /// Build and validate the defaults.
    ///
    /// # Errors
    ///
    /// - `BuildError::UnknownProfile` for an unrecognised profile identifier
    /// - `BuildError::NoProfileSelected` / `MultipleProfilesSelected`
    /// - `BuildError::InvalidAxisMode` / `InvalidDefault` if a derived default is invalid
    pub fn build(self) -> Result<MachineDefaults> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let profile = select_profile(&self.profiles)?;

        let defaults = MachineDefaults {
            profile,
            base: self.base,
            axes: self.axes,
        };
        defaults.validate()?;
        Ok(defaults)
    }
}
