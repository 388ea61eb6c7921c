//! Machine profiles and profile selection.
//!
//! A profile is a named bundle of mechanical base constants for a family of
//! machines. Exactly one profile is active per build; selection happens while
//! the defaults are assembled and never falls back to a default profile.

use core::fmt;
use core::str::FromStr;

use crate::error::BuildError;

use super::axis::{AxisId, Polarity, AXIS_COUNT};
use super::units::{Millimeters, StepsPerSec};

/// Supported machine profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineProfile {
    /// 10 TPI leadscrew machines (2.54 mm per revolution)
    CoarseLeadscrew,
    /// 1/4"-20 leadscrew machines (1.27 mm per revolution)
    FineLeadscrew,
    /// Belt-driven machines (Makerbot class)
    BeltDrive,
}

/// Base-value bundle supplied by a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBundle {
    /// Whole steps per second for G0 motion.
    pub seek_steps: StepsPerSec,
    /// Whole steps per second for feed motion.
    pub feed_steps: StepsPerSec,
    /// Travel per motor revolution shared by all axes.
    pub travel_per_rev: Millimeters,
    /// Per-axis exceptions to `travel_per_rev`, e.g. a geared rotary axis in degrees per revolution.
    pub travel_per_rev_overrides: [Option<Millimeters>; AXIS_COUNT],
    /// Homing offset that replaces the derived one on every axis.
    pub homing_offset_override: Option<Millimeters>,
    /// Motor polarities that replace the per-axis constants.
    pub polarity_override: Option<[Polarity; AXIS_COUNT]>,
}

impl ProfileBundle {
    /// Travel per revolution for an axis, honouring per-axis exceptions.
    #[inline]
    pub fn travel_per_rev_for(&self, axis: AxisId) -> Millimeters {
        self.travel_per_rev_overrides[axis.index()].unwrap_or(self.travel_per_rev)
    }
}

impl MachineProfile {
    /// All supported profiles.
    pub const ALL: [MachineProfile; 3] = [
        MachineProfile::CoarseLeadscrew,
        MachineProfile::FineLeadscrew,
        MachineProfile::BeltDrive,
    ];

    /// Profile selected for the compiled defaults.
    pub const COMPILED: MachineProfile = MachineProfile::CoarseLeadscrew;

    /// Base-value bundle for this profile.
    pub const fn bundle(self) -> ProfileBundle {
        match self {
            MachineProfile::CoarseLeadscrew => ProfileBundle {
                seek_steps: StepsPerSec(1000),
                feed_steps: StepsPerSec(1000),
                travel_per_rev: Millimeters(2.54),
                travel_per_rev_overrides: [None; AXIS_COUNT],
                homing_offset_override: None,
                polarity_override: None,
            },
            MachineProfile::FineLeadscrew => ProfileBundle {
                seek_steps: StepsPerSec(1000),
                feed_steps: StepsPerSec(1000),
                travel_per_rev: Millimeters(1.27),
                travel_per_rev_overrides: [None; AXIS_COUNT],
                homing_offset_override: None,
                polarity_override: None,
            },
            MachineProfile::BeltDrive => ProfileBundle {
                seek_steps: StepsPerSec(500),
                feed_steps: StepsPerSec(500),
                travel_per_rev: Millimeters(33.0),
                // Z stays on a leadscrew
                travel_per_rev_overrides: [None, None, Some(Millimeters(1.27)), None],
                homing_offset_override: Some(Millimeters(-50.0)),
                polarity_override: Some([
                    Polarity::Forward,
                    Polarity::Forward,
                    Polarity::Reverse,
                    Polarity::Reverse,
                ]),
            },
        }
    }

    /// Canonical identifier used in defaults files.
    pub const fn name(self) -> &'static str {
        match self {
            MachineProfile::CoarseLeadscrew => "coarse_leadscrew",
            MachineProfile::FineLeadscrew => "fine_leadscrew",
            MachineProfile::BeltDrive => "belt_drive",
        }
    }
}

impl fmt::Display for MachineProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MachineProfile {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coarse_leadscrew" | "leadscrew_10" => Ok(MachineProfile::CoarseLeadscrew),
            "fine_leadscrew" | "leadscrew_20" => Ok(MachineProfile::FineLeadscrew),
            "belt_drive" | "makerbot" => Ok(MachineProfile::BeltDrive),
            other => {
                let mut name = heapless::String::new();
                for c in other.chars() {
                    if name.push(c).is_err() {
                        break;
                    }
                }
                Err(BuildError::UnknownProfile(name))
            }
        }
    }
}

/// Pick the single active profile from the selected candidates.
///
/// Selecting the same profile twice still counts as two selections.
///
/// # Errors
///
/// - `BuildError::NoProfileSelected` if `selected` is empty
/// - `BuildError::MultipleProfilesSelected` if it holds more than one entry
pub fn select_profile(selected: &[MachineProfile]) -> Result<MachineProfile, BuildError> {
    match selected {
        [] => Err(BuildError::NoProfileSelected),
        [only] => Ok(*only),
        [first, second, ..] => Err(BuildError::MultipleProfilesSelected {
            first: *first,
            second: *second,
        }),
    }
}

/// Pick the single active profile from identifiers.
///
/// Every identifier is checked before the exactly-one rule is applied, so an
/// unknown name is reported even when several profiles are listed.
pub fn select_profile_named<S: AsRef<str>>(names: &[S]) -> Result<MachineProfile, BuildError> {
    let mut selected: heapless::Vec<MachineProfile, 8> = heapless::Vec::new();
    for name in names {
        let profile: MachineProfile = name.as_ref().parse()?;
        if selected.push(profile).is_err() {
            break;
        }
    }
    select_profile(&selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_exactly_one() {
        assert_eq!(
            select_profile(&[MachineProfile::FineLeadscrew]),
            Ok(MachineProfile::FineLeadscrew)
        );
    }

    #[test]
    fn test_select_none_fails() {
        assert_eq!(select_profile(&[]), Err(BuildError::NoProfileSelected));
    }

    #[test]
    fn test_select_two_fails() {
        let result = select_profile(&[MachineProfile::CoarseLeadscrew, MachineProfile::BeltDrive]);
        assert_eq!(
            result,
            Err(BuildError::MultipleProfilesSelected {
                first: MachineProfile::CoarseLeadscrew,
                second: MachineProfile::BeltDrive,
            })
        );
    }

    #[test]
    fn test_unknown_name_rejected() {
        let result = select_profile_named(&["laser_cutter"]);
        assert!(matches!(result, Err(BuildError::UnknownProfile(ref n)) if n.as_str() == "laser_cutter"));
    }

    #[test]
    fn test_aliases() {
        assert_eq!("leadscrew_20".parse::<MachineProfile>(), Ok(MachineProfile::FineLeadscrew));
        assert_eq!("makerbot".parse::<MachineProfile>(), Ok(MachineProfile::BeltDrive));
        for p in MachineProfile::ALL {
            assert_eq!(p.name().parse::<MachineProfile>(), Ok(p));
        }
    }

    #[test]
    fn test_belt_drive_z_exception() {
        let bundle = MachineProfile::BeltDrive.bundle();
        assert_eq!(bundle.travel_per_rev_for(AxisId::X), Millimeters(33.0));
        assert_eq!(bundle.travel_per_rev_for(AxisId::Z), Millimeters(1.27));
    }
}
