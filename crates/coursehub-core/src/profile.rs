//! Student profile: declared majors, core waivers and load preference.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coursehub_data::ReferenceData;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a core requirement is waived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverType {
    /// Exempt outright.
    Waiver,
    /// Replaced by upper-level coursework.
    Substitution,
    /// Placed out of the standard course into a next-level one.
    Placement,
}

impl fmt::Display for WaiverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Waiver => "waiver",
            Self::Substitution => "substitution",
            Self::Placement => "placement",
        };
        f.write_str(s)
    }
}

impl FromStr for WaiverType {
    type Err = WaiverTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiver" => Ok(Self::Waiver),
            "substitution" => Ok(Self::Substitution),
            "placement" => Ok(Self::Placement),
            other => Err(WaiverTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`WaiverType`] string.
#[derive(Debug, Clone)]
pub struct WaiverTypeParseError(pub String);

impl fmt::Display for WaiverTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid waiver type: {:?} (expected waiver, substitution, or placement)",
            self.0
        )
    }
}

impl std::error::Error for WaiverTypeParseError {}

// ---------------------------------------------------------------------------

/// Preferred course load, in CU per quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CuLoadPreference {
    Light,
    #[default]
    Normal,
    Heavy,
}

impl CuLoadPreference {
    /// Target CU per quarter for this preference.
    pub fn target_cu_per_quarter(self) -> f64 {
        match self {
            Self::Light => 2.0,
            Self::Normal => 2.5,
            Self::Heavy => 3.0,
        }
    }
}

impl fmt::Display for CuLoadPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Heavy => "heavy",
        };
        f.write_str(s)
    }
}

impl FromStr for CuLoadPreference {
    type Err = CuLoadPreferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "normal" => Ok(Self::Normal),
            "heavy" => Ok(Self::Heavy),
            other => Err(CuLoadPreferenceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`CuLoadPreference`] string.
#[derive(Debug, Clone)]
pub struct CuLoadPreferenceParseError(pub String);

impl fmt::Display for CuLoadPreferenceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid load preference: {:?} (expected light, normal, or heavy)",
            self.0
        )
    }
}

impl std::error::Error for CuLoadPreferenceParseError {}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A student-supplied waiver on one core requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaiverConfig {
    pub core_code: String,
    pub waiver_type: WaiverType,
    /// Specific course the student will substitute with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution_course_id: Option<String>,
}

impl WaiverConfig {
    pub fn new(core_code: impl Into<String>, waiver_type: WaiverType) -> Self {
        Self {
            core_code: core_code.into(),
            waiver_type,
            substitution_course_id: None,
        }
    }
}

/// Errors found when checking a [`StudentProfile`] against the reference data.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("more than one waiver for core requirement {0:?}")]
    DuplicateWaiver(String),

    #[error("waiver names unknown core requirement {0:?}")]
    UnknownCoreCode(String),

    #[error(
        "waiver on {core_code:?} names a substitute course but is a {waiver_type} waiver (only substitution waivers take one)"
    )]
    SubstituteCourseNotAllowed {
        core_code: String,
        waiver_type: WaiverType,
    },

    #[error("major {0:?} declared more than once")]
    DuplicateMajor(String),
}

/// The student inputs the validator needs besides the plan itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub majors: Vec<String>,
    #[serde(default)]
    pub cu_load_preference: CuLoadPreference,
    #[serde(default)]
    pub waivers: Vec<WaiverConfig>,
}

impl StudentProfile {
    /// The active waiver on `core_code`, if any.
    pub fn waiver_for(&self, core_code: &str) -> Option<&WaiverConfig> {
        self.waivers.iter().find(|w| w.core_code == core_code)
    }

    pub fn has_major(&self, major_code: &str) -> bool {
        self.majors.iter().any(|m| m == major_code)
    }

    /// Check the profile's structural rules.
    ///
    /// Unknown major codes are allowed: the validator reports them as
    /// zero-progress majors.
    pub fn validate(&self, reference: &dyn ReferenceData) -> Result<(), ProfileError> {
        let mut majors = HashSet::new();
        for major in &self.majors {
            if !majors.insert(major.as_str()) {
                return Err(ProfileError::DuplicateMajor(major.clone()));
            }
        }

        let mut seen = HashSet::new();
        for waiver in &self.waivers {
            if !seen.insert(waiver.core_code.as_str()) {
                return Err(ProfileError::DuplicateWaiver(waiver.core_code.clone()));
            }
            if !reference
                .core_requirements()
                .iter()
                .any(|r| r.core_code == waiver.core_code)
            {
                return Err(ProfileError::UnknownCoreCode(waiver.core_code.clone()));
            }
            if waiver.substitution_course_id.is_some()
                && waiver.waiver_type != WaiverType::Substitution
            {
                return Err(ProfileError::SubstituteCourseNotAllowed {
                    core_code: waiver.core_code.clone(),
                    waiver_type: waiver.waiver_type,
                });
            }
        }

        Ok(())
    }
}
