//! The plan TOML file: a student profile plus course placements.
//!
//! ```toml
//! [profile]
//! majors = ["FNCE"]
//! cu_load_preference = "normal"
//!
//! [[profile.waivers]]
//! core_code = "STAT_CORE"
//! waiver_type = "placement"
//!
//! [[placements]]
//! course_id = "MGMT6100"
//! location = "Y1F_Q1"
//! ```
//!
//! `sort_order` defaults to file order and `credit_units` to the catalog
//! value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coursehub_data::ReferenceData;

use super::store::{CoursePlan, PlanEditError, PlanLocation, Placement};
use crate::profile::{ProfileError, StudentProfile};

/// Credit units assumed for a course missing from the catalog.
pub const DEFAULT_CREDIT_UNITS: f64 = 0.5;

/// On-disk plan file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default)]
    pub profile: StudentProfile,
    #[serde(default)]
    pub placements: Vec<PlacementEntry>,
}

/// A `[[placements]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementEntry {
    pub course_id: String,
    /// `staging` or a quarter ID.
    pub location: PlanLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_units: Option<f64>,
}

/// A parsed and checked plan file.
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub profile: StudentProfile,
    pub plan: CoursePlan,
}

/// Errors that can occur while reading a plan file.
#[derive(Debug, Error)]
pub enum PlanFileError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("course {0} is placed more than once")]
    DuplicateCourse(String),

    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("course {course} has invalid credit units {credit_units}")]
    InvalidCreditUnits { course: String, credit_units: f64 },

    #[error(transparent)]
    Edit(#[from] PlanEditError),
}

/// Parse and check a plan file against the reference data.
///
/// Unknown course IDs are accepted: they load with
/// [`DEFAULT_CREDIT_UNITS`] unless the entry names its own.
pub fn parse_plan_file(
    content: &str,
    reference: &dyn ReferenceData,
) -> Result<LoadedPlan, PlanFileError> {
    let file: PlanFile = toml::from_str(content)?;
    file.profile.validate(reference)?;

    let mut seen = HashSet::new();
    for entry in &file.placements {
        if !seen.insert(entry.course_id.as_str()) {
            return Err(PlanFileError::DuplicateCourse(entry.course_id.clone()));
        }
    }

    let mut placements = Vec::with_capacity(file.placements.len());
    for (i, entry) in file.placements.into_iter().enumerate() {
        let credit_units = resolve_credit_units(&entry, reference)?;
        placements.push(Placement {
            sort_order: entry.sort_order.unwrap_or(i as u32),
            course_id: entry.course_id,
            location: entry.location,
            credit_units,
        });
    }

    let plan = CoursePlan::load(placements)?;
    tracing::debug!(
        courses = plan.all_course_ids().len(),
        majors = file.profile.majors.len(),
        "loaded plan file"
    );
    Ok(LoadedPlan {
        profile: file.profile,
        plan,
    })
}

fn resolve_credit_units(
    entry: &PlacementEntry,
    reference: &dyn ReferenceData,
) -> Result<f64, PlanFileError> {
    let known = reference.resolve_course(&entry.course_id);
    if known.is_none() {
        tracing::warn!(course = %entry.course_id, "course not in catalog");
    }

    match (entry.credit_units, known) {
        (Some(cu), _) if cu.is_nan() || cu <= 0.0 => Err(PlanFileError::InvalidCreditUnits {
            course: entry.course_id.clone(),
            credit_units: cu,
        }),
        (Some(cu), _) => Ok(cu),
        (None, Some(course)) => Ok(course.credit_units),
        (None, None) => Ok(DEFAULT_CREDIT_UNITS),
    }
}

impl PlanFile {
    /// Capture `plan` and `profile` with explicit sort orders and credit
    /// units.
    pub fn from_plan(profile: &StudentProfile, plan: &CoursePlan) -> Self {
        Self {
            profile: profile.clone(),
            placements: plan
                .placements()
                .into_iter()
                .map(|p| PlacementEntry {
                    course_id: p.course_id.clone(),
                    location: p.location,
                    sort_order: Some(p.sort_order),
                    credit_units: Some(p.credit_units),
                })
                .collect(),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
