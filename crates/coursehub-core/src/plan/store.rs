//! The editable course plan.
//!
//! A [`CoursePlan`] holds one [`Placement`] per course and keeps an ordered
//! listing for the staging area and each quarter. Every mutation re-indexes
//! the sort orders of the containers it touches, so `sort_order` always
//! equals the course's position in its container.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::calendar::{QuarterId, SemesterId, normalize_quarter_for_course};
use crate::profile::StudentProfile;
use crate::validation::{QuarterOrder, ValidatePlanInput};

// ---------------------------------------------------------------------------
// PlanLocation
// ---------------------------------------------------------------------------

/// Where a course sits in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlanLocation {
    /// Chosen but not yet scheduled.
    Staging,
    Quarter(QuarterId),
}

impl fmt::Display for PlanLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging => f.write_str("staging"),
            Self::Quarter(q) => write!(f, "{q}"),
        }
    }
}

impl FromStr for PlanLocation {
    type Err = PlanLocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "staging" {
            return Ok(Self::Staging);
        }
        s.parse::<QuarterId>()
            .map(Self::Quarter)
            .map_err(|_| PlanLocationParseError(s.to_owned()))
    }
}

impl TryFrom<String> for PlanLocation {
    type Error = PlanLocationParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PlanLocation> for String {
    fn from(location: PlanLocation) -> Self {
        location.to_string()
    }
}

/// Error returned when parsing an invalid [`PlanLocation`] string.
#[derive(Debug, Clone)]
pub struct PlanLocationParseError(pub String);

impl fmt::Display for PlanLocationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid plan location: {:?} (expected staging or a quarter such as Y1F_Q1)",
            self.0
        )
    }
}

impl std::error::Error for PlanLocationParseError {}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// One course's position in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub course_id: String,
    pub location: PlanLocation,
    /// Position within `location`, starting at 0.
    pub sort_order: u32,
    /// Denormalised from the catalog when the course was added.
    pub credit_units: f64,
}

/// Errors from plan editing operations.
#[derive(Debug, Error)]
pub enum PlanEditError {
    #[error("course {0} is already in the plan")]
    AlreadyInPlan(String),

    #[error("course {0} is not in the plan")]
    NotInPlan(String),

    #[error("index {index} is out of range for {location} ({len} courses)")]
    IndexOutOfRange {
        location: PlanLocation,
        index: usize,
        len: usize,
    },
}

// ---------------------------------------------------------------------------
// CoursePlan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePlan {
    placements: HashMap<String, Placement>,
    staging: Vec<String>,
    quarters: [Vec<String>; 8],
}

impl CoursePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a plan from stored placements.
    ///
    /// Each container is ordered by `sort_order` (ties keep input order) and
    /// then re-indexed. Semester-long courses stored in a second quarter move
    /// to the first.
    pub fn load(placements: impl IntoIterator<Item = Placement>) -> Result<Self, PlanEditError> {
        let mut placements: Vec<Placement> = placements.into_iter().collect();
        placements.sort_by_key(|p| p.sort_order);

        let mut plan = Self::new();
        for mut placement in placements {
            if plan.contains(&placement.course_id) {
                return Err(PlanEditError::AlreadyInPlan(placement.course_id));
            }
            if let PlanLocation::Quarter(q) = placement.location {
                placement.location =
                    PlanLocation::Quarter(normalize_quarter_for_course(q, placement.credit_units));
            }
            plan.list_mut(placement.location)
                .push(placement.course_id.clone());
            plan.placements
                .insert(placement.course_id.clone(), placement);
        }

        plan.reindex(PlanLocation::Staging);
        for q in QuarterId::ALL {
            plan.reindex(PlanLocation::Quarter(q));
        }
        Ok(plan)
    }

    // -- editing -------------------------------------------------------------

    /// Append a course to the staging area.
    pub fn add_to_staging(
        &mut self,
        course_id: &str,
        credit_units: f64,
    ) -> Result<(), PlanEditError> {
        self.insert_new(course_id, PlanLocation::Staging, credit_units, None)
            .map(|_| ())
    }

    /// Place a new course in `quarter`, at `index` or at the end.
    ///
    /// Returns the quarter the course actually landed in: a semester-long
    /// course dropped on a second quarter goes to the first.
    pub fn add_to_quarter(
        &mut self,
        course_id: &str,
        quarter: QuarterId,
        credit_units: f64,
        index: Option<usize>,
    ) -> Result<QuarterId, PlanEditError> {
        let quarter = normalize_quarter_for_course(quarter, credit_units);
        self.insert_new(
            course_id,
            PlanLocation::Quarter(quarter),
            credit_units,
            index,
        )?;
        Ok(quarter)
    }

    /// Move a planned course into `quarter`. Normalises like
    /// [`CoursePlan::add_to_quarter`].
    pub fn move_to_quarter(
        &mut self,
        course_id: &str,
        quarter: QuarterId,
        index: Option<usize>,
    ) -> Result<QuarterId, PlanEditError> {
        let credit_units = self.placement(course_id)?.credit_units;
        let quarter = normalize_quarter_for_course(quarter, credit_units);
        self.relocate(course_id, PlanLocation::Quarter(quarter), index)?;
        Ok(quarter)
    }

    /// Move a planned course back to staging, at `index` or at the end.
    pub fn move_to_staging(
        &mut self,
        course_id: &str,
        index: Option<usize>,
    ) -> Result<(), PlanEditError> {
        self.relocate(course_id, PlanLocation::Staging, index)
    }

    /// Remove a course from the plan entirely.
    pub fn remove_course(&mut self, course_id: &str) -> Result<Placement, PlanEditError> {
        let placement = self
            .placements
            .remove(course_id)
            .ok_or_else(|| PlanEditError::NotInPlan(course_id.to_owned()))?;
        self.list_mut(placement.location).retain(|c| c != course_id);
        self.reindex(placement.location);
        Ok(placement)
    }

    pub fn reorder_in_quarter(
        &mut self,
        quarter: QuarterId,
        from: usize,
        to: usize,
    ) -> Result<(), PlanEditError> {
        self.reorder(PlanLocation::Quarter(quarter), from, to)
    }

    pub fn reorder_in_staging(&mut self, from: usize, to: usize) -> Result<(), PlanEditError> {
        self.reorder(PlanLocation::Staging, from, to)
    }

    // -- queries -------------------------------------------------------------

    pub fn contains(&self, course_id: &str) -> bool {
        self.placements.contains_key(course_id)
    }

    pub fn get(&self, course_id: &str) -> Option<&Placement> {
        self.placements.get(course_id)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Course IDs in `quarter`, in order.
    pub fn courses_in(&self, quarter: QuarterId) -> &[String] {
        &self.quarters[quarter.index()]
    }

    pub fn staging(&self) -> &[String] {
        &self.staging
    }

    pub fn cu_for_quarter(&self, quarter: QuarterId) -> f64 {
        self.courses_in(quarter)
            .iter()
            .filter_map(|id| self.placements.get(id))
            .map(|p| p.credit_units)
            .sum()
    }

    pub fn cu_for_semester(&self, semester: SemesterId) -> f64 {
        semester
            .quarters()
            .into_iter()
            .map(|q| self.cu_for_quarter(q))
            .sum()
    }

    /// Credit units placed in quarters. Staged courses are not counted.
    pub fn total_cu(&self) -> f64 {
        QuarterId::ALL.into_iter().map(|q| self.cu_for_quarter(q)).sum()
    }

    /// Course IDs placed in quarters, in calendar then list order.
    pub fn placed_course_ids(&self) -> Vec<String> {
        self.quarters.iter().flatten().cloned().collect()
    }

    /// Placed course IDs followed by staged ones.
    pub fn all_course_ids(&self) -> Vec<String> {
        let mut ids = self.placed_course_ids();
        ids.extend(self.staging.iter().cloned());
        ids
    }

    /// Ordered course IDs per quarter, omitting empty quarters.
    pub fn quarter_order(&self) -> QuarterOrder {
        QuarterId::ALL
            .into_iter()
            .filter(|q| !self.quarters[q.index()].is_empty())
            .map(|q| (q, self.quarters[q.index()].clone()))
            .collect()
    }

    /// All placements: quarters in calendar order, then staging.
    pub fn placements(&self) -> Vec<&Placement> {
        self.quarters
            .iter()
            .flatten()
            .chain(self.staging.iter())
            .filter_map(|id| self.placements.get(id))
            .collect()
    }

    /// Snapshot the plan and `profile` for [`crate::validation::validate_plan`].
    pub fn validation_input(&self, profile: &StudentProfile) -> ValidatePlanInput {
        ValidatePlanInput {
            placed_course_ids: self.placed_course_ids(),
            all_course_ids: self.all_course_ids(),
            quarter_order: self.quarter_order(),
            majors: profile.majors.clone(),
            waivers: profile.waivers.clone(),
        }
    }

    // -- internals -----------------------------------------------------------

    fn placement(&self, course_id: &str) -> Result<&Placement, PlanEditError> {
        self.placements
            .get(course_id)
            .ok_or_else(|| PlanEditError::NotInPlan(course_id.to_owned()))
    }

    fn list(&self, location: PlanLocation) -> &Vec<String> {
        match location {
            PlanLocation::Staging => &self.staging,
            PlanLocation::Quarter(q) => &self.quarters[q.index()],
        }
    }

    fn list_mut(&mut self, location: PlanLocation) -> &mut Vec<String> {
        match location {
            PlanLocation::Staging => &mut self.staging,
            PlanLocation::Quarter(q) => &mut self.quarters[q.index()],
        }
    }

    /// Check an insertion index against `location`, not counting
    /// `moving` if it already sits there.
    fn check_insert_index(
        &self,
        location: PlanLocation,
        index: Option<usize>,
        moving: Option<&str>,
    ) -> Result<(), PlanEditError> {
        let Some(index) = index else {
            return Ok(());
        };
        let list = self.list(location);
        let already_here = moving.is_some_and(|id| list.iter().any(|c| c == id));
        let len = list.len() - usize::from(already_here);
        if index > len {
            return Err(PlanEditError::IndexOutOfRange {
                location,
                index,
                len,
            });
        }
        Ok(())
    }

    fn insert_new(
        &mut self,
        course_id: &str,
        location: PlanLocation,
        credit_units: f64,
        index: Option<usize>,
    ) -> Result<(), PlanEditError> {
        if self.contains(course_id) {
            return Err(PlanEditError::AlreadyInPlan(course_id.to_owned()));
        }
        self.check_insert_index(location, index, None)?;

        self.placements.insert(
            course_id.to_owned(),
            Placement {
                course_id: course_id.to_owned(),
                location,
                sort_order: 0,
                credit_units,
            },
        );
        insert_at(self.list_mut(location), course_id, index);
        self.reindex(location);
        Ok(())
    }

    fn relocate(
        &mut self,
        course_id: &str,
        to: PlanLocation,
        index: Option<usize>,
    ) -> Result<(), PlanEditError> {
        let from = self.placement(course_id)?.location;
        self.check_insert_index(to, index, Some(course_id))?;

        self.list_mut(from).retain(|c| c != course_id);
        insert_at(self.list_mut(to), course_id, index);
        if let Some(p) = self.placements.get_mut(course_id) {
            p.location = to;
        }

        self.reindex(from);
        if to != from {
            self.reindex(to);
        }
        Ok(())
    }

    fn reorder(
        &mut self,
        location: PlanLocation,
        from: usize,
        to: usize,
    ) -> Result<(), PlanEditError> {
        let len = self.list(location).len();
        for index in [from, to] {
            if index >= len {
                return Err(PlanEditError::IndexOutOfRange {
                    location,
                    index,
                    len,
                });
            }
        }

        let list = self.list_mut(location);
        let id = list.remove(from);
        list.insert(to, id);
        self.reindex(location);
        Ok(())
    }

    fn reindex(&mut self, location: PlanLocation) {
        let ids = match location {
            PlanLocation::Staging => &self.staging,
            PlanLocation::Quarter(q) => &self.quarters[q.index()],
        };
        for (i, id) in ids.iter().enumerate() {
            if let Some(p) = self.placements.get_mut(id) {
                p.sort_order = i as u32;
            }
        }
    }
}

fn insert_at(list: &mut Vec<String>, course_id: &str, index: Option<usize>) {
    match index {
        Some(i) => list.insert(i, course_id.to_owned()),
        None => list.push(course_id.to_owned()),
    }
}
