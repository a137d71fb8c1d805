//! The validation pipeline.
//!
//! [`validate_plan`] runs the core, major and cross-rule evaluators and the
//! CU tracker over one plan snapshot and merges their output into a single
//! [`ValidationResult`]. Every evaluator is a pure function of its inputs
//! and the reference data.

pub mod core_rules;
pub mod cross_rules;
pub mod cu_tracker;
pub mod engine;
pub mod major_rules;
pub mod rules;
pub mod types;

use std::collections::HashSet;

use coursehub_data::ReferenceData;

pub use core_rules::evaluate_core_requirements;
pub use cross_rules::evaluate_cross_rules;
pub use cu_tracker::{CuReport, track_credit_units};
pub use engine::validate_plan;
pub use major_rules::{evaluate_major, evaluate_majors};
pub use types::*;

/// Output of one evaluator: its progress records plus the diagnostics it
/// raised, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<P> {
    pub progress: P,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl<P> Evaluation<P> {
    pub fn new(progress: P) -> Self {
        Self {
            progress,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// The plan's course IDs in plan order, with constant-time membership.
pub(crate) struct PlanCourses<'a> {
    ordered: &'a [String],
    set: HashSet<&'a str>,
}

impl<'a> PlanCourses<'a> {
    pub(crate) fn new(course_ids: &'a [String]) -> Self {
        Self {
            ordered: course_ids,
            set: course_ids.iter().map(String::as_str).collect(),
        }
    }

    pub(crate) fn contains(&self, course_id: &str) -> bool {
        self.set.contains(course_id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.ordered.iter().map(String::as_str)
    }

    /// Plan courses listed in `pool`, in plan order.
    pub(crate) fn matching(&self, pool: &[String]) -> Vec<String> {
        self.ordered
            .iter()
            .filter(|id| pool.contains(id))
            .cloned()
            .collect()
    }

    /// Courses of `pool` absent from the plan, in pool order.
    pub(crate) fn missing(&self, pool: &[String]) -> Vec<String> {
        pool.iter().filter(|c| !self.contains(c)).cloned().collect()
    }
}

/// Sum of credit units; unknown courses contribute nothing.
pub(crate) fn sum_credits(course_ids: &[String], reference: &dyn ReferenceData) -> f64 {
    course_ids
        .iter()
        .map(|id| reference.credit_units(id).unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_test_utils::{fixture_tables, strings};

    #[test]
    fn matching_follows_plan_order() {
        let ids = strings(&["FNCE7250", "ACCT6110", "FNCE7070"]);
        let plan = PlanCourses::new(&ids);
        let pool = strings(&["FNCE7070", "FNCE7250", "FNCE7170"]);
        assert_eq!(plan.matching(&pool), vec!["FNCE7250", "FNCE7070"]);
        assert_eq!(plan.missing(&pool), vec!["FNCE7170"]);
    }

    #[test]
    fn unknown_courses_sum_to_zero() {
        let tables = fixture_tables();
        let ids = strings(&["FNCE6110", "NOPE1234", "FNCE7070"]);
        assert_eq!(sum_credits(&ids, &tables), 1.5);
    }
}
