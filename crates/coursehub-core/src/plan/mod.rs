//! The course plan: calendar, editable placements, plan files and the
//! initial-plan seed.

pub mod calendar;
pub mod plan_file;
pub mod seed;
pub mod store;

pub use calendar::{
    QuarterId, QuarterIdParseError, SemesterId, Term, is_semester_long,
    normalize_quarter_for_course,
};
pub use plan_file::{
    DEFAULT_CREDIT_UNITS, LoadedPlan, PlacementEntry, PlanFile, PlanFileError, parse_plan_file,
};
pub use seed::generate_initial_plan;
pub use store::{CoursePlan, Placement, PlanEditError, PlanLocation, PlanLocationParseError};
