//! Initial plan generation.
//!
//! Places the default first-year schedule of core courses, adjusted for the
//! student's waivers and declared majors.

use coursehub_data::ReferenceData;

use super::calendar::QuarterId;
use super::plan_file::DEFAULT_CREDIT_UNITS;
use super::store::CoursePlan;
use crate::profile::{StudentProfile, WaiverType};
use crate::validation::rules::{FINANCE_MAJORS, STAT_CORE, STAT_PLACEMENT_COURSE};

/// Default quarter for each core course, keyed by core requirement.
const DEFAULT_SCHEDULE: &[(&str, &str, QuarterId)] = &[
    ("MGMT_FOUNDATION", "MGMT6100", QuarterId::Y1FallQ1),
    ("BEPP_MICRO_FOUNDATIONS", "BEPP6110", QuarterId::Y1FallQ1),
    ("MKTG_FIXED", "MKTG6110", QuarterId::Y1FallQ1),
    ("BEPP_MICRO_ADVANCED", "BEPP6120", QuarterId::Y1FallQ2),
    ("STAT_CORE", "STAT6130", QuarterId::Y1FallQ1),
    ("WHCP", "WHCP6160", QuarterId::Y1FallQ2),
    ("ACCT_FLEX", "ACCT6130", QuarterId::Y1SpringQ3),
    ("FNCE_CORP_FLEX", "FNCE6110", QuarterId::Y1SpringQ3),
    ("FNCE_MACRO_FLEX", "FNCE6130", QuarterId::Y1SpringQ4),
    ("LGST_FLEX", "LGST6110", QuarterId::Y1SpringQ3),
    ("MGMT_FLEX", "MGMT6110", QuarterId::Y1SpringQ4),
    ("MKTG_FLEX", "MKTG6120", QuarterId::Y1SpringQ4),
    ("OIDD_FLEX", "OIDD6110", QuarterId::Y2FallQ5),
    ("OIDD_FLEX", "OIDD6120", QuarterId::Y2FallQ5),
];

/// Finance cores whose default course a finance major must keep.
const FINANCE_CORES: &[&str] = &["FNCE_CORP_FLEX", "FNCE_MACRO_FLEX"];

/// Build a starting plan for `profile`.
///
/// Cores covered by a `waiver` or `substitution` waiver are left out; a
/// statistics placement schedules [`STAT_PLACEMENT_COURSE`] instead of the
/// default course.
pub fn generate_initial_plan(profile: &StudentProfile, reference: &dyn ReferenceData) -> CoursePlan {
    let finance_major = profile
        .majors
        .iter()
        .any(|m| FINANCE_MAJORS.contains(&m.as_str()));
    let mut plan = CoursePlan::new();

    for &(core_code, default_course, quarter) in DEFAULT_SCHEDULE {
        let course_id = match profile.waiver_for(core_code).map(|w| w.waiver_type) {
            Some(WaiverType::Waiver | WaiverType::Substitution) => continue,
            Some(WaiverType::Placement) if core_code == STAT_CORE => STAT_PLACEMENT_COURSE,
            _ => default_course,
        };
        if finance_major
            && FINANCE_CORES.contains(&core_code)
            && !matches!(course_id, "FNCE6110" | "FNCE6130")
        {
            continue;
        }

        let credit_units = reference
            .credit_units(course_id)
            .unwrap_or(DEFAULT_CREDIT_UNITS);
        if let Err(err) = plan.add_to_quarter(course_id, quarter, credit_units, None) {
            tracing::debug!(course = course_id, error = %err, "skipping seed placement");
        }
    }

    tracing::debug!(
        courses = plan.all_course_ids().len(),
        total_cu = plan.total_cu(),
        "generated initial plan"
    );
    plan
}
