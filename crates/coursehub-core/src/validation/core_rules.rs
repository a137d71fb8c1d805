//! Core requirement evaluation.
//!
//! Produces one [`CoreProgress`] per core requirement, in program order,
//! then applies the two plan-wide checks: the prohibited abbreviated-course
//! pair and the finance-major override.

use coursehub_data::ReferenceData;
use coursehub_data::models::{CoreRequirement, SubstitutionRule};

use crate::profile::{WaiverConfig, WaiverType};

use super::rules::{
    FINANCE_CORE_OVERRIDES, FINANCE_MAJORS, OIDD_FLEX, PROHIBITED_CORE_PAIR, STAT_CORE,
    STAT_PLACEMENT_COURSE,
};
use super::types::{CoreProgress, CoreStatus, ErrorKind, ValidatePlanInput, ValidationError};
use super::{Evaluation, PlanCourses, sum_credits};

/// Evaluate every core requirement against the plan and the student's
/// waivers.
pub fn evaluate_core_requirements(
    requirements: &[CoreRequirement],
    input: &ValidatePlanInput,
    reference: &dyn ReferenceData,
) -> Evaluation<Vec<CoreProgress>> {
    let plan = PlanCourses::new(&input.all_course_ids);
    let mut out = Evaluation::new(Vec::with_capacity(requirements.len()));

    for req in requirements {
        let waiver = input.waivers.iter().find(|w| w.core_code == req.core_code);
        let progress = match waiver {
            Some(waiver) => evaluate_waived(req, waiver, &plan, reference, &mut out.errors),
            None => evaluate_pool(req, &req.courses, &plan, reference, &mut out.errors),
        };
        out.progress.push(progress);
    }

    check_prohibited_pair(&plan, &mut out.errors);
    check_finance_overrides(&plan, &input.majors, &mut out.errors);

    tracing::debug!(
        requirements = requirements.len(),
        errors = out.errors.len(),
        "evaluated core requirements"
    );
    out
}

fn evaluate_waived(
    req: &CoreRequirement,
    waiver: &WaiverConfig,
    plan: &PlanCourses<'_>,
    reference: &dyn ReferenceData,
    errors: &mut Vec<ValidationError>,
) -> CoreProgress {
    match waiver.waiver_type {
        WaiverType::Waiver => CoreProgress {
            status: CoreStatus::Waived,
            credits_satisfied: req.credits_required,
            ..progress(req, req.credits_required)
        },
        WaiverType::Substitution => match req.substitution() {
            Some(rule) => evaluate_substitution(req, rule, waiver, plan, reference, errors),
            None => CoreProgress {
                status: CoreStatus::Waived,
                ..progress(req, 0.0)
            },
        },
        WaiverType::Placement if req.core_code == STAT_CORE => {
            let alternate = [STAT_PLACEMENT_COURSE.to_owned()];
            evaluate_pool(req, &alternate, plan, reference, errors)
        }
        WaiverType::Placement => evaluate_pool(req, &req.courses, plan, reference, errors),
    }
}

fn evaluate_substitution(
    req: &CoreRequirement,
    rule: &SubstitutionRule,
    waiver: &WaiverConfig,
    plan: &PlanCourses<'_>,
    reference: &dyn ReferenceData,
    errors: &mut Vec<ValidationError>,
) -> CoreProgress {
    let mut courses: Vec<String> = plan
        .iter()
        .filter(|id| {
            rule.eligible_course_prefixes
                .iter()
                .any(|prefix| id.starts_with(prefix.as_str()))
        })
        .map(str::to_owned)
        .collect();

    if let Some(sub) = &waiver.substitution_course_id {
        if plan.contains(sub) && !courses.contains(sub) {
            courses.push(sub.clone());
        }
    }

    let satisfied = sum_credits(&courses, reference);
    let status = if satisfied >= rule.credits_required {
        CoreStatus::Waived
    } else {
        errors.push(
            ValidationError::new(
                ErrorKind::MissingCore,
                format!(
                    "{} waived but substitution not complete: need {} CU from {} courses",
                    req.core_name,
                    rule.credits_required,
                    rule.eligible_course_prefixes.join("/")
                ),
            )
            .with_requirement(&req.core_code),
        );
        CoreStatus::Partial
    };

    CoreProgress {
        status,
        credits_satisfied: satisfied,
        satisfying_courses: courses,
        ..progress(req, rule.credits_required)
    }
}

/// Match `pool` against the plan. Any listed course satisfies the
/// requirement, except on [`OIDD_FLEX`] where the matches must add up to the
/// required credits.
fn evaluate_pool(
    req: &CoreRequirement,
    pool: &[String],
    plan: &PlanCourses<'_>,
    reference: &dyn ReferenceData,
    errors: &mut Vec<ValidationError>,
) -> CoreProgress {
    let matching: Vec<String> = pool.iter().filter(|c| plan.contains(c)).cloned().collect();

    if matching.is_empty() {
        errors.push(
            ValidationError::new(
                ErrorKind::MissingCore,
                format!("Missing core requirement: {}", req.core_name),
            )
            .with_requirement(&req.core_code),
        );
        return CoreProgress {
            status: CoreStatus::Missing,
            ..progress(req, req.credits_required)
        };
    }

    let total = sum_credits(&matching, reference);
    let mut status = CoreStatus::Satisfied;

    if req.core_code == OIDD_FLEX && total < req.credits_required {
        status = CoreStatus::Partial;
        errors.push(
            ValidationError::new(
                ErrorKind::MissingCore,
                format!(
                    "OIDD flex core partially complete: {}/{} CU. Need {} more CU.",
                    total,
                    req.credits_required,
                    req.credits_required - total
                ),
            )
            .with_requirement(&req.core_code),
        );
    }

    CoreProgress {
        status,
        credits_satisfied: total.min(req.credits_required),
        satisfying_courses: matching,
        ..progress(req, req.credits_required)
    }
}

/// A zero-credit record for `req` with the given credit requirement.
fn progress(req: &CoreRequirement, credits_required: f64) -> CoreProgress {
    CoreProgress {
        core_code: req.core_code.clone(),
        core_name: req.core_name.clone(),
        status: CoreStatus::Missing,
        credits_required,
        credits_satisfied: 0.0,
        satisfying_courses: Vec::new(),
    }
}

fn check_prohibited_pair(plan: &PlanCourses<'_>, errors: &mut Vec<ValidationError>) {
    let (a, b) = PROHIBITED_CORE_PAIR;
    if plan.contains(a) && plan.contains(b) {
        errors.push(
            ValidationError::new(
                ErrorKind::ProhibitedCombination,
                format!("Cannot enroll in both {a} and {b}"),
            )
            .with_courses(vec![a.to_owned(), b.to_owned()]),
        );
    }
}

fn check_finance_overrides(
    plan: &PlanCourses<'_>,
    majors: &[String],
    errors: &mut Vec<ValidationError>,
) {
    if !majors.iter().any(|m| FINANCE_MAJORS.contains(&m.as_str())) {
        return;
    }

    for rule in FINANCE_CORE_OVERRIDES {
        if plan.contains(rule.abbreviated) && !plan.contains(rule.full) {
            errors.push(
                ValidationError::new(
                    ErrorKind::MajorCoreOverride,
                    format!(
                        "Finance/Quant Finance majors must take {} (full course), not {} (abbreviated)",
                        rule.full, rule.abbreviated
                    ),
                )
                .with_requirement(rule.requirement_code)
                .with_courses(vec![rule.abbreviated.to_owned()]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_data::ReferenceTables;
    use coursehub_test_utils::{FIXTURE_CORE_COUNT, fixture_tables, strings};

    fn input(courses: &[&str]) -> ValidatePlanInput {
        ValidatePlanInput {
            placed_course_ids: strings(courses),
            all_course_ids: strings(courses),
            ..Default::default()
        }
    }

    fn run(tables: &ReferenceTables, input: &ValidatePlanInput) -> Evaluation<Vec<CoreProgress>> {
        evaluate_core_requirements(tables.core_requirements(), input, tables)
    }

    fn find<'a>(out: &'a Evaluation<Vec<CoreProgress>>, code: &str) -> &'a CoreProgress {
        out.progress
            .iter()
            .find(|p| p.core_code == code)
            .unwrap_or_else(|| panic!("no progress for {code}"))
    }

    #[test]
    fn empty_plan_misses_every_core() {
        let tables = fixture_tables();
        let out = run(&tables, &input(&[]));

        assert_eq!(out.progress.len(), FIXTURE_CORE_COUNT);
        assert!(out.progress.iter().all(|p| p.status == CoreStatus::Missing));
        assert_eq!(out.errors.len(), FIXTURE_CORE_COUNT);
        assert_eq!(
            out.errors[0].message,
            "Missing core requirement: Foundations of Teamwork and Leadership"
        );
        assert_eq!(out.errors[0].requirement_code.as_deref(), Some("MGMT_FOUNDATION"));
    }

    #[test]
    fn any_listed_course_satisfies_flex_core() {
        let tables = fixture_tables();
        let out = run(&tables, &input(&["ACCT6110"]));
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.status, CoreStatus::Satisfied);
        assert_eq!(acct.credits_satisfied, 0.5);
        assert_eq!(acct.satisfying_courses, vec!["ACCT6110"]);
    }

    #[test]
    fn satisfied_credits_are_capped_at_required() {
        let tables = fixture_tables();
        let out = run(&tables, &input(&["ACCT6130", "ACCT6110"]));
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.credits_satisfied, 0.5);
        assert_eq!(acct.satisfying_courses, vec!["ACCT6130", "ACCT6110"]);
    }

    #[test]
    fn oidd_flex_needs_full_credit_sum() {
        let tables = fixture_tables();

        let out = run(&tables, &input(&["OIDD6110"]));
        let oidd = find(&out, "OIDD_FLEX");
        assert_eq!(oidd.status, CoreStatus::Partial);
        assert_eq!(oidd.credits_satisfied, 0.5);
        let err = out
            .errors
            .iter()
            .find(|e| e.requirement_code.as_deref() == Some("OIDD_FLEX"))
            .unwrap();
        assert_eq!(
            err.message,
            "OIDD flex core partially complete: 0.5/1 CU. Need 0.5 more CU."
        );

        let out = run(&tables, &input(&["OIDD6110", "OIDD6900"]));
        assert_eq!(find(&out, "OIDD_FLEX").status, CoreStatus::Satisfied);
        assert!(
            !out.errors
                .iter()
                .any(|e| e.requirement_code.as_deref() == Some("OIDD_FLEX"))
        );
    }

    #[test]
    fn full_waiver_is_always_waived() {
        let tables = fixture_tables();
        let mut plan = input(&[]);
        plan.waivers = vec![WaiverConfig::new("ACCT_FLEX", WaiverType::Waiver)];

        let out = run(&tables, &plan);
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.status, CoreStatus::Waived);
        assert_eq!(acct.credits_satisfied, acct.credits_required);
        assert!(acct.satisfying_courses.is_empty());
        assert_eq!(out.errors.len(), FIXTURE_CORE_COUNT - 1);
    }

    #[test]
    fn substitution_complete_with_prefix_courses() {
        let tables = fixture_tables();
        let mut plan = input(&["ACCT7420"]);
        plan.waivers = vec![WaiverConfig::new("ACCT_FLEX", WaiverType::Substitution)];

        let out = run(&tables, &plan);
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.status, CoreStatus::Waived);
        assert_eq!(acct.credits_required, 1.0);
        assert_eq!(acct.credits_satisfied, 1.0);
        assert_eq!(acct.satisfying_courses, vec!["ACCT7420"]);
    }

    #[test]
    fn substitution_shortfall_is_partial() {
        let tables = fixture_tables();
        let mut plan = input(&["ACCT7430"]);
        plan.waivers = vec![WaiverConfig::new("ACCT_FLEX", WaiverType::Substitution)];

        let out = run(&tables, &plan);
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.status, CoreStatus::Partial);
        assert_eq!(acct.credits_satisfied, 0.5);
        let err = out
            .errors
            .iter()
            .find(|e| e.requirement_code.as_deref() == Some("ACCT_FLEX"))
            .unwrap();
        assert_eq!(
            err.message,
            "Financial Accounting waived but substitution not complete: need 1 CU from ACCT7 courses"
        );
    }

    #[test]
    fn named_substitute_course_counts_outside_prefixes() {
        let tables = fixture_tables();
        let mut plan = input(&["ACCT7430", "FNCE7070"]);
        let mut waiver = WaiverConfig::new("ACCT_FLEX", WaiverType::Substitution);
        waiver.substitution_course_id = Some("FNCE7070".into());
        plan.waivers = vec![waiver];

        let out = run(&tables, &plan);
        let acct = find(&out, "ACCT_FLEX");
        assert_eq!(acct.status, CoreStatus::Waived);
        assert_eq!(acct.satisfying_courses, vec!["ACCT7430", "FNCE7070"]);
    }

    #[test]
    fn substitution_without_rule_falls_back_to_zero_waiver() {
        let tables = fixture_tables();
        let mut plan = input(&[]);
        plan.waivers = vec![WaiverConfig::new("FNCE_MACRO_FLEX", WaiverType::Substitution)];

        let out = run(&tables, &plan);
        let macro_core = find(&out, "FNCE_MACRO_FLEX");
        assert_eq!(macro_core.status, CoreStatus::Waived);
        assert_eq!(macro_core.credits_required, 0.0);
        assert_eq!(macro_core.credits_satisfied, 0.0);
    }

    #[test]
    fn stat_placement_uses_alternate_course() {
        let tables = fixture_tables();
        let mut plan = input(&["STAT6130"]);
        plan.waivers = vec![WaiverConfig::new("STAT_CORE", WaiverType::Placement)];

        let out = run(&tables, &plan);
        assert_eq!(find(&out, "STAT_CORE").status, CoreStatus::Missing);

        plan.all_course_ids = strings(&["STAT6210"]);
        let out = run(&tables, &plan);
        let stat = find(&out, "STAT_CORE");
        assert_eq!(stat.status, CoreStatus::Satisfied);
        assert_eq!(stat.satisfying_courses, vec!["STAT6210"]);
    }

    #[test]
    fn placement_on_other_core_evaluates_regular_pool() {
        let tables = fixture_tables();
        let mut plan = input(&["ACCT6130"]);
        plan.waivers = vec![WaiverConfig::new("ACCT_FLEX", WaiverType::Placement)];

        let out = run(&tables, &plan);
        assert_eq!(find(&out, "ACCT_FLEX").status, CoreStatus::Satisfied);
    }

    #[test]
    fn prohibited_pair_emits_one_error() {
        let tables = fixture_tables();
        let out = run(&tables, &input(&["FNCE6210", "FNCE6230", "FNCE6110"]));
        let pair: Vec<_> = out
            .errors
            .iter()
            .filter(|e| e.kind == ErrorKind::ProhibitedCombination)
            .collect();
        assert_eq!(pair.len(), 1);
        assert_eq!(pair[0].course_ids, vec!["FNCE6210", "FNCE6230"]);
        assert_eq!(pair[0].message, "Cannot enroll in both FNCE6210 and FNCE6230");
    }

    #[test]
    fn finance_major_must_take_full_cores() {
        let tables = fixture_tables();
        let mut plan = input(&["FNCE6210", "FNCE6230", "FNCE6130"]);
        plan.majors = vec!["QFNC".into()];

        let out = run(&tables, &plan);
        let overrides: Vec<_> = out
            .errors
            .iter()
            .filter(|e| e.kind == ErrorKind::MajorCoreOverride)
            .collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].requirement_code.as_deref(), Some("FNCE_CORP_FLEX"));
        assert_eq!(overrides[0].course_ids, vec!["FNCE6210"]);

        plan.majors = vec!["MKTG".into()];
        let out = run(&tables, &plan);
        assert!(!out.errors.iter().any(|e| e.kind == ErrorKind::MajorCoreOverride));
    }
}
