//! Rules that span more than one requirement: major exclusions and
//! courses that cannot double count.

use super::rules::{DOUBLE_COUNT_RULES, MAJOR_EXCLUSIONS, ONE_TO_MANY_EXCLUSIONS};
use super::types::{
    ErrorKind, Severity, ValidatePlanInput, ValidationError, ValidationWarning, WarningKind,
};
use super::{Evaluation, PlanCourses};

/// Check declared majors against the exclusion lists and the plan against
/// the double-count table.
pub fn evaluate_cross_rules(input: &ValidatePlanInput) -> Evaluation<()> {
    let declared = |code: &str| input.majors.iter().any(|m| m == code);
    let plan = PlanCourses::new(&input.all_course_ids);
    let mut out = Evaluation::new(());

    let pairs = MAJOR_EXCLUSIONS.iter().copied().chain(
        ONE_TO_MANY_EXCLUSIONS
            .iter()
            .flat_map(|&(major, others)| others.iter().map(move |&other| (major, other))),
    );
    for (a, b) in pairs {
        if declared(a) && declared(b) {
            out.errors.push(ValidationError::new(
                ErrorKind::MutualExclusion,
                format!("Cannot declare both {a} and {b} majors"),
            ));
        }
    }

    for rule in DOUBLE_COUNT_RULES {
        if !declared(rule.major) {
            continue;
        }
        for &course in rule.courses {
            if plan.contains(course) {
                out.warnings.push(
                    ValidationWarning::new(
                        WarningKind::DoubleCount,
                        Severity::High,
                        format!(
                            "{course} cannot count toward both {} major and {}. It will count toward {} major.",
                            rule.major, rule.context, rule.major
                        ),
                    )
                    .with_course(course)
                    .with_related(vec![course.to_owned()]),
                );
            }
        }
    }

    tracing::debug!(
        errors = out.errors.len(),
        warnings = out.warnings.len(),
        "evaluated cross rules"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_test_utils::strings;

    fn input(majors: &[&str], courses: &[&str]) -> ValidatePlanInput {
        ValidatePlanInput {
            all_course_ids: strings(courses),
            majors: strings(majors),
            ..Default::default()
        }
    }

    #[test]
    fn finance_and_quant_finance_exclude_each_other() {
        let out = evaluate_cross_rules(&input(&["QFNC", "FNCE"], &[]));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].kind, ErrorKind::MutualExclusion);
        assert_eq!(out.errors[0].message, "Cannot declare both FNCE and QFNC majors");
    }

    #[test]
    fn one_to_many_exclusion_reports_each_pair() {
        let out = evaluate_cross_rules(&input(&["MKOP", "MKTG", "OIDD"], &[]));
        let messages: Vec<_> = out.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Cannot declare both MKOP and MKTG majors",
                "Cannot declare both MKOP and OIDD majors",
            ]
        );
    }

    #[test]
    fn compatible_majors_pass() {
        let out = evaluate_cross_rules(&input(&["FNCE", "MKTG", "BEES"], &[]));
        assert!(out.errors.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn double_count_warns_per_course_in_table_order() {
        let out = evaluate_cross_rules(&input(
            &["MGMT", "AIFB", "LEAD"],
            &["OIDD6900", "OIDD6620", "OIDD6130"],
        ));
        let courses: Vec<_> = out
            .warnings
            .iter()
            .map(|w| w.course_id.as_deref().unwrap())
            .collect();
        assert_eq!(courses, vec!["OIDD6130", "OIDD6620", "OIDD6900", "OIDD6900"]);
        assert!(out.warnings.iter().all(|w| w.severity == Severity::High));
        assert_eq!(
            out.warnings[2].message,
            "OIDD6900 cannot count toward both LEAD major and OIDD flex core. It will count toward LEAD major."
        );
    }

    #[test]
    fn double_count_needs_the_major() {
        let out = evaluate_cross_rules(&input(&["FNCE"], &["OIDD6900"]));
        assert!(out.warnings.is_empty());
    }
}
