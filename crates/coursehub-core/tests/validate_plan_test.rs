//! End-to-end tests for the validation pipeline: plan construction, plan
//! files and the seed, validated against both the fixture and the embedded
//! reference data.

use coursehub_core::plan::{CoursePlan, PlanFile, QuarterId, generate_initial_plan, parse_plan_file};
use coursehub_core::profile::{StudentProfile, WaiverConfig, WaiverType};
use coursehub_core::validation::{
    CoreStatus, ErrorKind, Severity, ValidatePlanInput, WarningKind, validate_plan,
};
use coursehub_data::{ReferenceData, ReferenceTables};
use coursehub_test_utils::{fixture_tables, strings};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

/// Place every fixture course except `skip`, round-robin across quarters.
fn fixture_plan_without(tables: &ReferenceTables, skip: &[&str]) -> CoursePlan {
    let mut plan = CoursePlan::new();
    let courses = tables
        .courses()
        .iter()
        .filter(|c| !skip.contains(&c.course_id.as_str()));
    for (i, course) in courses.enumerate() {
        plan.add_to_quarter(
            &course.course_id,
            QuarterId::ALL[i % 8],
            course.credit_units,
            None,
        )
        .expect("fixture courses are unique");
    }
    plan
}

fn placed_input(quarter: QuarterId, courses: &[&str]) -> ValidatePlanInput {
    let mut input = ValidatePlanInput {
        placed_course_ids: strings(courses),
        all_course_ids: strings(courses),
        ..Default::default()
    };
    input.quarter_order.insert(quarter, strings(courses));
    input
}

// -----------------------------------------------------------------------
// Embedded reference data
// -----------------------------------------------------------------------

#[test]
fn empty_plan_reports_every_core_and_no_cu_error() {
    let tables = ReferenceTables::embedded();
    let result = validate_plan(&ValidatePlanInput::default(), &tables);

    assert!(!result.is_valid);
    assert!(!result.can_mark_complete);
    assert_eq!(result.total_cu, 0.0);
    assert_eq!(result.errors_of(ErrorKind::MissingCore).count(), 13);
    assert_eq!(result.errors_of(ErrorKind::InsufficientCu).count(), 0);
    assert_eq!(result.errors.len(), 13);
    assert_eq!(result.core_progress.len(), 13);
    assert!(
        result
            .core_progress
            .iter()
            .all(|p| p.status == CoreStatus::Missing)
    );
    assert!(!result.graduation_progress.is_in_range);
}

#[test]
fn abbreviated_finance_pair_is_one_error() {
    let tables = ReferenceTables::embedded();
    let input = placed_input(QuarterId::Y1SpringQ3, &["FNCE6210", "FNCE6230"]);
    let result = validate_plan(&input, &tables);

    let pair: Vec<_> = result.errors_of(ErrorKind::ProhibitedCombination).collect();
    assert_eq!(pair.len(), 1);
    assert_eq!(pair[0].course_ids, vec!["FNCE6210", "FNCE6230"]);
    assert!(!result.is_valid);
}

#[test]
fn finance_and_quant_finance_cannot_both_be_declared() {
    let tables = ReferenceTables::embedded();
    let input = ValidatePlanInput {
        majors: strings(&["FNCE", "QFNC"]),
        ..Default::default()
    };
    let result = validate_plan(&input, &tables);

    let exclusions: Vec<_> = result.errors_of(ErrorKind::MutualExclusion).collect();
    assert_eq!(exclusions.len(), 1);
    assert_eq!(exclusions[0].message, "Cannot declare both FNCE and QFNC majors");
    assert_eq!(result.major_progress.len(), 2);
}

#[test]
fn full_waivers_are_always_waived() {
    let tables = ReferenceTables::embedded();
    let waivers: Vec<WaiverConfig> = tables
        .waivable_core_requirements()
        .iter()
        .filter(|r| {
            r.waiver_details
                .as_ref()
                .is_some_and(|d| d.waiver.is_some())
        })
        .map(|r| WaiverConfig::new(r.core_code.clone(), WaiverType::Waiver))
        .collect();
    assert!(!waivers.is_empty());

    let input = ValidatePlanInput {
        waivers: waivers.clone(),
        ..Default::default()
    };
    let result = validate_plan(&input, &tables);

    for waiver in &waivers {
        let progress = result
            .core_progress
            .iter()
            .find(|p| p.core_code == waiver.core_code)
            .unwrap();
        assert_eq!(progress.status, CoreStatus::Waived, "{}", waiver.core_code);
        assert_eq!(progress.credits_satisfied, progress.credits_required);
    }
    assert_eq!(
        result.errors_of(ErrorKind::MissingCore).count(),
        13 - waivers.len()
    );
}

#[test]
fn seeded_plan_satisfies_every_core() {
    let tables = ReferenceTables::embedded();
    let profile = StudentProfile::default();
    let plan = generate_initial_plan(&profile, &tables);

    let result = validate_plan(&plan.validation_input(&profile), &tables);
    assert_eq!(result.errors_of(ErrorKind::MissingCore).count(), 0);
    assert!(
        result
            .core_progress
            .iter()
            .all(|p| p.status == CoreStatus::Satisfied)
    );
    // The seed covers only the core, well short of graduation.
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::InsufficientCu);
    assert_eq!(result.total_cu, plan.total_cu());
}

#[test]
fn results_are_byte_identical_across_calls() {
    let tables = ReferenceTables::embedded();
    let profile = StudentProfile {
        majors: strings(&["FNCE", "MKTG", "ESGB"]),
        waivers: vec![WaiverConfig::new("STAT_CORE", WaiverType::Placement)],
        ..Default::default()
    };
    let mut plan = generate_initial_plan(&profile, &tables);
    plan.add_to_staging("FNCE7250", 0.5).unwrap();
    let input = plan.validation_input(&profile);

    let first = serde_json::to_string(&validate_plan(&input, &tables)).unwrap();
    let second = serde_json::to_string(&validate_plan(&input, &tables)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_embedded_major_evaluates_within_percent_bounds() {
    let tables = ReferenceTables::embedded();
    let all_courses: Vec<String> = tables.courses().iter().map(|c| c.course_id.clone()).collect();
    let input = ValidatePlanInput {
        all_course_ids: all_courses,
        majors: tables.major_codes().into_iter().map(str::to_owned).collect(),
        ..Default::default()
    };
    let result = validate_plan(&input, &tables);

    assert_eq!(result.major_progress.len(), 21);
    for major in &result.major_progress {
        assert!(major.percent_complete <= 100, "{}", major.major_code);
        assert!(major.total_credits_satisfied >= 0.0);
    }
}

// -----------------------------------------------------------------------
// Fixture reference data
// -----------------------------------------------------------------------

#[test]
fn complete_plan_in_range_is_valid() {
    let tables = fixture_tables();
    // 22 CU in the fixture catalog; dropping 2.5 CU lands in range.
    let plan = fixture_plan_without(&tables, &["FNCE6230", "ECON7020", "ECON7100"]);
    let input = plan.validation_input(&StudentProfile::default());
    let result = validate_plan(&input, &tables);

    assert!(result.is_valid, "{:?}", result.errors);
    assert!(result.can_mark_complete);
    assert_eq!(result.total_cu, 19.5);
    assert!(result.graduation_progress.is_in_range);
}

#[test]
fn total_above_maximum_is_a_warning() {
    let tables = fixture_tables();
    let plan = fixture_plan_without(&tables, &[]);
    let result = validate_plan(&plan.validation_input(&StudentProfile::default()), &tables);

    assert_eq!(result.total_cu, 22.0);
    let over: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.severity == Severity::High && w.kind == WarningKind::QuarterOverload)
        .collect();
    assert_eq!(over.len(), 1);
    assert_eq!(
        over[0].message,
        "Total CU (22) exceeds graduation maximum of 21"
    );
    assert_eq!(result.errors_of(ErrorKind::InsufficientCu).count(), 0);
}

#[test]
fn overloaded_quarter_warns_but_stays_valid_for_cores() {
    let tables = fixture_tables();
    let input = placed_input(QuarterId::Y1FallQ1, &["FNCE6110", "STAT6130", "FNCE7170"]);
    let result = validate_plan(&input, &tables);

    let overloads: Vec<_> = result.warnings_of(WarningKind::QuarterOverload).collect();
    assert_eq!(overloads.len(), 1);
    assert_eq!(
        overloads[0].message,
        "Y1F_Q1 has 3 CU, which exceeds the recommended 2.75 CU per quarter"
    );
    assert_eq!(overloads[0].severity, Severity::Medium);
}

#[test]
fn fall_only_course_in_spring_quarter_warns() {
    let tables = fixture_tables();
    let input = placed_input(QuarterId::Y1SpringQ3, &["MGMT6100"]);
    let result = validate_plan(&input, &tables);

    let mismatches: Vec<_> = result.warnings_of(WarningKind::TermMismatch).collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].course_id.as_deref(), Some("MGMT6100"));
    assert_eq!(mismatches[0].severity, Severity::High);
    // The course still satisfies its core.
    assert_eq!(result.core_progress[0].status, CoreStatus::Satisfied);
}

#[test]
fn warnings_merge_majors_before_cross_rules_before_cu() {
    let tables = fixture_tables();
    let mut input = placed_input(
        QuarterId::Y1FallQ1,
        &["OIDD6900", "LGST8130", "MGMT7210", "MGMT7310", "FNCE7170"],
    );
    input.majors = strings(&["MGMT", "LEAD"]);
    let result = validate_plan(&input, &tables);

    let kinds: Vec<WarningKind> = result.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::IspCap,
            WarningKind::DoubleCount,
            WarningKind::DoubleCount,
            WarningKind::QuarterOverload,
        ]
    );
}

#[test]
fn plan_file_on_disk_validates() {
    let tables = fixture_tables();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.toml");

    let profile = StudentProfile {
        majors: strings(&["QFNC"]),
        ..Default::default()
    };
    let mut plan = CoursePlan::new();
    plan.add_to_quarter("FNCE6210", QuarterId::Y1SpringQ3, 0.5, None)
        .unwrap();
    plan.add_to_staging("FNCE6130", 1.0).unwrap();
    let content = PlanFile::from_plan(&profile, &plan).to_toml_string().unwrap();
    std::fs::write(&path, content).unwrap();

    let loaded = parse_plan_file(&std::fs::read_to_string(&path).unwrap(), &tables).unwrap();
    let result = validate_plan(&loaded.plan.validation_input(&loaded.profile), &tables);

    let overrides: Vec<_> = result.errors_of(ErrorKind::MajorCoreOverride).collect();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].requirement_code.as_deref(), Some("FNCE_CORP_FLEX"));
    assert_eq!(result.total_cu, 0.5);
    assert!(tables.credit_units("FNCE6130").is_some());
}
