//! Major requirement evaluation.
//!
//! Each major dispatches on its [`RequirementStructure`]. The elective pool,
//! required set and pillar helpers are shared between the structures; the
//! ISP/Global Modular cap and the prohibited pairs apply to every major.

use coursehub_data::ReferenceData;
use coursehub_data::models::{
    CreditsType, ElectiveCourses, MajorRequirement, Pillar, RequiredCourses,
    RequirementStructure, SelectionType,
};

use super::rules::{ISP_GLOBAL_MODULAR_CAP_CU, is_isp_or_global_modular, prohibited_pairs_for};
use super::types::{
    ElectiveCoursesProgress, ErrorKind, MajorProgress, PillarProgress, RequiredCoursesProgress,
    Severity, ValidatePlanInput, ValidationError, ValidationWarning, WarningKind,
};
use super::{Evaluation, PlanCourses, sum_credits};

/// Evaluate every declared major, in declaration order.
///
/// A code missing from the reference data yields a zero-progress record
/// named after the code.
pub fn evaluate_majors(
    input: &ValidatePlanInput,
    reference: &dyn ReferenceData,
) -> Evaluation<Vec<MajorProgress>> {
    let mut out = Evaluation::new(Vec::with_capacity(input.majors.len()));

    for code in &input.majors {
        match reference.major_requirement(code) {
            Some(major) => {
                let eval = evaluate_major(major, &input.all_course_ids, reference);
                out.errors.extend(eval.errors);
                out.warnings.extend(eval.warnings);
                out.progress.push(eval.progress);
            }
            None => {
                tracing::debug!(major = %code, "unknown major code");
                out.progress.push(MajorProgress::empty(code, code, 0.0));
            }
        }
    }

    out
}

/// Evaluate one major against the plan's course IDs.
pub fn evaluate_major(
    major: &MajorRequirement,
    all_course_ids: &[String],
    reference: &dyn ReferenceData,
) -> Evaluation<MajorProgress> {
    let plan = PlanCourses::new(all_course_ids);
    let mut out = Evaluation::new(MajorProgress::empty(
        &major.major_code,
        &major.major_name,
        major.total_credits_required,
    ));

    let satisfying = match &major.requirements {
        RequirementStructure::Electives { elective_courses } => {
            let pool =
                evaluate_elective_pool(major, elective_courses, &plan, &[], reference, &mut out);
            out.progress.total_credits_satisfied = pool.credits_satisfied;
            let courses = pool.satisfying_courses.clone();
            out.progress.elective_courses_progress = Some(pool);
            courses
        }
        RequirementStructure::Combined {
            required_courses,
            elective_courses,
        } => {
            let required =
                evaluate_required_set(major, required_courses, &plan, reference, &mut out);
            let pool = evaluate_elective_pool(
                major,
                elective_courses,
                &plan,
                &required.satisfying_courses,
                reference,
                &mut out,
            );
            out.progress.total_credits_satisfied =
                required.credits_satisfied + pool.credits_satisfied;

            let mut courses = required.satisfying_courses.clone();
            courses.extend(pool.satisfying_courses.iter().cloned());
            out.progress.required_courses_progress = Some(required);
            out.progress.elective_courses_progress = Some(pool);
            courses
        }
        RequirementStructure::Pillars { pillars } => {
            let combined = pillars
                .iter()
                .any(|p| p.credits_type == CreditsType::CombinedWithOtherPillars);
            let progress: Vec<PillarProgress> = pillars
                .iter()
                .map(|p| evaluate_pillar(major, p, p.credits_type, &plan, reference, &mut out))
                .collect();

            let raw_total: f64 = progress.iter().map(|p| p.credits_satisfied).sum();
            if combined && raw_total < major.total_credits_required {
                out.errors.push(
                    ValidationError::new(
                        ErrorKind::InsufficientCu,
                        format!(
                            "{}: need {} more CU total across all pillars",
                            major.major_name,
                            major.total_credits_required - raw_total
                        ),
                    )
                    .with_requirement(&major.major_code),
                );
            }

            out.progress.total_credits_satisfied = raw_total;
            let courses = pillar_courses(&progress);
            out.progress.pillar_progress = Some(progress);
            courses
        }
        RequirementStructure::CombinedPillars {
            required_courses,
            pillars,
        } => {
            let required =
                evaluate_required_set(major, required_courses, &plan, reference, &mut out);
            let progress: Vec<PillarProgress> = pillars
                .iter()
                .map(|p| evaluate_pillar(major, p, CreditsType::Minimum, &plan, reference, &mut out))
                .collect();

            out.progress.total_credits_satisfied = required.credits_satisfied
                + progress.iter().map(|p| p.credits_satisfied).sum::<f64>();

            let mut courses = required.satisfying_courses.clone();
            for c in pillar_courses(&progress) {
                if !courses.contains(&c) {
                    courses.push(c);
                }
            }
            out.progress.required_courses_progress = Some(required);
            out.progress.pillar_progress = Some(progress);
            courses
        }
        RequirementStructure::Unrecognized => {
            tracing::debug!(major = %major.major_code, "unrecognized requirement structure");
            return out;
        }
    };

    out.progress.percent_complete = percent_complete(
        out.progress.total_credits_satisfied,
        major.total_credits_required,
    );

    check_isp_cap(major, &satisfying, reference, &mut out);
    check_prohibited_pairs(major, &plan, &mut out);

    tracing::debug!(
        major = %major.major_code,
        structure = major.requirements.tag(),
        satisfied = out.progress.total_credits_satisfied,
        errors = out.errors.len(),
        "evaluated major"
    );
    out
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Match an elective pool and its non-Wharton and additional extensions.
///
/// Courses in `counted_elsewhere` are skipped. Non-Wharton credits are
/// clamped to their cap; additional-pool credits are only warned about.
fn evaluate_elective_pool(
    major: &MajorRequirement,
    pool: &ElectiveCourses,
    plan: &PlanCourses<'_>,
    counted_elsewhere: &[String],
    reference: &dyn ReferenceData,
    out: &mut Evaluation<MajorProgress>,
) -> ElectiveCoursesProgress {
    let mut satisfying: Vec<String> = plan
        .matching(&pool.courses)
        .into_iter()
        .filter(|c| !counted_elsewhere.contains(c))
        .collect();
    let mut counted = sum_credits(&satisfying, reference);

    if let Some(non_wharton) = &pool.non_wharton_courses {
        let matched: Vec<String> = plan
            .matching(non_wharton)
            .into_iter()
            .filter(|c| !satisfying.contains(c) && !counted_elsewhere.contains(c))
            .collect();
        let raw = sum_credits(&matched, reference);

        counted += match pool.non_wharton_max_credits {
            Some(max) if raw > max => {
                out.warnings.push(ValidationWarning::new(
                    WarningKind::IspCap,
                    Severity::Medium,
                    format!(
                        "{}: non-Wharton courses exceed {} CU limit ({} CU used)",
                        major.major_name, max, raw
                    ),
                ));
                max
            }
            _ => raw,
        };
        satisfying.extend(matched);
    }

    if let Some(additional) = &pool.additional_courses {
        let matched = plan.matching(&additional.courses);
        if let Some(max) = additional.max_credits {
            let raw = sum_credits(&matched, reference);
            if raw > max {
                out.warnings.push(ValidationWarning::new(
                    WarningKind::IspCap,
                    Severity::Medium,
                    format!(
                        "{}: additional-pool courses exceed {} CU limit ({} CU used)",
                        major.major_name, max, raw
                    ),
                ));
            }
        }

        let appended: Vec<String> = matched
            .into_iter()
            .filter(|c| !satisfying.contains(c) && !counted_elsewhere.contains(c))
            .collect();
        counted += sum_credits(&appended, reference);
        satisfying.extend(appended);
    }

    if counted < pool.credits_required {
        out.errors.push(
            ValidationError::new(
                ErrorKind::MissingMajorElective,
                format!(
                    "{}: need {} more CU of electives",
                    major.major_name,
                    pool.credits_required - counted
                ),
            )
            .with_requirement(&major.major_code),
        );
    }

    ElectiveCoursesProgress {
        credits_required: pool.credits_required,
        credits_satisfied: counted,
        satisfying_courses: satisfying,
    }
}

fn evaluate_required_set(
    major: &MajorRequirement,
    required: &RequiredCourses,
    plan: &PlanCourses<'_>,
    reference: &dyn ReferenceData,
    out: &mut Evaluation<MajorProgress>,
) -> RequiredCoursesProgress {
    let satisfying = plan.matching(&required.courses);
    let missing = plan.missing(&required.courses);
    let credits = sum_credits(&satisfying, reference);

    match required.selection_type {
        SelectionType::All => {
            if required.credits_required > 0.0 && credits < required.credits_required {
                out.errors.push(
                    ValidationError::new(
                        ErrorKind::MissingMajorRequired,
                        format!(
                            "{}: required courses incomplete ({}/{} CU)",
                            major.major_name, credits, required.credits_required
                        ),
                    )
                    .with_requirement(&major.major_code)
                    .with_courses(missing.clone()),
                );
            }
        }
        SelectionType::Choose => {
            if credits < required.credits_required {
                out.errors.push(
                    ValidationError::new(
                        ErrorKind::MissingMajorRequired,
                        format!(
                            "{}: need {} more CU of required courses",
                            major.major_name,
                            required.credits_required - credits
                        ),
                    )
                    .with_requirement(&major.major_code),
                );
            }
        }
    }

    RequiredCoursesProgress {
        credits_required: required.credits_required,
        credits_satisfied: credits,
        satisfying_courses: satisfying,
        missing_courses: missing,
        selection_type: required.selection_type,
    }
}

/// Evaluate one pillar under `mode`, which may differ from the pillar's
/// declared type (COMBINED_PILLARS checks every pillar as a minimum).
fn evaluate_pillar(
    major: &MajorRequirement,
    pillar: &Pillar,
    mode: CreditsType,
    plan: &PlanCourses<'_>,
    reference: &dyn ReferenceData,
    out: &mut Evaluation<MajorProgress>,
) -> PillarProgress {
    let satisfying = plan.matching(&pillar.courses);
    let missing = plan.missing(&pillar.courses);
    let credits = sum_credits(&satisfying, reference);

    match mode {
        CreditsType::Minimum if credits < pillar.credits_required => {
            out.errors.push(
                ValidationError::new(
                    ErrorKind::MissingMajorElective,
                    format!(
                        "{} - {}: need {} more CU (minimum {})",
                        major.major_name,
                        pillar.pillar_name,
                        pillar.credits_required - credits,
                        pillar.credits_required
                    ),
                )
                .with_requirement(format!("{}_{}", major.major_code, pillar.pillar_code)),
            );
        }
        CreditsType::Maximum if credits > pillar.credits_required => {
            out.warnings.push(ValidationWarning::new(
                WarningKind::IspCap,
                Severity::Medium,
                format!(
                    "{} - {}: exceeds maximum of {} CU ({} CU used)",
                    major.major_name, pillar.pillar_name, pillar.credits_required, credits
                ),
            ));
        }
        _ => {}
    }

    PillarProgress {
        pillar_code: pillar.pillar_code.clone(),
        pillar_name: pillar.pillar_name.clone(),
        credits_required: pillar.credits_required,
        credits_satisfied: credits,
        credits_type: pillar.credits_type,
        satisfying_courses: satisfying,
        missing_courses: missing,
    }
}

fn pillar_courses(pillars: &[PillarProgress]) -> Vec<String> {
    let mut courses: Vec<String> = Vec::new();
    for c in pillars.iter().flat_map(|p| &p.satisfying_courses) {
        if !courses.contains(c) {
            courses.push(c.clone());
        }
    }
    courses
}

fn check_isp_cap(
    major: &MajorRequirement,
    satisfying: &[String],
    reference: &dyn ReferenceData,
    out: &mut Evaluation<MajorProgress>,
) {
    let isp: Vec<String> = satisfying
        .iter()
        .filter(|c| is_isp_or_global_modular(c))
        .cloned()
        .collect();
    let credits = sum_credits(&isp, reference);

    if credits > ISP_GLOBAL_MODULAR_CAP_CU {
        out.warnings.push(
            ValidationWarning::new(
                WarningKind::IspCap,
                Severity::High,
                format!(
                    "{}: ISP/Global Modular courses exceed {:.1} CU cap ({} CU)",
                    major.major_name, ISP_GLOBAL_MODULAR_CAP_CU, credits
                ),
            )
            .with_related(isp),
        );
    }
}

fn check_prohibited_pairs(
    major: &MajorRequirement,
    plan: &PlanCourses<'_>,
    out: &mut Evaluation<MajorProgress>,
) {
    for &(a, b) in prohibited_pairs_for(&major.major_code) {
        if plan.contains(a) && plan.contains(b) {
            out.warnings.push(
                ValidationWarning::new(
                    WarningKind::ProhibitedCombo,
                    Severity::High,
                    format!(
                        "{}: cannot count both {a} and {b} toward this major",
                        major.major_name
                    ),
                )
                .with_course(a)
                .with_related(vec![a.to_owned(), b.to_owned()]),
            );
        }
    }
}

/// Whole-number percent, clamped to `0..=100`. A major with no credit
/// requirement is complete.
fn percent_complete(satisfied: f64, required: f64) -> u32 {
    if required <= 0.0 {
        return 100;
    }
    (satisfied / required * 100.0).round().clamp(0.0, 100.0) as u32
}
