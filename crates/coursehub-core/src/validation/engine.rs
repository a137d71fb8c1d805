//! The validation orchestrator.

use coursehub_data::ReferenceData;

use super::core_rules::evaluate_core_requirements;
use super::cross_rules::evaluate_cross_rules;
use super::cu_tracker::track_credit_units;
use super::major_rules::evaluate_majors;
use super::rules::{GRADUATION_MAX_CU, GRADUATION_MIN_CU};
use super::types::{
    ErrorKind, Severity, ValidatePlanInput, ValidationError, ValidationResult, ValidationWarning,
    WarningKind,
};

/// Validate one plan snapshot.
///
/// Pure: the result depends only on `input` and `reference`, and two calls
/// with equal inputs produce equal results.
pub fn validate_plan(input: &ValidatePlanInput, reference: &dyn ReferenceData) -> ValidationResult {
    let core = evaluate_core_requirements(reference.core_requirements(), input, reference);
    let majors = evaluate_majors(input, reference);
    let cross = evaluate_cross_rules(input);
    let cu = track_credit_units(&input.quarter_order, reference);

    let mut errors: Vec<ValidationError> = core
        .errors
        .into_iter()
        .chain(majors.errors)
        .chain(cross.errors)
        .collect();
    let mut warnings: Vec<ValidationWarning> = core
        .warnings
        .into_iter()
        .chain(majors.warnings)
        .chain(cross.warnings)
        .chain(cu.warnings)
        .collect();

    let total_cu = cu.total_cu;
    if !input.placed_course_ids.is_empty() {
        if total_cu < GRADUATION_MIN_CU {
            errors.push(ValidationError::new(
                ErrorKind::InsufficientCu,
                format!("Total CU ({total_cu}) is below graduation minimum of {GRADUATION_MIN_CU}"),
            ));
        } else if total_cu > GRADUATION_MAX_CU {
            warnings.push(ValidationWarning::new(
                WarningKind::QuarterOverload,
                Severity::High,
                format!("Total CU ({total_cu}) exceeds graduation maximum of {GRADUATION_MAX_CU}"),
            ));
        }
    }

    let is_valid = errors.is_empty();
    tracing::debug!(
        is_valid,
        total_cu,
        errors = errors.len(),
        warnings = warnings.len(),
        "validated plan"
    );

    ValidationResult {
        is_valid,
        can_mark_complete: is_valid,
        total_cu,
        errors,
        warnings,
        core_progress: core.progress,
        major_progress: majors.progress,
        graduation_progress: cu.graduation_progress,
    }
}
