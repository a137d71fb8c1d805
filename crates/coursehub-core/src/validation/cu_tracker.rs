//! Per-quarter and per-semester credit totals, load warnings and term
//! availability checks.

use std::collections::BTreeMap;

use serde::Serialize;

use coursehub_data::ReferenceData;

use crate::plan::{QuarterId, SemesterId};

use super::rules::{GRADUATION_MAX_CU, GRADUATION_MIN_CU, QUARTER_OVERLOAD_CU, SEMESTER_OVERLOAD_CU};
use super::sum_credits;
use super::types::{GraduationProgress, QuarterOrder, Severity, ValidationWarning, WarningKind};

/// Credit totals for one plan snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuReport {
    /// Every quarter, including empty ones.
    pub quarter_cu: BTreeMap<QuarterId, f64>,
    pub semester_cu: BTreeMap<SemesterId, f64>,
    pub total_cu: f64,
    pub graduation_progress: GraduationProgress,
    pub warnings: Vec<ValidationWarning>,
}

/// Sum credits per quarter and semester and flag overloads and term
/// mismatches. Credit units come from the reference data; unknown courses
/// count as zero and are never a mismatch.
pub fn track_credit_units(quarter_order: &QuarterOrder, reference: &dyn ReferenceData) -> CuReport {
    let mut warnings = Vec::new();

    let quarter_cu: BTreeMap<QuarterId, f64> = QuarterId::ALL
        .into_iter()
        .map(|q| {
            let cu = quarter_order
                .get(&q)
                .map(|ids| sum_credits(ids, reference))
                .unwrap_or(0.0);
            (q, cu)
        })
        .collect();

    for (quarter, &cu) in &quarter_cu {
        if cu > QUARTER_OVERLOAD_CU {
            warnings.push(ValidationWarning::new(
                WarningKind::QuarterOverload,
                Severity::Medium,
                format!(
                    "{quarter} has {cu} CU, which exceeds the recommended {QUARTER_OVERLOAD_CU} CU per quarter"
                ),
            ));
        }
    }

    let semester_cu: BTreeMap<SemesterId, f64> = SemesterId::ALL
        .into_iter()
        .map(|s| (s, s.quarters().iter().map(|q| quarter_cu[q]).sum()))
        .collect();

    for (semester, &cu) in &semester_cu {
        if cu > SEMESTER_OVERLOAD_CU {
            warnings.push(ValidationWarning::new(
                WarningKind::QuarterOverload,
                Severity::Medium,
                format!(
                    "{} has {cu} CU, which exceeds the recommended {SEMESTER_OVERLOAD_CU} CU per semester",
                    semester.label()
                ),
            ));
        }
    }

    for (&quarter, course_ids) in quarter_order {
        let term = quarter.term();
        for course_id in course_ids {
            let Some(available) = reference.term_availability(course_id) else {
                continue;
            };
            if !available.allows(term.availability()) {
                warnings.push(
                    ValidationWarning::new(
                        WarningKind::TermMismatch,
                        Severity::High,
                        format!(
                            "{course_id} is only offered in {available} but is placed in a {term} quarter ({quarter})"
                        ),
                    )
                    .with_course(course_id.as_str()),
                );
            }
        }
    }

    let total_cu: f64 = quarter_cu.values().sum();
    tracing::debug!(total_cu, warnings = warnings.len(), "tracked credit units");

    CuReport {
        quarter_cu,
        semester_cu,
        total_cu,
        graduation_progress: GraduationProgress {
            total_cu,
            minimum_cu: GRADUATION_MIN_CU,
            maximum_cu: GRADUATION_MAX_CU,
            is_in_range: (GRADUATION_MIN_CU..=GRADUATION_MAX_CU).contains(&total_cu),
        },
        warnings,
    }
}
