//! Dataset consistency check.
//!
//! Cross-references the requirement datasets against the catalog and
//! reports every course ID a requirement names that the catalog cannot
//! resolve. Unresolved IDs do not break validation (they count as zero
//! credit units) but they silently weaken it, so the CLI surfaces them.

use serde::Serialize;

use crate::tables::{ReferenceData, ReferenceTables};

/// Where an unresolved course ID was referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub course_id: String,
    /// `core:<CODE>` or `major:<CODE>`.
    pub referenced_by: String,
}

/// Outcome of [`check_consistency`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub unresolved: Vec<UnresolvedReference>,
    /// Catalog courses no requirement references.
    pub unreferenced_courses: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Check that every requirement-referenced course resolves in the catalog.
pub fn check_consistency(tables: &ReferenceTables) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();
    let mut referenced: Vec<String> = Vec::new();

    for req in tables.core_requirements() {
        for id in &req.courses {
            note(tables, &mut report, &mut referenced, id, format!("core:{}", req.core_code));
        }
    }

    for major in tables.majors() {
        for id in major.course_ids() {
            note(
                tables,
                &mut report,
                &mut referenced,
                &id,
                format!("major:{}", major.major_code),
            );
        }
    }

    report.unreferenced_courses = tables
        .courses()
        .iter()
        .filter(|c| !referenced.contains(&c.course_id))
        .map(|c| c.course_id.clone())
        .collect();

    if !report.is_clean() {
        tracing::warn!(
            unresolved = report.unresolved.len(),
            "requirement datasets reference courses missing from the catalog"
        );
    }

    report
}

fn note(
    tables: &ReferenceTables,
    report: &mut ConsistencyReport,
    referenced: &mut Vec<String>,
    course_id: &str,
    referenced_by: String,
) {
    if tables.resolve_course(course_id).is_none() {
        report.unresolved.push(UnresolvedReference {
            course_id: course_id.to_owned(),
            referenced_by,
        });
    } else if !referenced.iter().any(|c| c == course_id) {
        referenced.push(course_id.to_owned());
    }
}
