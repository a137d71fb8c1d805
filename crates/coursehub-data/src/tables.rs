//! Reference tables: the read-only course catalog and requirement
//! definitions every evaluator queries.
//!
//! The datasets ship as TOML files embedded at compile time. A directory
//! holding the same three files can replace them at runtime (see
//! [`ReferenceTables::from_dir`]).

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{CoreRequirement, CoreType, Course, MajorRequirement, TermAvailability};

/// File name of the course catalog dataset.
pub const CATALOG_FILE: &str = "catalog.toml";
/// File name of the core requirements dataset.
pub const CORE_REQUIREMENTS_FILE: &str = "core_requirements.toml";
/// File name of the major requirements dataset.
pub const MAJOR_REQUIREMENTS_FILE: &str = "major_requirements.toml";

static CATALOG_TOML: &str = include_str!("../data/catalog.toml");
static CORE_REQUIREMENTS_TOML: &str = include_str!("../data/core_requirements.toml");
static MAJOR_REQUIREMENTS_TOML: &str = include_str!("../data/major_requirements.toml");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading reference datasets.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Toml {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("duplicate course ID in catalog: {0:?}")]
    DuplicateCourse(String),

    #[error("course {course:?} has non-positive credit units ({credit_units})")]
    InvalidCreditUnits { course: String, credit_units: f64 },

    #[error("duplicate core requirement code: {0:?}")]
    DuplicateCoreCode(String),

    #[error("duplicate major code: {0:?}")]
    DuplicateMajorCode(String),
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Lookup interface the validation pipeline consumes.
///
/// Every query is synchronous and infallible: an unknown ID yields `None`
/// and callers treat it as zero credit units.
pub trait ReferenceData: Send + Sync {
    /// Look up a course by ID.
    fn resolve_course(&self, course_id: &str) -> Option<&Course>;

    /// All core requirements, in program order.
    fn core_requirements(&self) -> &[CoreRequirement];

    /// Look up a major's requirement definition by code.
    fn major_requirement(&self, major_code: &str) -> Option<&MajorRequirement>;

    /// Credit units of a course, or `None` when the course is unknown.
    fn credit_units(&self, course_id: &str) -> Option<f64> {
        self.resolve_course(course_id).map(|c| c.credit_units)
    }

    /// Term availability of a course, when recorded.
    fn term_availability(&self, course_id: &str) -> Option<TermAvailability> {
        self.resolve_course(course_id)
            .and_then(|c| c.term_availability)
    }
}

const _: () = {
    fn _assert_object_safe(_: &dyn ReferenceData) {}
};

// ---------------------------------------------------------------------------
// File layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
struct CoreRequirementsFile {
    #[serde(default)]
    core_requirements: Vec<CoreRequirement>,
}

#[derive(Debug, Deserialize)]
struct MajorRequirementsFile {
    #[serde(default)]
    majors: Vec<MajorRequirement>,
}

// ---------------------------------------------------------------------------
// ReferenceTables
// ---------------------------------------------------------------------------

/// In-memory reference tables, indexed by course ID and major code.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    courses: Vec<Course>,
    course_index: HashMap<String, usize>,
    core_requirements: Vec<CoreRequirement>,
    majors: Vec<MajorRequirement>,
    major_index: HashMap<String, usize>,
}

impl ReferenceTables {
    /// Build tables from already-parsed records.
    ///
    /// Rejects duplicate keys and non-positive credit units.
    pub fn from_parts(
        courses: Vec<Course>,
        core_requirements: Vec<CoreRequirement>,
        majors: Vec<MajorRequirement>,
    ) -> Result<Self, DataError> {
        let mut course_index = HashMap::with_capacity(courses.len());
        for (i, course) in courses.iter().enumerate() {
            if course.credit_units.is_nan() || course.credit_units <= 0.0 {
                return Err(DataError::InvalidCreditUnits {
                    course: course.course_id.clone(),
                    credit_units: course.credit_units,
                });
            }
            if course_index.insert(course.course_id.clone(), i).is_some() {
                return Err(DataError::DuplicateCourse(course.course_id.clone()));
            }
        }

        let mut seen_cores = HashSet::new();
        for req in &core_requirements {
            if !seen_cores.insert(req.core_code.as_str()) {
                return Err(DataError::DuplicateCoreCode(req.core_code.clone()));
            }
        }

        let mut major_index = HashMap::with_capacity(majors.len());
        for (i, major) in majors.iter().enumerate() {
            if major_index.insert(major.major_code.clone(), i).is_some() {
                return Err(DataError::DuplicateMajorCode(major.major_code.clone()));
            }
        }

        Ok(Self {
            courses,
            course_index,
            core_requirements,
            majors,
            major_index,
        })
    }

    /// Parse the three datasets from TOML strings.
    pub fn from_toml_strs(
        catalog: &str,
        core_requirements: &str,
        major_requirements: &str,
    ) -> Result<Self, DataError> {
        let catalog: CatalogFile = parse(CATALOG_FILE, catalog)?;
        let cores: CoreRequirementsFile = parse(CORE_REQUIREMENTS_FILE, core_requirements)?;
        let majors: MajorRequirementsFile = parse(MAJOR_REQUIREMENTS_FILE, major_requirements)?;

        let tables = Self::from_parts(catalog.courses, cores.core_requirements, majors.majors)?;
        tracing::info!(
            courses = tables.courses.len(),
            core_requirements = tables.core_requirements.len(),
            majors = tables.majors.len(),
            "loaded reference tables"
        );
        Ok(tables)
    }

    /// Load the datasets compiled into the binary.
    ///
    /// # Panics
    ///
    /// Panics if an embedded dataset is malformed. The files are fixed at
    /// build time and covered by tests, so a successful build implies they
    /// load.
    pub fn embedded() -> Self {
        Self::from_toml_strs(
            CATALOG_TOML,
            CORE_REQUIREMENTS_TOML,
            MAJOR_REQUIREMENTS_TOML,
        )
        .expect("embedded reference datasets are invalid")
    }

    /// Load `catalog.toml`, `core_requirements.toml` and
    /// `major_requirements.toml` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, DataError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })
        };
        Self::from_toml_strs(
            &read(CATALOG_FILE)?,
            &read(CORE_REQUIREMENTS_FILE)?,
            &read(MAJOR_REQUIREMENTS_FILE)?,
        )
    }

    /// Every catalog course, in dataset order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Every major, in dataset order.
    pub fn majors(&self) -> &[MajorRequirement] {
        &self.majors
    }

    /// Every major code, in dataset order.
    pub fn major_codes(&self) -> Vec<&str> {
        self.majors.iter().map(|m| m.major_code.as_str()).collect()
    }

    /// Look up a core requirement by code.
    pub fn core_requirement(&self, core_code: &str) -> Option<&CoreRequirement> {
        self.core_requirements
            .iter()
            .find(|r| r.core_code == core_code)
    }

    pub fn fixed_core_requirements(&self) -> Vec<&CoreRequirement> {
        self.core_requirements
            .iter()
            .filter(|r| r.core_type == CoreType::Fixed)
            .collect()
    }

    pub fn flex_core_requirements(&self) -> Vec<&CoreRequirement> {
        self.core_requirements
            .iter()
            .filter(|r| r.core_type == CoreType::Flex)
            .collect()
    }

    pub fn waivable_core_requirements(&self) -> Vec<&CoreRequirement> {
        self.core_requirements.iter().filter(|r| r.waivable).collect()
    }

    /// Total credits of all core requirements.
    pub fn total_core_credits(&self) -> f64 {
        self.core_requirements
            .iter()
            .map(|r| r.credits_required)
            .sum()
    }

    /// All course IDs referenced by a major (empty for an unknown code).
    pub fn major_course_ids(&self, major_code: &str) -> Vec<String> {
        self.major_requirement(major_code)
            .map(MajorRequirement::course_ids)
            .unwrap_or_default()
    }

    /// Whether `course_id` appears anywhere in the major's requirements.
    pub fn course_counts_for_major(&self, course_id: &str, major_code: &str) -> bool {
        self.major_course_ids(major_code)
            .iter()
            .any(|c| c == course_id)
    }

    /// Core requirements `course_id` can satisfy.
    pub fn core_requirements_for_course(&self, course_id: &str) -> Vec<&CoreRequirement> {
        self.core_requirements
            .iter()
            .filter(|r| r.courses.iter().any(|c| c == course_id))
            .collect()
    }

    /// Codes of the majors `course_id` counts toward.
    pub fn majors_for_course(&self, course_id: &str) -> Vec<&str> {
        self.majors
            .iter()
            .filter(|m| m.course_ids().iter().any(|c| c == course_id))
            .map(|m| m.major_code.as_str())
            .collect()
    }
}

impl ReferenceData for ReferenceTables {
    fn resolve_course(&self, course_id: &str) -> Option<&Course> {
        self.course_index
            .get(course_id)
            .map(|&i| &self.courses[i])
    }

    fn core_requirements(&self) -> &[CoreRequirement] {
        &self.core_requirements
    }

    fn major_requirement(&self, major_code: &str) -> Option<&MajorRequirement> {
        self.major_index
            .get(major_code)
            .map(|&i| &self.majors[i])
    }
}

fn parse<T: serde::de::DeserializeOwned>(file: &str, content: &str) -> Result<T, DataError> {
    toml::from_str(content).map_err(|source| DataError::Toml {
        file: file.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequirementStructure;

    fn course(id: &str, cu: f64) -> Course {
        Course {
            course_id: id.to_owned(),
            title: String::new(),
            department: id[..4].to_owned(),
            credit_units: cu,
            term_availability: None,
            is_wharton: true,
        }
    }

    #[test]
    fn rejects_duplicate_course() {
        let err = ReferenceTables::from_parts(
            vec![course("ACCT6110", 0.5), course("ACCT6110", 0.5)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(
            matches!(err, DataError::DuplicateCourse(ref id) if id == "ACCT6110"),
            "expected DuplicateCourse, got: {err}"
        );
    }

    #[test]
    fn rejects_zero_credit_units() {
        let err = ReferenceTables::from_parts(vec![course("ACCT6110", 0.0)], vec![], vec![])
            .unwrap_err();
        assert!(
            matches!(err, DataError::InvalidCreditUnits { .. }),
            "expected InvalidCreditUnits, got: {err}"
        );
    }

    #[test]
    fn unknown_course_has_no_credit_units() {
        let tables =
            ReferenceTables::from_parts(vec![course("ACCT6110", 0.5)], vec![], vec![]).unwrap();
        assert_eq!(tables.credit_units("ACCT6110"), Some(0.5));
        assert_eq!(tables.credit_units("NOPE0000"), None);
        assert_eq!(tables.term_availability("ACCT6110"), None);
    }

    #[test]
    fn embedded_datasets_load() {
        let tables = ReferenceTables::embedded();
        assert_eq!(tables.core_requirements().len(), 13);
        assert_eq!(tables.majors().len(), 21);
        assert!(tables.credit_units("FNCE6110").is_some());
    }

    #[test]
    fn embedded_majors_cover_every_structure() {
        let tables = ReferenceTables::embedded();
        let tags: HashSet<&str> = tables
            .majors()
            .iter()
            .map(|m| m.requirements.tag())
            .collect();
        for tag in ["ELECTIVES", "COMBINED", "PILLARS", "COMBINED_PILLARS"] {
            assert!(tags.contains(tag), "no embedded major uses {tag}");
        }
        assert!(
            !tables
                .majors()
                .iter()
                .any(|m| m.requirements == RequirementStructure::Unrecognized),
            "embedded majors should all have a known structure"
        );
    }

    #[test]
    fn malformed_toml_names_the_file() {
        let err = ReferenceTables::from_toml_strs("courses = 3", "", "").unwrap_err();
        match err {
            DataError::Toml { file, .. } => assert_eq!(file, CATALOG_FILE),
            other => panic!("expected Toml error, got: {other}"),
        }
    }
}
