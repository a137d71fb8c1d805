//! Report types produced by the validation pipeline.
//!
//! Everything here serializes to JSON with snake_case field names and
//! snake_case enum tags.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use coursehub_data::models::{CreditsType, SelectionType};

use crate::plan::QuarterId;
use crate::profile::WaiverConfig;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Ordered course IDs per quarter. Quarters with no courses may be absent.
pub type QuarterOrder = BTreeMap<QuarterId, Vec<String>>;

/// Everything the orchestrator reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatePlanInput {
    /// Course IDs placed in quarters (staging excluded).
    pub placed_course_ids: Vec<String>,
    /// Course IDs anywhere in the plan (staging included).
    pub all_course_ids: Vec<String>,
    pub quarter_order: QuarterOrder,
    /// Declared major codes, in declaration order.
    pub majors: Vec<String>,
    pub waivers: Vec<WaiverConfig>,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Diagnostics that make a plan invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCore,
    MissingMajorRequired,
    MissingMajorElective,
    InsufficientCu,
    MutualExclusion,
    ProhibitedCombination,
    MajorCoreOverride,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingCore => "missing_core",
            Self::MissingMajorRequired => "missing_major_required",
            Self::MissingMajorElective => "missing_major_elective",
            Self::InsufficientCu => "insufficient_cu",
            Self::MutualExclusion => "mutual_exclusion",
            Self::ProhibitedCombination => "prohibited_combination",
            Self::MajorCoreOverride => "major_core_override",
        };
        f.write_str(s)
    }
}

/// Advisory diagnostics. Warnings never affect validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    QuarterOverload,
    TermMismatch,
    DoubleCount,
    IspCap,
    ProhibitedCombo,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::QuarterOverload => "quarter_overload",
            Self::TermMismatch => "term_mismatch",
            Self::DoubleCount => "double_count",
            Self::IspCap => "isp_cap",
            Self::ProhibitedCombo => "prohibited_combo",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub course_ids: Vec<String>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            requirement_code: None,
            course_ids: Vec::new(),
        }
    }

    pub fn with_requirement(mut self, code: impl Into<String>) -> Self {
        self.requirement_code = Some(code.into());
        self
    }

    pub fn with_courses(mut self, course_ids: Vec<String>) -> Self {
        self.course_ids = course_ids;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_course_ids: Vec<String>,
}

impl ValidationWarning {
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            course_id: None,
            message: message.into(),
            severity,
            related_course_ids: Vec::new(),
        }
    }

    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn with_related(mut self, course_ids: Vec<String>) -> Self {
        self.related_course_ids = course_ids;
        self
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreStatus {
    Satisfied,
    Partial,
    Missing,
    Waived,
}

impl fmt::Display for CoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Satisfied => "satisfied",
            Self::Partial => "partial",
            Self::Missing => "missing",
            Self::Waived => "waived",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreProgress {
    pub core_code: String,
    pub core_name: String,
    pub status: CoreStatus,
    pub credits_required: f64,
    pub credits_satisfied: f64,
    pub satisfying_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredCoursesProgress {
    pub credits_required: f64,
    pub credits_satisfied: f64,
    pub satisfying_courses: Vec<String>,
    pub missing_courses: Vec<String>,
    pub selection_type: SelectionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveCoursesProgress {
    pub credits_required: f64,
    pub credits_satisfied: f64,
    pub satisfying_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarProgress {
    pub pillar_code: String,
    pub pillar_name: String,
    pub credits_required: f64,
    pub credits_satisfied: f64,
    pub credits_type: CreditsType,
    pub satisfying_courses: Vec<String>,
    pub missing_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorProgress {
    pub major_code: String,
    pub major_name: String,
    pub total_credits_required: f64,
    pub total_credits_satisfied: f64,
    /// Always within `0..=100`.
    pub percent_complete: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_courses_progress: Option<RequiredCoursesProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elective_courses_progress: Option<ElectiveCoursesProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pillar_progress: Option<Vec<PillarProgress>>,
}

impl MajorProgress {
    /// A record with no progress and no breakdown.
    pub fn empty(major_code: &str, major_name: &str, total_credits_required: f64) -> Self {
        Self {
            major_code: major_code.to_owned(),
            major_name: major_name.to_owned(),
            total_credits_required,
            total_credits_satisfied: 0.0,
            percent_complete: 0,
            required_courses_progress: None,
            elective_courses_progress: None,
            pillar_progress: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraduationProgress {
    pub total_cu: f64,
    pub minimum_cu: f64,
    pub maximum_cu: f64,
    pub is_in_range: bool,
}

/// The aggregated report. Rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub can_mark_complete: bool,
    pub total_cu: f64,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub core_progress: Vec<CoreProgress>,
    pub major_progress: Vec<MajorProgress>,
    pub graduation_progress: GraduationProgress,
}

impl ValidationResult {
    /// Errors of one kind.
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &ValidationWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}
