use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Terms in which a course is offered.
///
/// Courses with no recorded availability carry `None` in
/// [`Course::term_availability`] and never produce a term mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermAvailability {
    Fall,
    Spring,
    Both,
}

impl TermAvailability {
    /// Whether a course with this availability may run in `term`.
    pub fn allows(self, term: TermAvailability) -> bool {
        self == TermAvailability::Both || self == term
    }
}

impl fmt::Display for TermAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fall => "Fall",
            Self::Spring => "Spring",
            Self::Both => "Both",
        };
        f.write_str(s)
    }
}

impl FromStr for TermAvailability {
    type Err = TermAvailabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fall" => Ok(Self::Fall),
            "Spring" => Ok(Self::Spring),
            "Both" => Ok(Self::Both),
            other => Err(TermAvailabilityParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TermAvailability`] string.
#[derive(Debug, Clone)]
pub struct TermAvailabilityParseError(pub String);

impl fmt::Display for TermAvailabilityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid term availability: {:?}", self.0)
    }
}

impl std::error::Error for TermAvailabilityParseError {}

// ---------------------------------------------------------------------------

/// Whether a core requirement names one course or a choice among several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreType {
    Fixed,
    Flex,
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fixed => "fixed",
            Self::Flex => "flex",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// How a waiver or substitution is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverMethod {
    Credential,
    Exam,
}

// ---------------------------------------------------------------------------

/// Selection mode of a major's required-course set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    /// Every listed course must appear in the plan.
    #[default]
    All,
    /// Any subset of the listed courses may meet the credit threshold.
    Choose,
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Choose => "choose",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// Credit-counting mode of a pillar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditsType {
    #[default]
    Minimum,
    Maximum,
    /// The pillar only counts toward a total shared with the other pillars.
    CombinedWithOtherPillars,
}

impl fmt::Display for CreditsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::CombinedWithOtherPillars => "combined_with_other_pillars",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A course from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course ID (e.g. `FNCE6110`).
    pub course_id: String,
    #[serde(default)]
    pub title: String,
    pub department: String,
    /// Credit units, typically 0.5 or 1.0.
    pub credit_units: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_availability: Option<TermAvailability>,
    #[serde(default = "default_true")]
    pub is_wharton: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Core requirements
// ---------------------------------------------------------------------------

/// A mandatory core-curriculum element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreRequirement {
    pub core_code: String,
    pub core_name: String,
    pub core_type: CoreType,
    pub credits_required: f64,
    /// Courses that can satisfy the requirement. Entries are interchangeable.
    pub courses: Vec<String>,
    #[serde(default)]
    pub waivable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiver_details: Option<WaiverDetails>,
    #[serde(default)]
    pub notes: String,
}

impl CoreRequirement {
    /// The substitution rule, when the requirement defines one.
    pub fn substitution(&self) -> Option<&SubstitutionRule> {
        self.waiver_details
            .as_ref()
            .and_then(|d| d.substitution.as_ref())
    }
}

/// The waiver mechanisms a core requirement supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaiverDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiver: Option<WaiverOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<SubstitutionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<PlacementOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiverOption {
    pub methods: Vec<WaiverMethod>,
}

/// Replacement of a core requirement by upper-level coursework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionRule {
    #[serde(default)]
    pub methods: Vec<WaiverMethod>,
    /// Credits the substitute coursework must add up to.
    pub credits_required: f64,
    #[serde(default)]
    pub description: String,
    /// A plan course counts when its ID starts with any of these.
    #[serde(default)]
    pub eligible_course_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOption {
    #[serde(default)]
    pub methods: Vec<WaiverMethod>,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Major requirements
// ---------------------------------------------------------------------------

/// An elective specialization track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorRequirement {
    pub major_code: String,
    pub major_name: String,
    pub total_credits_required: f64,
    pub requirements: RequirementStructure,
    #[serde(default)]
    pub special_notes: String,
}

impl MajorRequirement {
    /// Every course ID referenced anywhere in the major, deduplicated, in
    /// declaration order.
    pub fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let mut push_all = |courses: &[String]| {
            for c in courses {
                if !ids.contains(c) {
                    ids.push(c.clone());
                }
            }
        };

        match &self.requirements {
            RequirementStructure::Electives { elective_courses } => {
                elective_courses.for_each_pool(&mut push_all);
            }
            RequirementStructure::Combined {
                required_courses,
                elective_courses,
            } => {
                push_all(&required_courses.courses);
                elective_courses.for_each_pool(&mut push_all);
            }
            RequirementStructure::Pillars { pillars } => {
                for p in pillars {
                    push_all(&p.courses);
                }
            }
            RequirementStructure::CombinedPillars {
                required_courses,
                pillars,
            } => {
                push_all(&required_courses.courses);
                for p in pillars {
                    push_all(&p.courses);
                }
            }
            RequirementStructure::Unrecognized => {}
        }

        ids
    }
}

/// The four requirement shapes a major can take, tagged by `structure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "structure", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementStructure {
    Electives {
        elective_courses: ElectiveCourses,
    },
    Combined {
        required_courses: RequiredCourses,
        elective_courses: ElectiveCourses,
    },
    Pillars {
        pillars: Vec<Pillar>,
    },
    CombinedPillars {
        required_courses: RequiredCourses,
        pillars: Vec<Pillar>,
    },
    /// Any structure tag this build does not know about.
    #[serde(other)]
    Unrecognized,
}

impl RequirementStructure {
    /// The tag as written in the dataset.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Electives { .. } => "ELECTIVES",
            Self::Combined { .. } => "COMBINED",
            Self::Pillars { .. } => "PILLARS",
            Self::CombinedPillars { .. } => "COMBINED_PILLARS",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

/// An elective pool with its optional extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectiveCourses {
    pub credits_required: f64,
    pub courses: Vec<String>,
    /// Cap on credits from `non_wharton_courses`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_wharton_max_credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_wharton_courses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_courses: Option<AdditionalCourses>,
}

impl ElectiveCourses {
    fn for_each_pool(&self, f: &mut impl FnMut(&[String])) {
        f(&self.courses);
        if let Some(nw) = &self.non_wharton_courses {
            f(nw);
        }
        if let Some(add) = &self.additional_courses {
            f(&add.courses);
        }
    }
}

/// A secondary elective pool with an advisory credit cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalCourses {
    pub courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_credits: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredCourses {
    pub credits_required: f64,
    pub courses: Vec<String>,
    #[serde(default)]
    pub selection_type: SelectionType,
}

/// A named sub-pool of a major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pillar {
    pub pillar_code: String,
    pub pillar_name: String,
    pub credits_required: f64,
    #[serde(default)]
    pub credits_type: CreditsType,
    pub courses: Vec<String>,
}
