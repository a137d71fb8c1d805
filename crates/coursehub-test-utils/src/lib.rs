//! Shared test utilities for coursehub tests.
//!
//! Provides a small synthetic reference dataset so tests exercise the
//! validation rules without depending on the shipped catalog. The fixture
//! keeps the requirement codes and course IDs the rules single out
//! (`STAT_CORE`, `OIDD_FLEX`, `FNCE6210`, ...) and trims everything else.
//!
//! Fixture majors by structure:
//! - `FNCE`, `BEES`, `AIFB`, `LEAD`: ELECTIVES (`FNCE` has a non-Wharton
//!   allowance capped at 1.0 CU)
//! - `QFNC`, `BUAN`, `MKTG`: COMBINED (`BUAN` has a 0.0 CU required set and
//!   an additional pool capped at 0.5 CU; `MKTG` uses `choose`)
//! - `ESGB`, `MGMT`: PILLARS (`ESGB` combined, `MGMT` minimum + maximum)
//! - `STRA`: COMBINED_PILLARS

use std::path::Path;

use coursehub_data::ReferenceTables;
use coursehub_data::models::{
    CoreRequirement, CoreType, Course, CreditsType, ElectiveCourses, MajorRequirement, Pillar,
    RequiredCourses, RequirementStructure, SelectionType, TermAvailability,
};
use coursehub_data::tables::{CATALOG_FILE, CORE_REQUIREMENTS_FILE, MAJOR_REQUIREMENTS_FILE};

// ---------------------------------------------------------------------------
// Fixture datasets
// ---------------------------------------------------------------------------

pub const FIXTURE_CATALOG_TOML: &str = r#"
[[courses]]
course_id = "MGMT6100"
department = "MGMT"
credit_units = 0.5
term_availability = "Fall"

[[courses]]
course_id = "STAT6130"
department = "STAT"
credit_units = 1.0
term_availability = "Fall"

[[courses]]
course_id = "STAT6210"
department = "STAT"
credit_units = 0.5
term_availability = "Both"

[[courses]]
course_id = "STAT7050"
department = "STAT"
credit_units = 0.5

[[courses]]
course_id = "STAT7110"
department = "STAT"
credit_units = 1.0
term_availability = "Fall"

[[courses]]
course_id = "ACCT6110"
department = "ACCT"
credit_units = 0.5
term_availability = "Fall"

[[courses]]
course_id = "ACCT6130"
department = "ACCT"
credit_units = 1.0
term_availability = "Spring"

[[courses]]
course_id = "ACCT7420"
department = "ACCT"
credit_units = 1.0

[[courses]]
course_id = "ACCT7430"
department = "ACCT"
credit_units = 0.5

[[courses]]
course_id = "FNCE6110"
department = "FNCE"
credit_units = 1.0
term_availability = "Both"

[[courses]]
course_id = "FNCE6210"
department = "FNCE"
credit_units = 0.5
term_availability = "Spring"

[[courses]]
course_id = "FNCE6130"
department = "FNCE"
credit_units = 1.0
term_availability = "Both"

[[courses]]
course_id = "FNCE6230"
department = "FNCE"
credit_units = 0.5
term_availability = "Spring"

[[courses]]
course_id = "FNCE7070"
department = "FNCE"
credit_units = 0.5

[[courses]]
course_id = "FNCE7170"
department = "FNCE"
credit_units = 1.0
term_availability = "Fall"

[[courses]]
course_id = "FNCE7250"
department = "FNCE"
credit_units = 0.5
term_availability = "Spring"

[[courses]]
course_id = "FNCE8930"
department = "FNCE"
credit_units = 0.5

[[courses]]
course_id = "FNCE8990"
department = "FNCE"
credit_units = 1.0

[[courses]]
course_id = "ECON7020"
department = "ECON"
credit_units = 1.0
is_wharton = false

[[courses]]
course_id = "ECON7100"
department = "ECON"
credit_units = 1.0
is_wharton = false

[[courses]]
course_id = "OIDD6110"
department = "OIDD"
credit_units = 0.5

[[courses]]
course_id = "OIDD6120"
department = "OIDD"
credit_units = 0.5

[[courses]]
course_id = "OIDD6130"
department = "OIDD"
credit_units = 0.5
term_availability = "Fall"

[[courses]]
course_id = "OIDD6620"
department = "OIDD"
credit_units = 0.5
term_availability = "Spring"

[[courses]]
course_id = "OIDD6900"
department = "OIDD"
credit_units = 0.5

[[courses]]
course_id = "MKTG7110"
department = "MKTG"
credit_units = 0.5

[[courses]]
course_id = "MKTG7120"
department = "MKTG"
credit_units = 0.5

[[courses]]
course_id = "MKTG7270"
department = "MKTG"
credit_units = 0.5

[[courses]]
course_id = "MKTG7700"
department = "MKTG"
credit_units = 0.5

[[courses]]
course_id = "MGMT7210"
department = "MGMT"
credit_units = 0.5

[[courses]]
course_id = "MGMT7310"
department = "MGMT"
credit_units = 0.5

[[courses]]
course_id = "MGMT7720"
department = "MGMT"
credit_units = 0.5

[[courses]]
course_id = "LGST8130"
department = "LGST"
credit_units = 0.5

[[courses]]
course_id = "BEPP7630"
department = "BEPP"
credit_units = 0.5
"#;

pub const FIXTURE_CORE_REQUIREMENTS_TOML: &str = r#"
[[core_requirements]]
core_code = "MGMT_FOUNDATION"
core_name = "Foundations of Teamwork and Leadership"
core_type = "fixed"
credits_required = 0.5
courses = ["MGMT6100"]

[[core_requirements]]
core_code = "STAT_CORE"
core_name = "Statistics"
core_type = "flex"
credits_required = 1.0
courses = ["STAT6130"]
waivable = true

[core_requirements.waiver_details.substitution]
credits_required = 1.0
eligible_course_prefixes = ["STAT7"]

[core_requirements.waiver_details.placement]
methods = ["exam"]

[[core_requirements]]
core_code = "ACCT_FLEX"
core_name = "Financial Accounting"
core_type = "flex"
credits_required = 0.5
courses = ["ACCT6130", "ACCT6110"]
waivable = true

[core_requirements.waiver_details.waiver]
methods = ["credential"]

[core_requirements.waiver_details.substitution]
credits_required = 1.0
eligible_course_prefixes = ["ACCT7"]

[[core_requirements]]
core_code = "FNCE_CORP_FLEX"
core_name = "Corporate Finance"
core_type = "flex"
credits_required = 0.5
courses = ["FNCE6110", "FNCE6210"]
waivable = true

[[core_requirements]]
core_code = "FNCE_MACRO_FLEX"
core_name = "Macroeconomics"
core_type = "flex"
credits_required = 0.5
courses = ["FNCE6130", "FNCE6230"]

[[core_requirements]]
core_code = "OIDD_FLEX"
core_name = "Operations, Information and Decisions"
core_type = "flex"
credits_required = 1.0
courses = ["OIDD6110", "OIDD6120", "OIDD6130", "OIDD6900"]
"#;

pub const FIXTURE_MAJOR_REQUIREMENTS_TOML: &str = r#"
[[majors]]
major_code = "FNCE"
major_name = "Finance"
total_credits_required = 3.0

[majors.requirements]
structure = "ELECTIVES"

[majors.requirements.elective_courses]
credits_required = 3.0
courses = ["FNCE7070", "FNCE7170", "FNCE7250", "FNCE8930", "FNCE8990"]
non_wharton_max_credits = 1.0
non_wharton_courses = ["ECON7100", "ECON7020"]

[[majors]]
major_code = "BEES"
major_name = "Business, Energy, Environment and Sustainability"
total_credits_required = 1.0

[majors.requirements]
structure = "ELECTIVES"

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["BEPP7630", "LGST8130"]

[[majors]]
major_code = "AIFB"
major_name = "Artificial Intelligence for Business"
total_credits_required = 1.0

[majors.requirements]
structure = "ELECTIVES"

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["OIDD6130", "OIDD6620"]

[[majors]]
major_code = "LEAD"
major_name = "Leading People"
total_credits_required = 1.0

[majors.requirements]
structure = "ELECTIVES"

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["MGMT7720", "OIDD6900"]

[[majors]]
major_code = "QFNC"
major_name = "Quantitative Finance"
total_credits_required = 3.0

[majors.requirements]
structure = "COMBINED"

[majors.requirements.required_courses]
credits_required = 2.0
courses = ["FNCE7170", "STAT7110"]
selection_type = "all"

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["FNCE7070", "STAT7050"]

[[majors]]
major_code = "BUAN"
major_name = "Business Analytics"
total_credits_required = 2.0

[majors.requirements]
structure = "COMBINED"

[majors.requirements.required_courses]
credits_required = 0.0
courses = ["STAT6130"]

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["STAT7050", "MKTG7120", "OIDD6620"]

[majors.requirements.elective_courses.additional_courses]
courses = ["ACCT7420", "FNCE7250", "STAT7050"]
max_credits = 0.5

[[majors]]
major_code = "MKTG"
major_name = "Marketing"
total_credits_required = 2.0

[majors.requirements]
structure = "COMBINED"

[majors.requirements.required_courses]
credits_required = 1.0
courses = ["MKTG7110", "MKTG7120", "FNCE7250"]
selection_type = "choose"

[majors.requirements.elective_courses]
credits_required = 1.0
courses = ["MKTG7700", "MKTG7270"]

[[majors]]
major_code = "ESGB"
major_name = "Environmental, Social and Governance Factors for Business"
total_credits_required = 1.5

[majors.requirements]
structure = "PILLARS"

[[majors.requirements.pillars]]
pillar_code = "ENV"
pillar_name = "Environmental"
credits_required = 0.5
credits_type = "combined_with_other_pillars"
courses = ["BEPP7630"]

[[majors.requirements.pillars]]
pillar_code = "GOV"
pillar_name = "Governance"
credits_required = 0.5
credits_type = "combined_with_other_pillars"
courses = ["LGST8130", "MGMT7720"]

[[majors]]
major_code = "MGMT"
major_name = "Management"
total_credits_required = 1.5

[majors.requirements]
structure = "PILLARS"

[[majors.requirements.pillars]]
pillar_code = "STRATEGY"
pillar_name = "Strategy"
credits_required = 1.0
credits_type = "minimum"
courses = ["MGMT7210", "MGMT7310"]

[[majors.requirements.pillars]]
pillar_code = "OUTSIDE"
pillar_name = "Outside Electives"
credits_required = 0.5
credits_type = "maximum"
courses = ["OIDD6900", "LGST8130"]

[[majors]]
major_code = "STRA"
major_name = "Strategic Management"
total_credits_required = 1.5

[majors.requirements]
structure = "COMBINED_PILLARS"

[majors.requirements.required_courses]
credits_required = 0.5
courses = ["MGMT7210"]
selection_type = "choose"

[[majors.requirements.pillars]]
pillar_code = "CORP"
pillar_name = "Corporate Strategy"
credits_required = 0.5
courses = ["MGMT7310"]

[[majors.requirements.pillars]]
pillar_code = "ORG"
pillar_name = "Organizations"
credits_required = 0.5
courses = ["MGMT7720"]
"#;

/// Number of core requirements in the fixture dataset.
pub const FIXTURE_CORE_COUNT: usize = 6;

/// Load the fixture reference tables.
///
/// Panics if the fixture TOML is malformed.
pub fn fixture_tables() -> ReferenceTables {
    ReferenceTables::from_toml_strs(
        FIXTURE_CATALOG_TOML,
        FIXTURE_CORE_REQUIREMENTS_TOML,
        FIXTURE_MAJOR_REQUIREMENTS_TOML,
    )
    .expect("fixture datasets should load")
}

/// Write the fixture datasets into `dir` under their canonical file names,
/// for tests that load reference data from disk.
pub fn write_fixture_dir(dir: &Path) {
    for (name, content) in [
        (CATALOG_FILE, FIXTURE_CATALOG_TOML),
        (CORE_REQUIREMENTS_FILE, FIXTURE_CORE_REQUIREMENTS_TOML),
        (MAJOR_REQUIREMENTS_FILE, FIXTURE_MAJOR_REQUIREMENTS_TOML),
    ] {
        std::fs::write(dir.join(name), content)
            .unwrap_or_else(|e| panic!("failed to write fixture {name}: {e}"));
    }
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

/// A Wharton course with no recorded term availability.
pub fn course(course_id: &str, credit_units: f64) -> Course {
    Course {
        course_id: course_id.to_owned(),
        title: String::new(),
        department: course_id.chars().take(4).collect(),
        credit_units,
        term_availability: None,
        is_wharton: true,
    }
}

/// A Wharton course offered only in `term`.
pub fn course_in(course_id: &str, credit_units: f64, term: TermAvailability) -> Course {
    Course {
        term_availability: Some(term),
        ..course(course_id, credit_units)
    }
}

/// A fixed core requirement satisfied by a single course.
pub fn fixed_core(core_code: &str, course_id: &str, credits_required: f64) -> CoreRequirement {
    CoreRequirement {
        core_code: core_code.to_owned(),
        core_name: core_code.to_owned(),
        core_type: CoreType::Fixed,
        credits_required,
        courses: vec![course_id.to_owned()],
        waivable: false,
        waiver_details: None,
        notes: String::new(),
    }
}

/// A flex core requirement satisfied by any of `courses`.
pub fn flex_core(core_code: &str, courses: &[&str], credits_required: f64) -> CoreRequirement {
    CoreRequirement {
        core_type: CoreType::Flex,
        courses: strings(courses),
        ..fixed_core(core_code, "", credits_required)
    }
}

/// An ELECTIVES major whose whole total comes from one pool.
pub fn electives_major(major_code: &str, total: f64, courses: &[&str]) -> MajorRequirement {
    major(
        major_code,
        total,
        RequirementStructure::Electives {
            elective_courses: elective_pool(total, courses),
        },
    )
}

/// A major with an arbitrary requirement structure.
pub fn major(major_code: &str, total: f64, requirements: RequirementStructure) -> MajorRequirement {
    MajorRequirement {
        major_code: major_code.to_owned(),
        major_name: major_code.to_owned(),
        total_credits_required: total,
        requirements,
        special_notes: String::new(),
    }
}

/// An elective pool with no extensions.
pub fn elective_pool(credits_required: f64, courses: &[&str]) -> ElectiveCourses {
    ElectiveCourses {
        credits_required,
        courses: strings(courses),
        non_wharton_max_credits: None,
        non_wharton_courses: None,
        additional_courses: None,
    }
}

pub fn required_set(
    credits_required: f64,
    courses: &[&str],
    selection_type: SelectionType,
) -> RequiredCourses {
    RequiredCourses {
        credits_required,
        courses: strings(courses),
        selection_type,
    }
}

pub fn pillar(
    pillar_code: &str,
    credits_required: f64,
    credits_type: CreditsType,
    courses: &[&str],
) -> Pillar {
    Pillar {
        pillar_code: pillar_code.to_owned(),
        pillar_name: pillar_code.to_owned(),
        credits_required,
        credits_type,
        courses: strings(courses),
    }
}

/// Convert string literals into owned course IDs.
pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| (*s).to_owned()).collect()
}
