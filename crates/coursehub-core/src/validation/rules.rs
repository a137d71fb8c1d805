//! Fixed program rules: CU limits, course-ID patterns and the rule tables
//! the evaluators consult.

// ---------------------------------------------------------------------------
// CU limits
// ---------------------------------------------------------------------------

pub const GRADUATION_MIN_CU: f64 = 19.0;
pub const GRADUATION_MAX_CU: f64 = 21.0;
pub const QUARTER_OVERLOAD_CU: f64 = 2.75;
pub const SEMESTER_OVERLOAD_CU: f64 = 5.5;

/// Combined cap on independent-study and global-modular credits per major.
pub const ISP_GLOBAL_MODULAR_CAP_CU: f64 = 1.0;

// ---------------------------------------------------------------------------
// Course-ID patterns
// ---------------------------------------------------------------------------

const ISP_SUFFIXES: &[&str] = &["8990", "8980"];
const GLOBAL_MODULAR_SUFFIXES: &[&str] = &["8930", "8950", "8960", "8970"];

pub fn is_isp_course(course_id: &str) -> bool {
    ISP_SUFFIXES.iter().any(|s| course_id.ends_with(s))
}

pub fn is_global_modular_course(course_id: &str) -> bool {
    GLOBAL_MODULAR_SUFFIXES.iter().any(|s| course_id.ends_with(s))
}

/// Whether a course counts toward [`ISP_GLOBAL_MODULAR_CAP_CU`].
pub fn is_isp_or_global_modular(course_id: &str) -> bool {
    is_isp_course(course_id) || is_global_modular_course(course_id)
}

// ---------------------------------------------------------------------------
// Core rules
// ---------------------------------------------------------------------------

/// The statistics core, the only requirement with an exam placement.
pub const STAT_CORE: &str = "STAT_CORE";
/// The course a placed-out student takes for [`STAT_CORE`].
pub const STAT_PLACEMENT_COURSE: &str = "STAT6210";

/// The flex core whose matched courses must add up to its credit total.
pub const OIDD_FLEX: &str = "OIDD_FLEX";

/// Abbreviated versions of the same material; never both in one plan.
pub const PROHIBITED_CORE_PAIR: (&str, &str) = ("FNCE6210", "FNCE6230");

/// Majors that must take the full-length finance cores.
pub const FINANCE_MAJORS: &[&str] = &["FNCE", "QFNC"];

/// An abbreviated core course a finance major may not take instead of the
/// full-length one.
pub struct CoreOverride {
    pub abbreviated: &'static str,
    pub full: &'static str,
    pub requirement_code: &'static str,
}

pub const FINANCE_CORE_OVERRIDES: &[CoreOverride] = &[
    CoreOverride {
        abbreviated: "FNCE6210",
        full: "FNCE6110",
        requirement_code: "FNCE_CORP_FLEX",
    },
    CoreOverride {
        abbreviated: "FNCE6230",
        full: "FNCE6130",
        requirement_code: "FNCE_MACRO_FLEX",
    },
];

// ---------------------------------------------------------------------------
// Major rules
// ---------------------------------------------------------------------------

/// Course pairs that may not both count toward the given major.
pub const MAJOR_PROHIBITED_PAIRS: &[(&str, &[(&str, &str)])] = &[
    ("MKTG", &[("MKTG7700", "MKTG7270"), ("MKTG7380", "MKTG8500")]),
    ("MKOP", &[("MKTG7700", "MKTG7270"), ("MKTG7380", "MKTG8500")]),
    ("BUAN", &[("MKTG7520", "MKTG8520")]),
    ("ENTR", &[("MGMT6910", "MGMT6920")]),
];

/// The prohibited pairs for `major_code` (empty when it has none).
pub fn prohibited_pairs_for(major_code: &str) -> &'static [(&'static str, &'static str)] {
    MAJOR_PROHIBITED_PAIRS
        .iter()
        .find(|(code, _)| *code == major_code)
        .map(|(_, pairs)| *pairs)
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Cross rules
// ---------------------------------------------------------------------------

/// Majors that cannot be declared together.
pub const MAJOR_EXCLUSIONS: &[(&str, &str)] =
    &[("FNCE", "QFNC"), ("ESGB", "BEES"), ("ESGB", "SOGO")];

/// One major that excludes each of several others.
pub const ONE_TO_MANY_EXCLUSIONS: &[(&str, &[&str])] = &[("MKOP", &["MKTG", "OIDD"])];

/// A course that cannot count toward both a major and a competing
/// requirement.
pub struct DoubleCountRule {
    pub courses: &'static [&'static str],
    pub major: &'static str,
    pub context: &'static str,
}

pub const DOUBLE_COUNT_RULES: &[DoubleCountRule] = &[
    DoubleCountRule {
        courses: &["OIDD6130", "OIDD6620"],
        major: "AIFB",
        context: "OIDD flex core",
    },
    DoubleCountRule {
        courses: &["OIDD6140", "OIDD6620"],
        major: "ENTR",
        context: "OIDD flex core",
    },
    DoubleCountRule {
        courses: &["OIDD6900"],
        major: "LEAD",
        context: "OIDD flex core",
    },
    DoubleCountRule {
        courses: &["OIDD6900"],
        major: "MGMT",
        context: "OIDD flex core",
    },
];
