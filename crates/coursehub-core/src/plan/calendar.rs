//! The plan calendar: eight quarters grouped in pairs into four semesters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use coursehub_data::models::TermAvailability;

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// The term a quarter falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Spring,
}

impl Term {
    /// The catalog availability that matches this term exactly.
    pub fn availability(self) -> TermAvailability {
        match self {
            Self::Fall => TermAvailability::Fall,
            Self::Spring => TermAvailability::Spring,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fall => "Fall",
            Self::Spring => "Spring",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// QuarterId
// ---------------------------------------------------------------------------

/// One of the eight fixed time-slots of the two-year program.
///
/// Ordering follows the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuarterId {
    #[serde(rename = "Y1F_Q1")]
    Y1FallQ1,
    #[serde(rename = "Y1F_Q2")]
    Y1FallQ2,
    #[serde(rename = "Y1S_Q3")]
    Y1SpringQ3,
    #[serde(rename = "Y1S_Q4")]
    Y1SpringQ4,
    #[serde(rename = "Y2F_Q5")]
    Y2FallQ5,
    #[serde(rename = "Y2F_Q6")]
    Y2FallQ6,
    #[serde(rename = "Y2S_Q7")]
    Y2SpringQ7,
    #[serde(rename = "Y2S_Q8")]
    Y2SpringQ8,
}

impl QuarterId {
    /// All quarters in calendar order.
    pub const ALL: [QuarterId; 8] = [
        Self::Y1FallQ1,
        Self::Y1FallQ2,
        Self::Y1SpringQ3,
        Self::Y1SpringQ4,
        Self::Y2FallQ5,
        Self::Y2FallQ6,
        Self::Y2SpringQ7,
        Self::Y2SpringQ8,
    ];

    /// Position in [`QuarterId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Y1FallQ1 => "Y1F_Q1",
            Self::Y1FallQ2 => "Y1F_Q2",
            Self::Y1SpringQ3 => "Y1S_Q3",
            Self::Y1SpringQ4 => "Y1S_Q4",
            Self::Y2FallQ5 => "Y2F_Q5",
            Self::Y2FallQ6 => "Y2F_Q6",
            Self::Y2SpringQ7 => "Y2S_Q7",
            Self::Y2SpringQ8 => "Y2S_Q8",
        }
    }

    /// The semester this quarter belongs to.
    pub fn semester(self) -> SemesterId {
        SemesterId::ALL[self.index() / 2]
    }

    pub fn term(self) -> Term {
        self.semester().term()
    }

    /// Whether this is the second half of its semester.
    pub fn is_second_half(self) -> bool {
        self.index() % 2 == 1
    }

    /// Human-readable label, e.g. `Year 1 Fall (Q1)`.
    pub fn label(self) -> String {
        format!("{} (Q{})", self.semester().label(), self.index() + 1)
    }
}

impl fmt::Display for QuarterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuarterId {
    type Err = QuarterIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| QuarterIdParseError(s.to_owned()))
    }
}

/// Error returned when parsing an invalid [`QuarterId`] string.
#[derive(Debug, Clone)]
pub struct QuarterIdParseError(pub String);

impl fmt::Display for QuarterIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quarter: {:?}", self.0)
    }
}

impl std::error::Error for QuarterIdParseError {}

// ---------------------------------------------------------------------------
// SemesterId
// ---------------------------------------------------------------------------

/// A pair of consecutive quarters in the same term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SemesterId {
    #[serde(rename = "Y1F")]
    Y1Fall,
    #[serde(rename = "Y1S")]
    Y1Spring,
    #[serde(rename = "Y2F")]
    Y2Fall,
    #[serde(rename = "Y2S")]
    Y2Spring,
}

impl SemesterId {
    pub const ALL: [SemesterId; 4] = [Self::Y1Fall, Self::Y1Spring, Self::Y2Fall, Self::Y2Spring];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Y1Fall => "Y1F",
            Self::Y1Spring => "Y1S",
            Self::Y2Fall => "Y2F",
            Self::Y2Spring => "Y2S",
        }
    }

    /// The two quarters of this semester, first half first.
    pub fn quarters(self) -> [QuarterId; 2] {
        let first = self as usize * 2;
        [QuarterId::ALL[first], QuarterId::ALL[first + 1]]
    }

    pub fn term(self) -> Term {
        match self {
            Self::Y1Fall | Self::Y2Fall => Term::Fall,
            Self::Y1Spring | Self::Y2Spring => Term::Spring,
        }
    }

    /// Human-readable label, e.g. `Year 1 Fall`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Y1Fall => "Year 1 Fall",
            Self::Y1Spring => "Year 1 Spring",
            Self::Y2Fall => "Year 2 Fall",
            Self::Y2Spring => "Year 2 Spring",
        }
    }
}

impl fmt::Display for SemesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Semester-long courses
// ---------------------------------------------------------------------------

/// Courses of 1.0 CU or more run for a whole semester.
pub fn is_semester_long(credit_units: f64) -> bool {
    credit_units >= 1.0
}

/// Semester-long courses are tracked in the first quarter of their semester;
/// a drop onto the second quarter lands on the first.
pub fn normalize_quarter_for_course(quarter: QuarterId, credit_units: f64) -> QuarterId {
    if is_semester_long(credit_units) && quarter.is_second_half() {
        quarter.semester().quarters()[0]
    } else {
        quarter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_roundtrip_and_grouping() {
        for q in QuarterId::ALL {
            assert_eq!(q.to_string().parse::<QuarterId>().unwrap(), q);
            assert!(q.semester().quarters().contains(&q));
        }
        assert!("Y3F_Q9".parse::<QuarterId>().is_err());
    }

    #[test]
    fn terms_alternate_by_semester() {
        assert_eq!(QuarterId::Y1FallQ2.term(), Term::Fall);
        assert_eq!(QuarterId::Y1SpringQ3.term(), Term::Spring);
        assert_eq!(QuarterId::Y2FallQ5.term(), Term::Fall);
        assert_eq!(QuarterId::Y2SpringQ8.term(), Term::Spring);
    }

    #[test]
    fn labels() {
        assert_eq!(QuarterId::Y1SpringQ3.label(), "Year 1 Spring (Q3)");
        assert_eq!(SemesterId::Y2Fall.label(), "Year 2 Fall");
    }

    #[test]
    fn semester_long_course_moves_to_first_quarter() {
        assert_eq!(
            normalize_quarter_for_course(QuarterId::Y1SpringQ4, 1.0),
            QuarterId::Y1SpringQ3
        );
        assert_eq!(
            normalize_quarter_for_course(QuarterId::Y1SpringQ4, 0.5),
            QuarterId::Y1SpringQ4
        );
        assert_eq!(
            normalize_quarter_for_course(QuarterId::Y2FallQ5, 1.0),
            QuarterId::Y2FallQ5
        );
    }

    #[test]
    fn serde_uses_plan_ids() {
        let json = serde_json::to_string(&QuarterId::Y2SpringQ7).unwrap();
        assert_eq!(json, "\"Y2S_Q7\"");
        let sem = serde_json::to_string(&SemesterId::Y1Spring).unwrap();
        assert_eq!(sem, "\"Y1S\"");
    }
}
