use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

pub const MIN_CREDITS: u8 = 0;
pub const MAX_CREDITS: u8 = 10;

/// Letter grade from the fixed scale, in selector order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Grade {
    #[default]
    O,
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    F,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::O,
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::F,
    ];

    pub fn points(self) -> u8 {
        match self {
            Grade::O => 10,
            Grade::APlus => 9,
            Grade::A => 8,
            Grade::BPlus => 7,
            Grade::B => 6,
            Grade::C => 5,
            Grade::F => 0,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::O => "O",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }

    pub fn from_points(points: u8) -> Option<Grade> {
        Grade::ALL.into_iter().find(|g| g.points() == points)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade `{0}`, expected one of O, A+, A, B+, B, C, F")]
pub struct UnknownGrade(pub String);

// Accepts either the letter (any case) or the grade point value.
impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(points) = trimmed.parse::<u8>() {
            return Grade::from_points(points).ok_or_else(|| UnknownGrade(trimmed.to_string()));
        }
        Grade::ALL
            .into_iter()
            .find(|g| g.letter().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownGrade(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseEntry {
    pub id: EntryId,
    pub name: String,
    pub credits: u8,
    pub grade: Grade,
}

impl CourseEntry {
    pub fn new(id: EntryId) -> Self {
        CourseEntry {
            id,
            name: String::new(),
            credits: MIN_CREDITS,
            grade: Grade::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Outstanding,
    Great,
    Good,
    Average,
    Low,
}

impl Tier {
    /// Buckets an average; each lower bound is inclusive.
    pub fn classify(value: f64) -> Tier {
        match value {
            v if v >= 9.0 => Tier::Outstanding,
            v if v >= 8.0 => Tier::Great,
            v if v >= 7.0 => Tier::Good,
            v if v >= 6.0 => Tier::Average,
            _ => Tier::Low,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Outstanding => "Outstanding! 🎉",
            Tier::Great => "Great job! Keep it up!",
            Tier::Good => "Good work!",
            Tier::Average => "Average — room for improvement.",
            Tier::Low => "Needs improvement.",
        }
    }

    pub fn style(self) -> &'static str {
        match self {
            Tier::Outstanding => "excellent",
            Tier::Great => "great",
            Tier::Good => "good",
            Tier::Average => "average",
            Tier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateResult {
    pub value: f64,
    pub tier: Tier,
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}
