use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credit hours assumed when the catalog does not list them.
pub const DEFAULT_CREDIT_HOURS: u32 = 3;

/// A catalog course. Owned by the catalog source; the matching engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(alias = "course_code")]
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub credit_hours: Option<u32>,
}

impl Course {
    pub fn credits(&self) -> u32 {
        self.credit_hours.unwrap_or(DEFAULT_CREDIT_HOURS)
    }

    /// Department prefix, e.g. "CS" for "CS 6301". Falls back to the code's leading letters.
    pub fn department_prefix(&self) -> String {
        if !self.department.trim().is_empty() {
            return self.department.trim().to_uppercase();
        }
        self.code
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase()
    }
}

/// Canonical form used to compare course codes ("cs 6301" == "CS6301").
pub fn normalize_course_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub skills: Vec<String>,
    pub prerequisites: Vec<String>,
    pub credit_hours: Option<i32>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            code: row.code,
            title: row.title,
            description: row.description.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            skills: row.skills,
            prerequisites: row.prerequisites,
            credit_hours: row
                .credit_hours
                .and_then(|h| u32::try_from(h).ok())
                .filter(|h| *h > 0),
        }
    }
}
