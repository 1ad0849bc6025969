use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::user_info::UserId;

pub type ProblemId = u32;
pub type CodeSubmissionId = u32;

/// Ordered easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::Python, Language::Java, Language::C, Language::Cpp];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    Pending,
    Correct,
    Incorrect,
}

/// Outcome a reviewer assigns to a pending code submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl From<Verdict> for CodeStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Correct => CodeStatus::Correct,
            Verdict::Incorrect => CodeStatus::Incorrect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeProblem {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSubmission {
    pub id: CodeSubmissionId,
    pub student_id: UserId,
    pub problem_id: ProblemId,
    pub language: Language,
    pub code: String,
    pub status: CodeStatus,
    pub submission_date: DateTime<Utc>,
}

/// Caller-supplied fields for a code submission. `status` is accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCodeSubmission {
    pub student_id: Option<UserId>,
    pub problem_id: Option<ProblemId>,
    pub language: Option<Language>,
    pub code: Option<String>,
    pub status: Option<CodeStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_orders_easy_to_hard() {
        let mut levels = vec![Difficulty::Hard, Difficulty::Easy, Difficulty::Medium];
        levels.sort();
        assert_eq!(levels, [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]);
    }

    #[test]
    fn language_names_match_wire_form() {
        for language in Language::ALL {
            let wire = serde_json::to_string(&language).unwrap();
            assert_eq!(wire, format!("\"{language}\""));
        }
    }
}
