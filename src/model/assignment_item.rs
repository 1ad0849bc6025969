use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{course_info::CourseId, user_info::UserId};

pub type AssignmentId = u32;
pub type SubmissionId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentItem {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub points: u32,
    #[serde(default)]
    pub submissions: Vec<AssignmentSubmission>,
}

impl AssignmentItem {
    pub fn submitted_by(&self, student_id: UserId) -> bool {
        self.submissions.iter().any(|s| s.student_id == student_id)
    }

    /// Distinct students with at least one submission. Resubmissions count once.
    pub fn submitter_count(&self) -> usize {
        self.submissions
            .iter()
            .map(|s| s.student_id)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The student's most recent submission
    pub fn latest_submission_by(&self, student_id: UserId) -> Option<&AssignmentSubmission> {
        self.submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .max_by_key(|s| (s.submission_date, s.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSubmission {
    pub id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub submission_date: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Caller-supplied fields for a new assignment. Every field but `description` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAssignment {
    pub course_id: Option<CourseId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub points: Option<u32>,
}

/// Caller-supplied fields for a new assignment submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSubmission {
    pub assignment_id: Option<AssignmentId>,
    pub student_id: Option<UserId>,
    pub content: Option<String>,
}
