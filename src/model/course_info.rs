use serde::{Deserialize, Serialize};

use crate::model::user_info::UserId;

pub type CourseId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: CourseId,
    pub title: String,
    pub code: String,
    /// Owning faculty member. Joins go through this id, never through the display name.
    pub instructor_id: UserId,
    pub instructor: String,
    pub description: String,
    pub thumbnail: String,
    #[serde(default)]
    pub enrolled_students: Vec<UserId>,
    pub active: bool,
    pub credits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllabus: Option<String>,
}

impl CourseInfo {
    pub fn is_enrolled(&self, student_id: UserId) -> bool {
        self.enrolled_students.contains(&student_id)
    }

    /// Department prefix of the course code, e.g. `CS` for `CS101`
    pub fn department(&self) -> &str {
        let end = self
            .code
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(self.code.len());
        &self.code[..end]
    }
}
