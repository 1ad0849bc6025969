//! The in-memory domain store. One `Database` owns every collection for the life of the process;
//! it is shared behind a lock in [`crate::state::AppState`] rather than through a global.
//!
//! Read accessors live in `operations`, writers in `assignment`, `material` and `code`.

use crate::model::{
    assignment_item::AssignmentItem, attendance_record::AttendanceRecord,
    code_problem::{CodeProblem, CodeSubmission}, course_info::CourseInfo,
    supplementary_material::SupplementaryMaterial,
};

pub mod analytics;
pub mod assignment;
pub mod auth;
pub mod code;
pub mod material;
pub mod operations;
pub mod seed;
pub mod user;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Please write some code before submitting")]
    EmptyCode,
    #[error("Please select a problem first")]
    NoProblemSelected,
    #[error("No course with id {0}")]
    UnknownCourse(u32),
    #[error("No assignment with id {0}")]
    UnknownAssignment(u32),
    #[error("No code problem with id {0}")]
    UnknownProblem(u32),
    #[error("No submission with id {0}")]
    UnknownSubmission(u32),
    #[error("Grade {grade} exceeds the {points} points available")]
    GradeOutOfRange { grade: u32, points: u32 },
    #[error("Code submission {0} has already been reviewed")]
    AlreadyReviewed(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Database {
    courses: Vec<CourseInfo>,
    assignments: Vec<AssignmentItem>,
    materials: Vec<SupplementaryMaterial>,
    attendance: Vec<AttendanceRecord>,
    code_problems: Vec<CodeProblem>,
    code_submissions: Vec<CodeSubmission>,
}

impl Database {
    /// A store with no records at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store loaded with the demo seed data
    pub fn seeded() -> Self {
        Self {
            courses: seed::courses(),
            assignments: seed::assignments(),
            materials: seed::materials(),
            attendance: seed::attendance(),
            code_problems: seed::code_problems(),
            code_submissions: seed::code_submissions(),
        }
    }

    pub fn courses(&self) -> &[CourseInfo] {
        &self.courses
    }

    pub fn assignments(&self) -> &[AssignmentItem] {
        &self.assignments
    }

    pub fn materials(&self) -> &[SupplementaryMaterial] {
        &self.materials
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn code_problems(&self) -> &[CodeProblem] {
        &self.code_problems
    }

    pub fn code_submissions(&self) -> &[CodeSubmission] {
        &self.code_submissions
    }
}

/// One past the largest id seen, or 1 for an empty collection
pub(crate) fn next_id(ids: impl IntoIterator<Item = u32>) -> u32 {
    ids.into_iter().max().unwrap_or(0) + 1
}

pub(crate) fn required<T>(value: Option<T>, field: &'static str) -> Result<T, StoreError> {
    value.ok_or(StoreError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(Vec::<u32>::new()), 1);
        assert_eq!(next_id([3, 9, 4]), 10);
    }

    #[test]
    fn seeded_store_matches_demo_data() {
        let db = Database::seeded();
        assert_eq!(db.courses().len(), 5);
        assert_eq!(db.assignments().len(), 3);
        assert_eq!(db.materials().len(), 3);
        assert_eq!(db.attendance().len(), 9);
        assert_eq!(db.code_problems().len(), 3);
        assert_eq!(db.code_submissions().len(), 3);
        assert!(Database::empty().courses().is_empty());
    }
}
