//! Read accessors. All of them are pure functions of the current collections and return
//! empty collections rather than failing.

use crate::{
    database::Database,
    model::{
        assignment_item::AssignmentItem,
        attendance_record::AttendanceRecord,
        code_problem::{CodeProblem, CodeSubmission, ProblemId},
        course_info::{CourseId, CourseInfo},
        supplementary_material::SupplementaryMaterial,
        user_info::UserId,
    },
};

impl Database {
    pub fn course(&self, course_id: CourseId) -> Option<&CourseInfo> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn code_problem(&self, problem_id: ProblemId) -> Option<&CodeProblem> {
        self.code_problems.iter().find(|p| p.id == problem_id)
    }

    /// Courses whose enrollment list contains the student
    pub fn courses_for_student(&self, student_id: UserId) -> Vec<CourseInfo> {
        self.courses
            .iter()
            .filter(|c| c.is_enrolled(student_id))
            .cloned()
            .collect()
    }

    /// Courses owned by the faculty member
    pub fn courses_for_instructor(&self, instructor_id: UserId) -> Vec<CourseInfo> {
        self.courses
            .iter()
            .filter(|c| c.instructor_id == instructor_id)
            .cloned()
            .collect()
    }

    pub fn assignments_for_course(&self, course_id: CourseId) -> Vec<AssignmentItem> {
        self.assignments
            .iter()
            .filter(|a| a.course_id == course_id)
            .cloned()
            .collect()
    }

    /// Assignments of every course the student is enrolled in
    pub fn assignments_for_student(&self, student_id: UserId) -> Vec<AssignmentItem> {
        self.assignments
            .iter()
            .filter(|a| self.course(a.course_id).is_some_and(|c| c.is_enrolled(student_id)))
            .cloned()
            .collect()
    }

    pub fn materials_for_course(&self, course_id: CourseId) -> Vec<SupplementaryMaterial> {
        self.materials
            .iter()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn attendance_for(&self, student_id: UserId, course_id: CourseId) -> Vec<AttendanceRecord> {
        self.attendance
            .iter()
            .filter(|r| r.student_id == student_id && r.course_id == course_id)
            .cloned()
            .collect()
    }

    pub fn attendance_for_student(&self, student_id: UserId) -> Vec<AttendanceRecord> {
        self.attendance
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect()
    }

    pub fn code_submissions_for(&self, student_id: UserId) -> Vec<CodeSubmission> {
        self.code_submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .cloned()
            .collect()
    }
}
