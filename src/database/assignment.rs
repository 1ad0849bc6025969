//! Assignment writers: new assignments, submissions and grading.

use chrono::Utc;

use crate::{
    database::{Database, StoreError, next_id, required},
    model::assignment_item::{
        AssignmentId, AssignmentItem, AssignmentSubmission, NewAssignment, NewSubmission,
        SubmissionId,
    },
};

impl Database {
    pub fn add_assignment(&mut self, new: NewAssignment) -> Result<AssignmentItem, StoreError> {
        let course_id = required(new.course_id, "course_id")?;
        let title = required(new.title.filter(|t| !t.trim().is_empty()), "title")?;
        let due_date = required(new.due_date, "due_date")?;
        let points = required(new.points, "points")?;

        if self.course(course_id).is_none() {
            return Err(StoreError::UnknownCourse(course_id));
        }

        let assignment = AssignmentItem {
            id: next_id(self.assignments.iter().map(|a| a.id)),
            course_id,
            title,
            description: new.description.unwrap_or_default(),
            due_date,
            points,
            submissions: vec![],
        };

        tracing::info!(
            "Added assignment {} to course {}",
            assignment.id,
            assignment.course_id
        );
        self.assignments.push(assignment.clone());
        Ok(assignment)
    }

    /// Appends a submission to its assignment. Submission ids are unique across all assignments.
    pub fn add_assignment_submission(
        &mut self,
        new: NewSubmission,
    ) -> Result<AssignmentSubmission, StoreError> {
        let assignment_id = required(new.assignment_id, "assignment_id")?;
        let student_id = required(new.student_id, "student_id")?;
        let content = required(new.content.filter(|c| !c.trim().is_empty()), "content")?;

        let id = next_id(
            self.assignments
                .iter()
                .flat_map(|a| a.submissions.iter().map(|s| s.id)),
        );

        let Some(assignment) = self.assignments.iter_mut().find(|a| a.id == assignment_id) else {
            return Err(StoreError::UnknownAssignment(assignment_id));
        };

        let submission = AssignmentSubmission {
            id,
            assignment_id,
            student_id,
            submission_date: Utc::now(),
            content,
            grade: None,
            feedback: None,
        };

        assignment.submissions.push(submission.clone());
        tracing::info!("Student {student_id} submitted assignment {assignment_id}");
        Ok(submission)
    }

    pub fn grade_submission(
        &mut self,
        assignment_id: AssignmentId,
        submission_id: SubmissionId,
        grade: u32,
        feedback: Option<String>,
    ) -> Result<AssignmentSubmission, StoreError> {
        let Some(assignment) = self.assignments.iter_mut().find(|a| a.id == assignment_id) else {
            return Err(StoreError::UnknownAssignment(assignment_id));
        };

        if grade > assignment.points {
            return Err(StoreError::GradeOutOfRange {
                grade,
                points: assignment.points,
            });
        }

        let Some(submission) = assignment
            .submissions
            .iter_mut()
            .find(|s| s.id == submission_id)
        else {
            return Err(StoreError::UnknownSubmission(submission_id));
        };

        submission.grade = Some(grade);
        submission.feedback = feedback;
        Ok(submission.clone())
    }
}
