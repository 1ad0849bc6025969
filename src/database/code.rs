//! Code-practice writers. New submissions always start out pending; a reviewer moves each
//! one to correct or incorrect exactly once.

use chrono::Utc;

use crate::{
    database::{Database, StoreError, next_id, required},
    model::code_problem::{
        CodeStatus, CodeSubmission, CodeSubmissionId, NewCodeSubmission, Verdict,
    },
};

impl Database {
    pub fn add_code_submission(
        &mut self,
        new: NewCodeSubmission,
    ) -> Result<CodeSubmission, StoreError> {
        let code = new.code.unwrap_or_default();
        if code.trim().is_empty() {
            return Err(StoreError::EmptyCode);
        }
        let Some(problem_id) = new.problem_id else {
            return Err(StoreError::NoProblemSelected);
        };
        let student_id = required(new.student_id, "student_id")?;
        let language = required(new.language, "language")?;

        if self.code_problem(problem_id).is_none() {
            return Err(StoreError::UnknownProblem(problem_id));
        }

        let submission = CodeSubmission {
            id: next_id(self.code_submissions.iter().map(|s| s.id)),
            student_id,
            problem_id,
            language,
            code,
            status: CodeStatus::Pending,
            submission_date: Utc::now(),
        };

        tracing::info!(
            "Student {student_id} submitted {language} code for problem {problem_id}"
        );
        self.code_submissions.push(submission.clone());
        Ok(submission)
    }

    pub fn review_code_submission(
        &mut self,
        submission_id: CodeSubmissionId,
        verdict: Verdict,
    ) -> Result<CodeSubmission, StoreError> {
        let Some(submission) = self
            .code_submissions
            .iter_mut()
            .find(|s| s.id == submission_id)
        else {
            return Err(StoreError::UnknownSubmission(submission_id));
        };

        if submission.status != CodeStatus::Pending {
            return Err(StoreError::AlreadyReviewed(submission_id));
        }

        submission.status = verdict.into();
        Ok(submission.clone())
    }
}
