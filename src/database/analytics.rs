//! Display-only aggregates the dashboards show. Nothing here writes back to the store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    database::Database,
    model::{
        attendance_record::{AttendanceRecord, AttendanceStatus},
        code_problem::CodeStatus,
        course_info::{CourseId, CourseInfo},
        user_info::UserId,
    },
};

/// A named count for a chart slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub value: u32,
}

impl Bucket {
    fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            value: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    /// Rounded percentage of sessions marked present
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAttendance {
    pub course_id: CourseId,
    pub code: String,
    pub title: String,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub name: String,
    pub completion: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStats {
    pub enrolled_courses: u32,
    pub completed_assignments: u32,
    pub total_assignments: u32,
    pub attendance_rate: u32,
    pub code_submissions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStatusTotals {
    pub correct: u32,
    pub incorrect: u32,
    pub pending: u32,
}

/// Rounded percentage, 0 when there is nothing to divide by
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn attendance_summary<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for record in records {
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
        }
    }

    let total = summary.present + summary.absent + summary.late;
    summary.rate = percent(summary.present as usize, total as usize);
    summary
}

/// Buckets a set of (grade, points) pairs by percentage
pub fn grade_distribution(grades: impl IntoIterator<Item = (u32, u32)>) -> Vec<Bucket> {
    let mut buckets = ["90-100%", "80-89%", "70-79%", "60-69%", "Below 60%"].map(Bucket::named);

    for (grade, points) in grades {
        let pct = if points == 0 {
            0.0
        } else {
            grade as f64 / points as f64 * 100.0
        };
        let slot = match pct {
            p if p >= 90.0 => 0,
            p if p >= 80.0 => 1,
            p if p >= 70.0 => 2,
            p if p >= 60.0 => 3,
            _ => 4,
        };
        buckets[slot].value += 1;
    }

    buckets.into()
}

/// Buckets students by how many code submissions they have made
pub fn coding_activity(submission_counts: impl IntoIterator<Item = usize>) -> Vec<Bucket> {
    let mut buckets =
        ["0 Problems", "1-3 Problems", "4-6 Problems", "7+ Problems"].map(Bucket::named);

    for count in submission_counts {
        let slot = match count {
            0 => 0,
            1..=3 => 1,
            4..=6 => 2,
            _ => 3,
        };
        buckets[slot].value += 1;
    }

    buckets.into()
}

impl Database {
    /// Every (grade, points) pair graded in the given courses
    fn graded(&self, course_ids: &[CourseId]) -> Vec<(u32, u32)> {
        self.assignments
            .iter()
            .filter(|a| course_ids.contains(&a.course_id))
            .flat_map(|a| {
                a.submissions
                    .iter()
                    .filter_map(move |s| s.grade.map(|g| (g, a.points)))
            })
            .collect()
    }

    pub fn grade_distribution(&self, course_ids: &[CourseId]) -> Vec<Bucket> {
        grade_distribution(self.graded(course_ids))
    }

    /// Mean graded percentage across the courses, rounded
    pub fn average_grade(&self, course_ids: &[CourseId]) -> u32 {
        let graded = self.graded(course_ids);
        if graded.is_empty() {
            return 0;
        }
        let sum = graded
            .iter()
            .map(|&(g, p)| if p == 0 { 0.0 } else { g as f64 / p as f64 * 100.0 })
            .sum::<f64>();
        (sum / graded.len() as f64).round() as u32
    }

    pub fn student_stats(&self, student_id: UserId) -> StudentStats {
        let courses = self.courses_for_student(student_id);

        StudentStats {
            enrolled_courses: courses.len() as u32,
            completed_assignments: self
                .assignments
                .iter()
                .filter(|a| a.submitted_by(student_id))
                .count() as u32,
            total_assignments: self.assignments_for_student(student_id).len() as u32,
            attendance_rate: attendance_summary(
                self.attendance.iter().filter(|r| r.student_id == student_id),
            )
            .rate,
            code_submissions: self
                .code_submissions
                .iter()
                .filter(|s| s.student_id == student_id)
                .count() as u32,
        }
    }

    pub fn course_attendance(&self, student_id: UserId) -> Vec<CourseAttendance> {
        self.courses_for_student(student_id)
            .into_iter()
            .map(|course| CourseAttendance {
                summary: attendance_summary(&self.attendance_for(student_id, course.id)),
                course_id: course.id,
                code: course.code,
                title: course.title,
            })
            .collect()
    }

    /// Submissions received over submissions possible, per course
    pub fn completion_rates(&self, courses: &[CourseInfo]) -> Vec<CompletionRate> {
        courses
            .iter()
            .map(|course| {
                let assignments = self.assignments_for_course(course.id);
                let submitted = assignments.iter().map(|a| a.submitter_count()).sum();
                let possible = assignments.len() * course.enrolled_students.len();
                CompletionRate {
                    name: course.code.clone(),
                    completion: percent(submitted, possible),
                }
            })
            .collect()
    }

    /// Completion rate per department, largest enrollment first
    pub fn department_completion(&self) -> Vec<CompletionRate> {
        let mut enrollment = BTreeMap::<&str, usize>::new();
        let mut submitted = BTreeMap::<&str, usize>::new();
        let mut possible = BTreeMap::<&str, usize>::new();

        for course in &self.courses {
            let dept = course.department();
            *enrollment.entry(dept).or_default() += course.enrolled_students.len();
            for assignment in self.assignments.iter().filter(|a| a.course_id == course.id) {
                *submitted.entry(dept).or_default() += assignment.submitter_count();
                *possible.entry(dept).or_default() += course.enrolled_students.len();
            }
        }

        let mut departments = enrollment.into_iter().collect::<Vec<_>>();
        departments.sort_by(|a, b| b.1.cmp(&a.1));

        departments
            .into_iter()
            .map(|(dept, _)| CompletionRate {
                name: dept.to_owned(),
                completion: percent(
                    submitted.get(dept).copied().unwrap_or_default(),
                    possible.get(dept).copied().unwrap_or_default(),
                ),
            })
            .collect()
    }

    /// Distinct students enrolled in any of the courses
    pub fn students_in(&self, courses: &[CourseInfo]) -> BTreeSet<UserId> {
        courses
            .iter()
            .flat_map(|c| c.enrolled_students.iter().copied())
            .collect()
    }

    pub fn coding_activity(&self, students: &BTreeSet<UserId>) -> Vec<Bucket> {
        coding_activity(students.iter().map(|id| {
            self.code_submissions
                .iter()
                .filter(|s| s.student_id == *id)
                .count()
        }))
    }

    /// Status counts, optionally limited to a set of students
    pub fn code_status_totals(&self, students: Option<&BTreeSet<UserId>>) -> CodeStatusTotals {
        let mut totals = CodeStatusTotals::default();
        for submission in self
            .code_submissions
            .iter()
            .filter(|s| students.is_none_or(|ids| ids.contains(&s.student_id)))
        {
            match submission.status {
                CodeStatus::Correct => totals.correct += 1,
                CodeStatus::Incorrect => totals.incorrect += 1,
                CodeStatus::Pending => totals.pending += 1,
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assignment_item::NewSubmission;

    #[test]
    fn attendance_rate_rounds_present_share() {
        let db = Database::seeded();
        let summary = attendance_summary(&db.attendance_for(1, 1));
        assert_eq!((summary.present, summary.absent, summary.late), (2, 1, 0));
        assert_eq!(summary.rate, 67);
        assert_eq!(attendance_summary(&[]).rate, 0);
    }

    #[test]
    fn student_stats_for_seed_student() {
        let db = Database::seeded();
        let stats = db.student_stats(1);
        assert_eq!(
            stats,
            StudentStats {
                enrolled_courses: 4,
                completed_assignments: 0,
                total_assignments: 3,
                attendance_rate: 67,
                code_submissions: 2,
            }
        );
        assert_eq!(db.student_stats(3), StudentStats::default());
    }

    #[test]
    fn grade_buckets_use_percentage_of_points() {
        let buckets = grade_distribution([(95, 100), (160, 200), (7, 10), (59, 100), (0, 0)]);
        let values = buckets.iter().map(|b| b.value).collect::<Vec<_>>();
        assert_eq!(values, [1, 1, 1, 0, 2]);
        assert_eq!(buckets[4].name, "Below 60%");
    }

    #[test]
    fn coding_activity_buckets() {
        let values = coding_activity([0, 1, 3, 4, 6, 7, 20])
            .into_iter()
            .map(|b| b.value)
            .collect::<Vec<_>>();
        assert_eq!(values, [1, 2, 2, 2]);
    }

    #[test]
    fn completion_counts_submissions_against_enrollment() {
        let mut db = Database::seeded();
        db.add_assignment_submission(NewSubmission {
            assignment_id: Some(1),
            student_id: Some(1),
            content: Some("done".into()),
        })
        .unwrap();

        let courses = db.courses_for_instructor(3);
        let rates = db.completion_rates(&courses);
        // CS101: 1 of 2 assignments x 2 students
        assert_eq!(rates[0], CompletionRate { name: "CS101".into(), completion: 25 });
        assert_eq!(rates[2].completion, 0);

        let departments = db.department_completion();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].name, "CS");
        // 1 submission over (2 + 2 + 1) possible
        assert_eq!(departments[0].completion, 20);
    }

    #[test]
    fn resubmissions_count_once_toward_completion() {
        let mut db = Database::seeded();
        for attempt in 0..6 {
            db.add_assignment_submission(NewSubmission {
                assignment_id: Some(1),
                student_id: Some(1),
                content: Some(format!("attempt {attempt}")),
            })
            .unwrap();
        }

        let rates = db.completion_rates(&db.courses_for_instructor(3));
        assert!(rates.iter().all(|r| r.completion <= 100));
        assert_eq!(rates[0].completion, 25);
        assert_eq!(db.department_completion()[0].completion, 20);
    }

    #[test]
    fn graded_average_and_distribution() {
        let mut db = Database::seeded();
        for (student, grade) in [(1, 95), (2, 70)] {
            let sub = db
                .add_assignment_submission(NewSubmission {
                    assignment_id: Some(1),
                    student_id: Some(student),
                    content: Some("answer".into()),
                })
                .unwrap();
            db.grade_submission(1, sub.id, grade, None).unwrap();
        }

        assert_eq!(db.average_grade(&[1]), 83);
        assert_eq!(db.average_grade(&[2]), 0);
        let values = db
            .grade_distribution(&[1, 2])
            .into_iter()
            .map(|b| b.value)
            .collect::<Vec<_>>();
        assert_eq!(values, [1, 0, 1, 0, 0]);
    }

    #[test]
    fn code_totals_can_be_scoped() {
        let db = Database::seeded();
        assert_eq!(db.code_status_totals(None).correct, 3);
        let only_two = BTreeSet::from([2]);
        assert_eq!(db.code_status_totals(Some(&only_two)).correct, 1);
        let activity = db.coding_activity(&db.students_in(db.courses()));
        assert_eq!(activity[1].value, 2);
    }
}
