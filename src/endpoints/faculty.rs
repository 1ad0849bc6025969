//! Views for faculty members. Every read and write is limited to the courses whose
//! `instructor_id` is the signed-in user.

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;

use crate::{
    database::{
        Database,
        analytics::{Bucket, CodeStatusTotals, CompletionRate},
        user,
    },
    endpoints::{json_response, notify, store_rejection},
    model::{
        assignment_item::{AssignmentId, AssignmentItem, NewAssignment, SubmissionId},
        code_problem::{CodeSubmission, CodeSubmissionId},
        course_info::{CourseId, CourseInfo},
        notification::{ActionResponse, Notification},
        request::ClientRequest,
        supplementary_material::{NewMaterial, SupplementaryMaterial},
        user_info::UserInfo,
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
struct Dashboard {
    courses: Vec<CourseInfo>,
    total_students: usize,
    assignments: usize,
    materials: usize,
    submissions: usize,
    /// Submissions still waiting for a grade
    ungraded: usize,
}

#[derive(Debug, Serialize)]
struct CourseRoster {
    #[serde(flatten)]
    course: CourseInfo,
    students: Vec<UserInfo>,
}

#[derive(Debug, Serialize)]
struct CodeReview {
    #[serde(flatten)]
    submission: CodeSubmission,
    student: Option<String>,
    problem: Option<String>,
}

#[derive(Debug, Serialize)]
struct Analytics {
    completion: Vec<CompletionRate>,
    grade_distribution: Vec<Bucket>,
    average_grade: u32,
    coding_activity: Vec<Bucket>,
    code_status: CodeStatusTotals,
}

fn course_ids(courses: &[CourseInfo]) -> Vec<CourseId> {
    courses.iter().map(|c| c.id).collect()
}

fn teaches(db: &Database, instructor: &UserInfo, course_id: CourseId) -> bool {
    db.course(course_id)
        .is_some_and(|c| c.instructor_id == instructor.id())
}

fn not_your_course(instructor: &UserInfo, course_id: CourseId) -> Response<Body> {
    tracing::warn!(
        "Faculty {} tried to change course {course_id} they do not teach",
        instructor.id()
    );
    notify(
        StatusCode::FORBIDDEN,
        Notification::error("You do not teach this course"),
    )
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let courses = db.courses_for_instructor(user.id());

    let assignments = courses
        .iter()
        .flat_map(|c| db.assignments_for_course(c.id))
        .collect::<Vec<_>>();
    let submissions = assignments.iter().flat_map(|a| &a.submissions);

    json_response(
        StatusCode::OK,
        &Dashboard {
            total_students: courses.iter().map(|c| c.enrolled_students.len()).sum(),
            materials: courses
                .iter()
                .map(|c| db.materials_for_course(c.id).len())
                .sum(),
            submissions: submissions.clone().count(),
            ungraded: submissions.filter(|s| s.grade.is_none()).count(),
            assignments: assignments.len(),
            courses,
        },
    )
}

pub async fn courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;

    let rosters = db
        .courses_for_instructor(user.id())
        .into_iter()
        .map(|course| CourseRoster {
            students: course
                .enrolled_students
                .iter()
                .filter_map(|id| user::user_by_id(*id))
                .collect(),
            course,
        })
        .collect::<Vec<_>>();

    json_response(StatusCode::OK, &rosters)
}

pub async fn materials(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;

    let mut materials = db
        .courses_for_instructor(user.id())
        .iter()
        .flat_map(|c| db.materials_for_course(c.id))
        .collect::<Vec<SupplementaryMaterial>>();
    materials.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));

    json_response(StatusCode::OK, &materials)
}

pub async fn add_material(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(new): Json<NewMaterial>,
) -> Response<Body> {
    let mut db = state.db.write().await;

    if let Some(course_id) = new.course_id {
        if db.course(course_id).is_some() && !teaches(&db, &user, course_id) {
            return not_your_course(&user, course_id);
        }
    }

    match db.add_material(new) {
        Ok(material) => json_response(
            StatusCode::CREATED,
            &ActionResponse::new(
                Notification::success("Material uploaded successfully"),
                material,
            ),
        ),
        Err(e) => store_rejection(e),
    }
}

pub async fn assignments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;

    let mut assignments = db
        .courses_for_instructor(user.id())
        .iter()
        .flat_map(|c| db.assignments_for_course(c.id))
        .collect::<Vec<AssignmentItem>>();
    assignments.sort_by_key(|a| a.due_date);

    json_response(StatusCode::OK, &assignments)
}

pub async fn add_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(new): Json<NewAssignment>,
) -> Response<Body> {
    let mut db = state.db.write().await;

    if let Some(course_id) = new.course_id {
        if db.course(course_id).is_some() && !teaches(&db, &user, course_id) {
            return not_your_course(&user, course_id);
        }
    }

    match db.add_assignment(new) {
        Ok(assignment) => json_response(
            StatusCode::CREATED,
            &ActionResponse::new(
                Notification::success("Assignment created successfully"),
                assignment,
            ),
        ),
        Err(e) => store_rejection(e),
    }
}

pub async fn grade_submission(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Path((assignment_id, submission_id)): Path<(AssignmentId, SubmissionId)>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some((grade, feedback)) = client_req.get_grade() else {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Please enter a grade"),
        );
    };

    let mut db = state.db.write().await;

    let course_id = db
        .assignments()
        .iter()
        .find(|a| a.id == assignment_id)
        .map(|a| a.course_id);
    if let Some(course_id) = course_id.filter(|id| !teaches(&db, &user, *id)) {
        return not_your_course(&user, course_id);
    }

    match db.grade_submission(assignment_id, submission_id, grade, feedback) {
        Ok(submission) => {
            tracing::info!(
                "Faculty {} graded submission {submission_id} with {grade}",
                user.id()
            );
            json_response(
                StatusCode::OK,
                &ActionResponse::new(Notification::success("Grade saved"), submission),
            )
        }
        Err(e) => store_rejection(e),
    }
}

/// Code submissions from students enrolled in the instructor's courses, newest first
pub async fn code_submissions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let students = db.students_in(&db.courses_for_instructor(user.id()));

    let mut reviews = db
        .code_submissions()
        .iter()
        .filter(|s| students.contains(&s.student_id))
        .map(|s| CodeReview {
            student: user::user_by_id(s.student_id).map(|u| u.name().to_owned()),
            problem: db.code_problem(s.problem_id).map(|p| p.title.clone()),
            submission: s.clone(),
        })
        .collect::<Vec<_>>();
    reviews.sort_by(|a, b| {
        b.submission
            .submission_date
            .cmp(&a.submission.submission_date)
    });

    json_response(StatusCode::OK, &reviews)
}

pub async fn review_code(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Path(submission_id): Path<CodeSubmissionId>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some(verdict) = client_req.verdict else {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Please choose correct or incorrect"),
        );
    };

    let mut db = state.db.write().await;

    let students = db.students_in(&db.courses_for_instructor(user.id()));
    let student_id = db
        .code_submissions()
        .iter()
        .find(|s| s.id == submission_id)
        .map(|s| s.student_id);
    if student_id.is_some_and(|id| !students.contains(&id)) {
        tracing::warn!(
            "Faculty {} tried to review code submission {submission_id} outside their courses",
            user.id()
        );
        return notify(
            StatusCode::FORBIDDEN,
            Notification::error("This submission is not from one of your students"),
        );
    }

    match db.review_code_submission(submission_id, verdict) {
        Ok(submission) => {
            tracing::info!(
                "Faculty {} marked code submission {submission_id} {:?}",
                user.id(),
                submission.status
            );
            json_response(
                StatusCode::OK,
                &ActionResponse::new(Notification::success("Review saved"), submission),
            )
        }
        Err(e) => store_rejection(e),
    }
}

pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let courses = db.courses_for_instructor(user.id());
    let ids = course_ids(&courses);
    let students = db.students_in(&courses);

    json_response(
        StatusCode::OK,
        &Analytics {
            completion: db.completion_rates(&courses),
            grade_distribution: db.grade_distribution(&ids),
            average_grade: db.average_grade(&ids),
            coding_activity: db.coding_activity(&students),
            code_status: db.code_status_totals(Some(&students)),
        },
    )
}
