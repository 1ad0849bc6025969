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
    action::ViewScope,
    database::analytics::{self, AttendanceSummary, CourseAttendance, StudentStats},
    endpoints::{internal_error, json_response, notify, store_rejection},
    model::{
        assignment_item::{AssignmentId, AssignmentItem, AssignmentSubmission, NewSubmission},
        attendance_record::AttendanceRecord,
        code_problem::{CodeProblem, CodeSubmission, Language, NewCodeSubmission},
        course_info::CourseInfo,
        notification::{ActionResponse, Notification},
        supplementary_material::SupplementaryMaterial,
        user_info::{ProfileUpdate, UserInfo},
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
struct Dashboard {
    stats: StudentStats,
    courses: Vec<CourseInfo>,
    /// Not yet submitted, soonest due first
    upcoming: Vec<AssignmentItem>,
    recent_code: Vec<CodeSubmission>,
}

#[derive(Debug, Serialize)]
struct CourseView {
    #[serde(flatten)]
    course: CourseInfo,
    materials: Vec<SupplementaryMaterial>,
    assignments: Vec<AssignmentItem>,
}

/// An assignment as one student sees it: only their own submission is included
#[derive(Debug, Serialize)]
struct StudentAssignment {
    id: AssignmentId,
    course_code: String,
    title: String,
    description: String,
    due_date: chrono::DateTime<chrono::Utc>,
    points: u32,
    submission: Option<AssignmentSubmission>,
}

#[derive(Debug, Serialize)]
struct AttendanceView {
    overall: AttendanceSummary,
    courses: Vec<CourseAttendance>,
    records: Vec<AttendanceRecord>,
}

#[derive(Debug, Serialize)]
struct CodeView {
    problems: Vec<CodeProblem>,
    languages: [Language; 4],
    submissions: Vec<CodeSubmission>,
}

#[derive(Debug, Serialize)]
struct ProfileView {
    user: UserInfo,
    stats: StudentStats,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let student_id = user.id();

    let mut upcoming = db
        .assignments_for_student(student_id)
        .into_iter()
        .filter(|a| !a.submitted_by(student_id))
        .collect::<Vec<_>>();
    upcoming.sort_by_key(|a| a.due_date);

    let mut recent_code = db.code_submissions_for(student_id);
    recent_code.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));
    recent_code.truncate(5);

    json_response(
        StatusCode::OK,
        &Dashboard {
            stats: db.student_stats(student_id),
            courses: db.courses_for_student(student_id),
            upcoming,
            recent_code,
        },
    )
}

pub async fn courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;

    let courses = db
        .courses_for_student(user.id())
        .into_iter()
        .map(|course| CourseView {
            materials: db.materials_for_course(course.id),
            assignments: db.assignments_for_course(course.id),
            course,
        })
        .collect::<Vec<_>>();

    json_response(StatusCode::OK, &courses)
}

pub async fn assignments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let student_id = user.id();

    let mut assignments = db
        .assignments_for_student(student_id)
        .into_iter()
        .map(|a| StudentAssignment {
            course_code: db
                .course(a.course_id)
                .map(|c| c.code.clone())
                .unwrap_or_default(),
            submission: a.latest_submission_by(student_id).cloned(),
            id: a.id,
            title: a.title,
            description: a.description,
            due_date: a.due_date,
            points: a.points,
        })
        .collect::<Vec<_>>();
    assignments.sort_by_key(|a| a.due_date);

    json_response(StatusCode::OK, &assignments)
}

/// Submits the signed-in student's answer. The student id always comes from the session.
pub async fn submit_assignment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Path(assignment_id): Path<AssignmentId>,
    Json(new): Json<NewSubmission>,
) -> Response<Body> {
    let mut db = state.db.write().await;

    let enrolled = db
        .assignments()
        .iter()
        .find(|a| a.id == assignment_id)
        .and_then(|a| db.course(a.course_id))
        .is_none_or(|c| c.is_enrolled(user.id()));
    if !enrolled {
        tracing::warn!(
            "Student {} tried to submit assignment {assignment_id} outside their courses",
            user.id()
        );
        return notify(
            StatusCode::FORBIDDEN,
            Notification::error("You are not enrolled in this course"),
        );
    }

    let new = NewSubmission {
        assignment_id: Some(assignment_id),
        student_id: Some(user.id()),
        ..new
    };

    match db.add_assignment_submission(new) {
        Ok(submission) => json_response(
            StatusCode::CREATED,
            &ActionResponse::new(
                Notification::success("Assignment submitted successfully"),
                submission,
            ),
        ),
        Err(e) => store_rejection(e),
    }
}

pub async fn attendance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;
    let mut records = db.attendance_for_student(user.id());
    records.sort_by(|a, b| b.date.cmp(&a.date));

    json_response(
        StatusCode::OK,
        &AttendanceView {
            overall: analytics::attendance_summary(&records),
            courses: db.course_attendance(user.id()),
            records,
        },
    )
}

pub async fn code(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let db = state.db.read().await;

    let mut problems = db.code_problems().to_vec();
    problems.sort_by_key(|p| p.difficulty);

    let mut submissions = db.code_submissions_for(user.id());
    submissions.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));

    json_response(
        StatusCode::OK,
        &CodeView {
            problems,
            languages: Language::ALL,
            submissions,
        },
    )
}

/// Records the submission as pending, then reports the evaluation once the simulated
/// judge delay has passed
pub async fn submit_code(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
    Json(new): Json<NewCodeSubmission>,
) -> Response<Body> {
    let new = NewCodeSubmission {
        student_id: Some(user.id()),
        ..new
    };

    let submission = match state.db.write().await.add_code_submission(new) {
        Ok(s) => s,
        Err(e) => return store_rejection(e),
    };

    let mut scope = ViewScope::new("student/code");
    if let Err(e) = scope.after(state.config.submit_delay(), async {}).await {
        return internal_error(e);
    }

    json_response(
        StatusCode::CREATED,
        &ActionResponse::new(
            Notification::success("Your solution has been evaluated!"),
            submission,
        ),
    )
}

/// Runs the editor's code without recording a submission
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    Json(run): Json<NewCodeSubmission>,
) -> Response<Body> {
    if run.code.as_deref().is_none_or(|c| c.trim().is_empty()) {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Please write some code before running"),
        );
    }

    let mut scope = ViewScope::new("student/code/run");
    if let Err(e) = scope.after(state.config.submit_delay(), async {}).await {
        return internal_error(e);
    }

    notify(
        StatusCode::OK,
        Notification::success("Code executed successfully!"),
    )
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserInfo>,
) -> Response<Body> {
    let stats = state.db.read().await.student_stats(user.id());
    json_response(StatusCode::OK, &ProfileView { user, stats })
}

/// Saves the profile after the simulated round trip
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Response<Body> {
    if update.is_empty() {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Nothing to update"),
        );
    }

    let mut scope = ViewScope::new("student/profile");
    let task_state = state.clone();
    let saved = scope
        .after(state.config.save_delay(), async move {
            task_state.sessions.write().await.update_profile(update)
        })
        .await;

    match saved {
        Ok(Ok(Some(user))) => {
            tracing::info!("Updated profile of user {}", user.id());
            json_response(
                StatusCode::OK,
                &ActionResponse::new(Notification::success("Profile updated successfully"), user),
            )
        }
        // Signed out while the save was in flight
        Ok(Ok(None)) => notify(
            StatusCode::UNAUTHORIZED,
            Notification::error("You are no longer signed in"),
        ),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::endpoints::testing::app;

    #[tokio::test]
    async fn dashboard_shows_own_courses_and_stats() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app.get("/student", Some(&token)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["stats"]["enrolled_courses"], 4);
        assert_eq!(reply.body["stats"]["code_submissions"], 2);
        assert_eq!(reply.body["upcoming"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn assignment_submission_uses_session_student() {
        let app = app();
        let token = app.login("student2@example.com").await;

        let reply = app
            .send(
                Method::POST,
                "/student/assignments/1/submit",
                Some(&token),
                Some(json!({ "student_id": 1, "content": "print('hi')" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        assert_eq!(reply.body["data"]["student_id"], 2);
        assert_eq!(reply.body["data"]["id"], 1);

        let reply = app.get("/student/assignments", Some(&token)).await;
        let first = &reply.body[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["submission"]["content"], "print('hi')");
    }

    #[tokio::test]
    async fn resubmission_shows_latest_answer() {
        let app = app();
        let token = app.login("student1@example.com").await;

        for content in ["first draft", "final answer"] {
            let reply = app
                .send(
                    Method::POST,
                    "/student/assignments/1/submit",
                    Some(&token),
                    Some(json!({ "content": content })),
                )
                .await;
            assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        }

        let reply = app.get("/student/assignments", Some(&token)).await;
        let first = &reply.body[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["submission"]["id"], 2);
        assert_eq!(first["submission"]["content"], "final answer");
    }

    #[tokio::test]
    async fn assignment_outside_enrollment_is_forbidden() {
        let app = app();
        // Student 2 is not enrolled in CS201, which owns assignment 3
        let token = app.login("student2@example.com").await;

        let reply = app
            .send(
                Method::POST,
                "/student/assignments/3/submit",
                Some(&token),
                Some(json!({ "content": "answer" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);

        let reply = app
            .send(
                Method::POST,
                "/student/assignments/99/submit",
                Some(&token),
                Some(json!({ "content": "answer" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn code_submission_starts_pending() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app
            .send(
                Method::POST,
                "/student/code",
                Some(&token),
                Some(json!({
                    "problem_id": 3,
                    "language": "cpp",
                    "code": "int main() {}",
                    "status": "correct"
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        assert_eq!(reply.body["data"]["status"], "pending");
        assert_eq!(reply.body["data"]["id"], 4);
        assert_eq!(
            reply.body["notification"]["message"],
            "Your solution has been evaluated!"
        );
    }

    #[tokio::test]
    async fn code_submission_needs_code_and_problem() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app
            .send(
                Method::POST,
                "/student/code",
                Some(&token),
                Some(json!({ "language": "python", "code": "print(1)" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body["notification"]["message"],
            "Please select a problem first"
        );

        let reply = app
            .send(
                Method::POST,
                "/student/code",
                Some(&token),
                Some(json!({ "problem_id": 1, "language": "python", "code": "  " })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(app.state.db.read().await.code_submissions().len(), 3);
    }

    #[tokio::test]
    async fn running_code_records_nothing() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app
            .send(
                Method::POST,
                "/student/code/run",
                Some(&token),
                Some(json!({ "language": "python", "code": "\n  " })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body["notification"]["message"],
            "Please write some code before running"
        );

        let reply = app
            .send(
                Method::POST,
                "/student/code/run",
                Some(&token),
                Some(json!({ "language": "python", "code": "print(1)" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
        assert_eq!(
            reply.body["notification"]["message"],
            "Code executed successfully!"
        );
        assert_eq!(app.state.db.read().await.code_submissions().len(), 3);
    }

    #[tokio::test]
    async fn profile_update_merges_fields() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app
            .send(
                Method::PUT,
                "/student/profile",
                Some(&token),
                Some(json!({ "bio": "Sophomore", "role": "admin" })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["bio"], "Sophomore");
        assert_eq!(reply.body["data"]["role"], "student");
        assert_eq!(reply.body["data"]["name"], "John Doe");

        let reply = app.get("/student/profile", Some(&token)).await;
        assert_eq!(reply.body["user"]["bio"], "Sophomore");
    }

    #[tokio::test]
    async fn attendance_summarizes_per_course() {
        let app = app();
        let token = app.login("student1@example.com").await;

        let reply = app.get("/student/attendance", Some(&token)).await;
        assert_eq!(reply.status, StatusCode::OK);
        // 4 present out of 6 sessions
        assert_eq!(reply.body["overall"]["rate"], 67);
        assert_eq!(reply.body["courses"][0]["code"], "CS101");
        assert_eq!(reply.body["courses"][0]["rate"], 67);
        assert_eq!(reply.body["records"].as_array().unwrap().len(), 6);
    }
}
