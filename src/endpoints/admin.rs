use std::{collections::BTreeSet, sync::Arc};

use axum::{
    Json,
    body::Body,
    extract::State,
    http::StatusCode,
    response::Response,
};
use serde::Serialize;

use crate::{
    action::ViewScope,
    database::{
        analytics::{Bucket, CodeStatusTotals, CompletionRate},
        user,
    },
    endpoints::{internal_error, json_response, notify},
    model::{
        course_info::CourseInfo,
        notification::Notification,
        request::ClientRequest,
        user_info::{Role, UserId, UserInfo},
    },
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSection {
    General,
    Security,
    Notifications,
    Backup,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 4] = [
        SettingsSection::General,
        SettingsSection::Security,
        SettingsSection::Notifications,
        SettingsSection::Backup,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SettingsSection::General => "general",
            SettingsSection::Security => "security",
            SettingsSection::Notifications => "notifications",
            SettingsSection::Backup => "backup",
        }
    }

    fn saved_message(&self) -> &'static str {
        match self {
            SettingsSection::General => "General settings saved successfully",
            SettingsSection::Security => "Security settings saved successfully",
            SettingsSection::Notifications => "Notification settings saved successfully",
            SettingsSection::Backup => "System backup initiated",
        }
    }
}

#[derive(Debug, Serialize)]
struct Dashboard {
    total_students: usize,
    total_faculty: usize,
    total_courses: usize,
    active_courses: usize,
    code_status: CodeStatusTotals,
    departments: Vec<CompletionRate>,
}

#[derive(Debug, Serialize)]
struct FacultyMember {
    #[serde(flatten)]
    user: UserInfo,
    courses: Vec<String>,
    students: usize,
}

#[derive(Debug, Serialize)]
struct StudentRow {
    #[serde(flatten)]
    user: UserInfo,
    enrolled_courses: u32,
    completed_assignments: u32,
    attendance_rate: u32,
    code_submissions: u32,
}

#[derive(Debug, Serialize)]
struct Analytics {
    departments: Vec<CompletionRate>,
    grade_distribution: Vec<Bucket>,
    average_grade: u32,
    coding_activity: Vec<Bucket>,
    code_status: CodeStatusTotals,
}

#[derive(Debug, Serialize)]
struct SettingsView {
    sections: [SettingsSection; 4],
}

fn student_ids() -> BTreeSet<UserId> {
    user::users_with_role(Role::Student)
        .iter()
        .map(|u| u.id())
        .collect()
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Response<Body> {
    let db = state.db.read().await;
    let courses = db.courses();

    json_response(
        StatusCode::OK,
        &Dashboard {
            total_students: db.students_in(courses).len(),
            total_faculty: courses
                .iter()
                .map(|c| c.instructor_id)
                .collect::<BTreeSet<_>>()
                .len(),
            total_courses: courses.len(),
            active_courses: courses.iter().filter(|c| c.active).count(),
            code_status: db.code_status_totals(None),
            departments: db.department_completion(),
        },
    )
}

pub async fn courses(State(state): State<Arc<AppState>>) -> Response<Body> {
    let db = state.db.read().await;
    json_response(StatusCode::OK, &db.courses())
}

pub async fn faculty(State(state): State<Arc<AppState>>) -> Response<Body> {
    let db = state.db.read().await;

    let members = user::users_with_role(Role::Faculty)
        .into_iter()
        .map(|user| {
            let courses = db.courses_for_instructor(user.id());
            FacultyMember {
                students: db.students_in(&courses).len(),
                courses: courses.into_iter().map(|c: CourseInfo| c.code).collect(),
                user,
            }
        })
        .collect::<Vec<_>>();

    json_response(StatusCode::OK, &members)
}

pub async fn students(State(state): State<Arc<AppState>>) -> Response<Body> {
    let db = state.db.read().await;

    let rows = user::users_with_role(Role::Student)
        .into_iter()
        .map(|user| {
            let stats = db.student_stats(user.id());
            StudentRow {
                user,
                enrolled_courses: stats.enrolled_courses,
                completed_assignments: stats.completed_assignments,
                attendance_rate: stats.attendance_rate,
                code_submissions: stats.code_submissions,
            }
        })
        .collect::<Vec<_>>();

    json_response(StatusCode::OK, &rows)
}

pub async fn analytics(State(state): State<Arc<AppState>>) -> Response<Body> {
    let db = state.db.read().await;
    let ids = db.courses().iter().map(|c| c.id).collect::<Vec<_>>();

    json_response(
        StatusCode::OK,
        &Analytics {
            departments: db.department_completion(),
            grade_distribution: db.grade_distribution(&ids),
            average_grade: db.average_grade(&ids),
            coding_activity: db.coding_activity(&student_ids()),
            code_status: db.code_status_totals(None),
        },
    )
}

pub async fn settings() -> Response<Body> {
    json_response(
        StatusCode::OK,
        &SettingsView {
            sections: SettingsSection::ALL,
        },
    )
}

/// Acknowledges a settings section after the simulated save. Nothing is stored.
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some(section) = client_req
        .section
        .as_deref()
        .and_then(SettingsSection::from_name)
    else {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Unknown settings section"),
        );
    };

    let mut scope = ViewScope::new("admin/settings");
    if let Err(e) = scope.after(state.config.save_delay(), async {}).await {
        return internal_error(e);
    }

    tracing::info!("Saved {} settings", section.name());
    notify(StatusCode::OK, Notification::success(section.saved_message()))
}
