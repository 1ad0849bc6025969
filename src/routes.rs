//! The route table. Each role gets its own router behind its own guard layer; the routers are
//! merged so that no request passes through more than one role guard.

use std::sync::Arc;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE, LOCATION, RETRY_AFTER},
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    endpoints::{self, admin, faculty, student},
    model::user_info::Role,
    security,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
}

const fn nav(name: &'static str, path: &'static str) -> NavItem {
    NavItem { name, path }
}

/// Sidebar entries for a role, dashboard first
pub fn nav_items(role: Role) -> Vec<NavItem> {
    let mut items = vec![nav("Dashboard", role.home())];
    items.extend(match role {
        Role::Student => [
            nav("My Courses", "/student/courses"),
            nav("Assignments", "/student/assignments"),
            nav("Attendance", "/student/attendance"),
            nav("Code Practice", "/student/code"),
        ]
        .to_vec(),
        Role::Faculty => [
            nav("My Courses", "/faculty/courses"),
            nav("Course Materials", "/faculty/materials"),
            nav("Assignments", "/faculty/assignments"),
            nav("Student Analytics", "/faculty/analytics"),
        ]
        .to_vec(),
        Role::Admin => [
            nav("All Courses", "/admin/courses"),
            nav("Faculty Members", "/admin/faculty"),
            nav("Students", "/admin/students"),
            nav("Analytics", "/admin/analytics"),
            nav("Settings", "/admin/settings"),
        ]
        .to_vec(),
    });
    items
}

pub fn app(state: Arc<AppState>) -> Router {
    // Any origin may call in; redirects and retry hints must stay readable to the frontend
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(AllowOrigin::any())
        .expose_headers([CONTENT_TYPE, LOCATION, RETRY_AFTER]);

    let admin = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/courses", get(admin::courses))
        .route("/admin/faculty", get(admin::faculty))
        .route("/admin/students", get(admin::students))
        .route("/admin/analytics", get(admin::analytics))
        .route(
            "/admin/settings",
            get(admin::settings).post(admin::save_settings),
        )
        .route_layer(from_fn_with_state(state.clone(), security::handle_admin_auth));

    let faculty = Router::new()
        .route("/faculty", get(faculty::dashboard))
        .route("/faculty/courses", get(faculty::courses))
        .route(
            "/faculty/materials",
            get(faculty::materials).post(faculty::add_material),
        )
        .route(
            "/faculty/assignments",
            get(faculty::assignments).post(faculty::add_assignment),
        )
        .route(
            "/faculty/assignments/{assignment_id}/submissions/{submission_id}/grade",
            put(faculty::grade_submission),
        )
        .route("/faculty/code", get(faculty::code_submissions))
        .route("/faculty/code/{submission_id}/review", put(faculty::review_code))
        .route("/faculty/analytics", get(faculty::analytics))
        .route_layer(from_fn_with_state(state.clone(), security::handle_faculty_auth));

    let student = Router::new()
        .route("/student", get(student::dashboard))
        .route("/student/courses", get(student::courses))
        .route("/student/assignments", get(student::assignments))
        .route(
            "/student/assignments/{assignment_id}/submit",
            post(student::submit_assignment),
        )
        .route("/student/attendance", get(student::attendance))
        .route("/student/code", get(student::code).post(student::submit_code))
        .route("/student/code/run", post(student::run_code))
        .route(
            "/student/profile",
            get(student::profile).put(student::update_profile),
        )
        .route_layer(from_fn_with_state(state.clone(), security::handle_student_auth));

    // Any signed-in user
    let user = Router::new()
        .route("/layout", get(endpoints::layout))
        .route("/logout", post(endpoints::logout))
        .route_layer(from_fn_with_state(state.clone(), security::handle_basic_auth));

    Router::new()
        .route("/", get(endpoints::root))
        .route("/login", get(endpoints::login_page).post(endpoints::login))
        .merge(admin)
        .merge(faculty)
        .merge(student)
        .merge(user)
        .fallback(endpoints::not_found)
        .layer(cors)
        .with_state(state)
}
