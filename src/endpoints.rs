//! Contains all endpoint-associated functions, grouped by the role allowed to reach them.
//!
//! The public views (login, root, not-found) and those open to any signed-in user live here;
//! the role views are in the `student`, `faculty` and `admin` submodules.

use std::{fmt::Display, sync::Arc};

use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::{
    action::ViewScope,
    database::{
        StoreError,
        auth::{LoginError, Session},
        user,
    },
    model::{
        notification::{ActionResponse, Notification},
        request::ClientRequest,
        user_info::{Role, UserInfo},
    },
    routes::{NavItem, nav_items},
    security::{self, GuardDecision, GuardState, LOGIN_PATH},
    state::AppState,
};

pub mod admin;
pub mod faculty;
pub mod student;

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    (status, Json(body)).into_response()
}

/// A write action's outcome with nothing but the notification
pub fn notify(status: StatusCode, notification: Notification) -> Response<Body> {
    json_response(status, &ActionResponse::<()>::notice(notification))
}

/// A rejected write, shown to the user as an error notification
pub fn store_rejection(e: StoreError) -> Response<Body> {
    tracing::warn!("Rejected write: {e}");
    let status = match e {
        StoreError::UnknownCourse(_)
        | StoreError::UnknownAssignment(_)
        | StoreError::UnknownProblem(_)
        | StoreError::UnknownSubmission(_) => StatusCode::NOT_FOUND,
        StoreError::AlreadyReviewed(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    notify(status, Notification::error(e.to_string()))
}

pub fn internal_error(e: impl Display) -> Response<Body> {
    tracing::error!("{e}");
    notify(
        StatusCode::INTERNAL_SERVER_ERROR,
        Notification::error("Something went wrong. Please try again."),
    )
}

/// Where the client should go next
#[derive(Debug, Serialize)]
pub struct Navigate {
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
struct DemoAccount {
    role: Role,
    email: String,
}

#[derive(Debug, Serialize)]
struct LoginPage {
    remembered_email: Option<String>,
    demo_accounts: Vec<DemoAccount>,
}

#[derive(Debug, Serialize)]
struct LoggedIn {
    #[serde(flatten)]
    session: Session,
    user: UserInfo,
    redirect: &'static str,
}

#[derive(Debug, Serialize)]
struct Layout {
    user: UserInfo,
    nav: Vec<NavItem>,
}

pub async fn root() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

/// The login form. A visitor who is already signed in is sent to their dashboard.
pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response<Body> {
    let sessions = state.sessions.read().await;

    match sessions.guard_state(security::session_token(&headers)) {
        GuardState::Loading => security::decision_response(&GuardDecision::Wait),
        GuardState::Authenticated(role) => Redirect::to(role.home()).into_response(),
        GuardState::Unauthenticated => {
            let demo_accounts = [Role::Student, Role::Faculty, Role::Admin]
                .into_iter()
                .filter_map(|role| {
                    let account = user::users_with_role(role).into_iter().next()?;
                    Some(DemoAccount {
                        role,
                        email: account.email().to_owned(),
                    })
                })
                .collect();

            json_response(
                StatusCode::OK,
                &LoginPage {
                    remembered_email: sessions.remembered_email(),
                    demo_accounts,
                },
            )
        }
    }
}

/// Signs in after the simulated round trip. The returned token goes in the Authorization
/// header of every later request.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(client_req): Json<ClientRequest>,
) -> Response<Body> {
    let Some((email, password)) = client_req.get_login() else {
        return notify(
            StatusCode::BAD_REQUEST,
            Notification::error("Please enter your email and password"),
        );
    };
    let remember = client_req.remember.unwrap_or(false);

    let mut scope = ViewScope::new("login");
    let task_state = state.clone();
    let outcome = scope
        .after(state.config.login_delay(), async move {
            let mut sessions = task_state.sessions.write().await;
            let session = sessions.login(&email, &password)?;
            sessions.remember_email(remember.then_some(email.as_str()))?;
            let user = sessions
                .current_user()
                .cloned()
                .ok_or(LoginError::InvalidCredentials)?;
            Ok::<_, LoginError>((session, user))
        })
        .await;

    match outcome {
        Ok(Ok((session, user))) => json_response(
            StatusCode::OK,
            &ActionResponse::new(
                Notification::success("Logged in successfully!"),
                LoggedIn {
                    session,
                    redirect: user.role().home(),
                    user,
                },
            ),
        ),
        Ok(Err(LoginError::InvalidCredentials)) => notify(
            StatusCode::UNAUTHORIZED,
            Notification::error(LoginError::InvalidCredentials.to_string()),
        ),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Response<Body> {
    match state.sessions.write().await.logout() {
        Ok(()) => json_response(
            StatusCode::OK,
            &ActionResponse::new(
                Notification::info("Logged out successfully"),
                Navigate {
                    redirect: LOGIN_PATH,
                },
            ),
        ),
        Err(e) => internal_error(e),
    }
}

/// The layout shell: who is signed in and the sidebar for their role
pub async fn layout(Extension(user): Extension<UserInfo>) -> Response<Body> {
    json_response(
        StatusCode::OK,
        &Layout {
            nav: nav_items(user.role()),
            user,
        },
    )
}

/// Catch-all for unrouted paths
pub async fn not_found(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response<Body> {
    let decision = {
        let sessions = state.sessions.read().await;
        security::not_found_target(sessions.guard_state(security::session_token(&headers)))
    };
    tracing::debug!("No route matched, decided {:?}", decision);
    security::decision_response(&decision)
}
