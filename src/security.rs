//! The route guard. Every protected view sits behind one of the middleware layers below, each
//! of which reads the session store, decides whether the view may render, and otherwise
//! redirects (or asks the client to wait while the session is still loading).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    model::user_info::{Role, UserInfo},
    state::AppState,
};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    Authenticated(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not known yet; render nothing and do not redirect
    Wait,
    Redirect(&'static str),
    Render,
}

pub fn guard(state: GuardState, required: Option<Role>) -> GuardDecision {
    match (state, required) {
        (GuardState::Loading, _) => GuardDecision::Wait,
        (GuardState::Unauthenticated, _) => GuardDecision::Redirect(LOGIN_PATH),
        (GuardState::Authenticated(role), Some(required)) if role != required => {
            GuardDecision::Redirect(role.home())
        }
        (GuardState::Authenticated(_), _) => GuardDecision::Render,
    }
}

/// Where a path nobody routes should send the visitor
pub fn not_found_target(state: GuardState) -> GuardDecision {
    match state {
        GuardState::Loading => GuardDecision::Wait,
        GuardState::Unauthenticated => GuardDecision::Redirect(LOGIN_PATH),
        GuardState::Authenticated(role) => GuardDecision::Redirect(role.home()),
    }
}

/// The bearer token from the Authorization header, with or without the `Bearer ` prefix
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(&AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// HTTP form of a decision that does not render
pub fn decision_response(decision: &GuardDecision) -> Response<Body> {
    match decision {
        GuardDecision::Wait => {
            let mut resp = (StatusCode::SERVICE_UNAVAILABLE, "Loading...").into_response();
            resp.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from_static("1"));
            resp
        }
        GuardDecision::Redirect(to) => Redirect::to(to).into_response(),
        GuardDecision::Render => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn authorize(
    state: Arc<AppState>,
    required: Option<Role>,
    mut request: Request,
    next: Next,
) -> Response<Body> {
    let user: Option<UserInfo> = {
        let sessions = state.sessions.read().await;
        let token = session_token(request.headers());
        let decision = guard(sessions.guard_state(token), required);

        if decision != GuardDecision::Render {
            tracing::debug!("Guard on {} decided {:?}", request.uri().path(), decision);
            return decision_response(&decision);
        }

        token.and_then(|t| sessions.resolve(t)).cloned()
    };

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Any signed-in user
pub async fn handle_basic_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response<Body> {
    authorize(state, None, request, next).await
}

pub async fn handle_student_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response<Body> {
    authorize(state, Some(Role::Student), request, next).await
}

pub async fn handle_faculty_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response<Body> {
    authorize(state, Some(Role::Faculty), request, next).await
}

pub async fn handle_admin_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response<Body> {
    authorize(state, Some(Role::Admin), request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_never_redirects() {
        for required in [None, Some(Role::Student), Some(Role::Admin)] {
            assert_eq!(guard(GuardState::Loading, required), GuardDecision::Wait);
        }
        assert_eq!(not_found_target(GuardState::Loading), GuardDecision::Wait);
    }

    #[test]
    fn unauthenticated_goes_to_login() {
        for required in [None, Some(Role::Student), Some(Role::Faculty), Some(Role::Admin)] {
            assert_eq!(
                guard(GuardState::Unauthenticated, required),
                GuardDecision::Redirect("/login")
            );
        }
    }

    #[test]
    fn wrong_role_goes_to_own_home() {
        assert_eq!(
            guard(GuardState::Authenticated(Role::Admin), Some(Role::Student)),
            GuardDecision::Redirect("/admin")
        );
        assert_eq!(
            guard(GuardState::Authenticated(Role::Student), Some(Role::Faculty)),
            GuardDecision::Redirect("/student")
        );
    }

    #[test]
    fn matching_or_unrestricted_renders() {
        assert_eq!(
            guard(GuardState::Authenticated(Role::Faculty), Some(Role::Faculty)),
            GuardDecision::Render
        );
        assert_eq!(
            guard(GuardState::Authenticated(Role::Student), None),
            GuardDecision::Render
        );
    }

    #[test]
    fn token_header_forms() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc="));
        assert_eq!(session_token(&headers), Some("abc="));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc="));
        assert_eq!(session_token(&headers), Some("abc="));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   abc=  "));
        assert_eq!(session_token(&headers), Some("abc="));
    }
}
