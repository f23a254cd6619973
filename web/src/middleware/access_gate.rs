//! Routing gate run in front of every page route.
//!
//! Static assets and the `/api` namespace are never inspected. Every other
//! path is either public (reachable without a session) or protected. Signed
//! out visitors of protected pages are sent to sign-in with a `from`
//! parameter; signed in visitors of auth pages are sent home.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

use crate::session::{ResolvedSession, SessionStore};

pub const ROOT_PATH: &str = "/";
pub const SIGN_IN_PATH: &str = "/sign-in";
pub const HOME_PATH: &str = "/home";

pub const PUBLIC_ROUTE_PATHS: &[&str] = &[
    ROOT_PATH,
    SIGN_IN_PATH,
    "/sign-up",
    "/forgot-password",
    "/reset-password",
    "/confirm-email",
];

const STATIC_ASSET_PREFIXES: &[&str] = &["/_next", "/static"];
const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Bypass,
    Public,
    Protected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToSignIn { from: String },
    RedirectHome,
}

pub fn classify_path(path: &str) -> PathClass {
    let is_bypassed = STATIC_ASSET_PREFIXES
        .iter()
        .any(|prefix| matches_segment_prefix(path, prefix))
        || matches_segment_prefix(path, API_PREFIX)
        || has_file_extension(path);
    if is_bypassed {
        return PathClass::Bypass;
    }

    let is_public = PUBLIC_ROUTE_PATHS.iter().any(|route| {
        if *route == ROOT_PATH {
            path == ROOT_PATH
        } else {
            matches_segment_prefix(path, route)
        }
    });
    if is_public {
        PathClass::Public
    } else {
        PathClass::Protected
    }
}

pub fn decide(class: PathClass, path: &str, authenticated: bool) -> GateDecision {
    match (class, authenticated) {
        (PathClass::Protected, false) => GateDecision::RedirectToSignIn {
            from: path.to_string(),
        },
        (PathClass::Public, true) if path != ROOT_PATH => GateDecision::RedirectHome,
        _ => GateDecision::Allow,
    }
}

pub fn sign_in_location(from: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("from", from)
        .finish();
    format!("{}?{}", SIGN_IN_PATH, query)
}

pub async fn access_gate(
    State(store): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let class = classify_path(&path);
    if class == PathClass::Bypass {
        return next.run(request).await;
    }

    let session = store.get_session_from_request(&request);
    match decide(class, &path, session.is_some()) {
        GateDecision::Allow => {
            request.extensions_mut().insert(ResolvedSession(session));
            next.run(request).await
        }
        GateDecision::RedirectToSignIn { from } => {
            tracing::debug!(path = %from, "Redirecting signed-out visitor to sign-in");
            Redirect::temporary(&sign_in_location(&from)).into_response()
        }
        GateDecision::RedirectHome => {
            tracing::debug!(path = %path, "Redirecting signed-in visitor home");
            Redirect::temporary(HOME_PATH).into_response()
        }
    }
}

fn matches_segment_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn has_file_extension(path: &str) -> bool {
    !path.ends_with('/')
        && path
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains('.'))
}
