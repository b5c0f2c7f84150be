use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

use crate::auth::{token_from_cookie_header, validate_session_token};

/// Session Gate
///
/// The single choke point deciding, per inbound request, whether to proceed,
/// redirect, or reject. Classification is prefix-based and evaluated
/// top-to-bottom against a small ordered table; no regex is involved.
/// Admission checks on already-issued tokens are pure, non-blocking string
/// operations, so the gate performs no I/O.

/// Root of the admin UI. Failures under this prefix redirect to the login page.
pub const ADMIN_UI_PREFIX: &str = "/admin";
/// Root of the admin API. Failures under this prefix are rejected with 401.
pub const ADMIN_API_PREFIX: &str = "/api/admin";
/// Login page the UI redirect targets.
pub const LOGIN_PATH: &str = "/admin/login";

/// Escape set for the `redirect` query value, form-urlencoded style: every
/// byte except ASCII alphanumerics and `-_.*` is percent-escaped, so `/`
/// becomes `%2F`.
const REDIRECT_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// Paths always reachable without a token, matched exactly or as a
/// `<entry>/` prefix.
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/admin/login",
    "/api/admin/login",
    "/api/projects",
    "/api/admin/logout",
];

/// RouteClass
///
/// Per-request classification. A path is Admin iff it starts with an admin
/// prefix AND is not matched by a public-route entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Not under either admin prefix; always allowed through.
    Other,
    /// Explicitly whitelisted; always allowed through.
    Public,
    /// Protected admin page (browser navigation).
    AdminUi,
    /// Protected admin API call.
    AdminApi,
}

/// Decision
///
/// Outcome of the admission check. All failures are terminal for the current
/// request; there is no retry and no partial admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    /// Browser navigation without a valid token: send to the login page with
    /// the original path in the `redirect` query parameter.
    RedirectTo(String),
    /// API call without a valid token: 401 with a JSON error body.
    Reject,
}

/// classify
///
/// Ordered evaluation: non-admin paths first, then the public whitelist, then
/// the API/UI split on the remaining protected paths.
pub fn classify(path: &str) -> RouteClass {
    let is_admin_route =
        path.starts_with(ADMIN_UI_PREFIX) || path.starts_with(ADMIN_API_PREFIX);
    if !is_admin_route {
        return RouteClass::Other;
    }

    let is_public = PUBLIC_ROUTES
        .iter()
        .any(|route| path == *route || path.starts_with(&format!("{route}/")));
    if is_public {
        return RouteClass::Public;
    }

    if path.starts_with(ADMIN_API_PREFIX) {
        RouteClass::AdminApi
    } else {
        RouteClass::AdminUi
    }
}

/// admit
///
/// The gate's core operation: given the request path and raw `Cookie` header,
/// decide whether the request proceeds, redirects, or is rejected.
pub fn admit(path: &str, cookie_header: Option<&str>) -> Decision {
    let class = classify(path);
    match class {
        RouteClass::Other | RouteClass::Public => Decision::Proceed,
        RouteClass::AdminUi | RouteClass::AdminApi => {
            let valid = token_from_cookie_header(cookie_header)
                .is_some_and(|token| validate_session_token(&token));
            if valid {
                return Decision::Proceed;
            }
            match class {
                RouteClass::AdminUi => {
                    let encoded = utf8_percent_encode(path, REDIRECT_QUERY);
                    Decision::RedirectTo(format!("{LOGIN_PATH}?redirect={encoded}"))
                }
                _ => Decision::Reject,
            }
        }
    }
}

/// session_gate
///
/// Middleware wrapper installing `admit` in front of every route. Applied as a
/// single layer over the whole router so the gate is the first collaborator
/// invoked per request.
pub async fn session_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let cookie_header = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());

    match admit(&path, cookie_header) {
        Decision::Proceed => next.run(request).await,
        Decision::RedirectTo(target) => Redirect::temporary(&target).into_response(),
        Decision::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized. Please login first." })),
        )
            .into_response(),
    }
}
