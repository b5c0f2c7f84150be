use axum::{Json, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::config::{AppConfig, Env};

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin-auth";

/// Prefix every valid session token carries. Token validity is determined
/// *structurally* by this prefix, not cryptographically: any string starting
/// with it is accepted. Known weakness, documented in DESIGN.md and
/// deliberately left unhardened.
const TOKEN_PREFIX: &str = "admin_";

/// AuthError
///
/// Error taxonomy for the login step. Missing fields are checked before the
/// credential store is consulted; a credential mismatch never reveals which
/// field was wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    MissingFields,
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AuthError::MissingFields => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Username and password are required" })),
            )
                .into_response(),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password" })),
            )
                .into_response(),
        }
    }
}

/// verify_credentials
///
/// Exact string equality on both fields against the configured admin identity.
pub fn verify_credentials(config: &AppConfig, username: &str, password: &str) -> bool {
    username == config.admin_username && password == config.admin_password
}

/// login
///
/// The session gate's authentication step. Empty fields short-circuit with
/// `MissingFields`; a mismatch yields `InvalidCredentials`; success mints a
/// fresh session token for the caller to set as a cookie.
pub fn login(config: &AppConfig, username: &str, password: &str) -> Result<String, AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !verify_credentials(config, username, password) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(generate_session_token())
}

/// generate_session_token
///
/// Mints an opaque token of the form `admin_<unix millis>_<suffix>`, where the
/// suffix is nine lowercase hex characters drawn from a v4 UUID.
pub fn generate_session_token() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("{}{}_{}", TOKEN_PREFIX, Utc::now().timestamp_millis(), suffix)
}

/// validate_session_token
///
/// Structural prefix check only. There is no signature, expiry claim, or
/// server-side revocation list to consult.
pub fn validate_session_token(token: &str) -> bool {
    token.starts_with(TOKEN_PREFIX)
}

/// token_from_cookie_header
///
/// Extracts the session token from a raw `Cookie` header: split on `;`, trim
/// each entry, split on `=`, exact case-sensitive match on the cookie name.
pub fn token_from_cookie_header(cookie_header: Option<&str>) -> Option<String> {
    let header = cookie_header?;
    for entry in header.split(';') {
        let mut parts = entry.trim().splitn(2, '=');
        let name = parts.next()?;
        if name == SESSION_COOKIE {
            return parts.next().map(str::to_string);
        }
    }
    None
}

/// session_cookie
///
/// Builds the session cookie: HttpOnly, Secure in production only,
/// SameSite=Strict, Max-Age one day, path `/`.
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(config.env == Env::Production)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(1))
        .path("/")
        .build()
}

/// clear_session_cookie
///
/// Overwrites the session cookie with an empty value and Max-Age zero, causing
/// immediate client-side expiry. This is the only invalidation mechanism: no
/// server-side revocation store exists.
pub fn clear_session_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(config.env == Env::Production)
        .max_age(time::Duration::ZERO)
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_token_is_structurally_valid() {
        let token = generate_session_token();
        assert!(validate_session_token(&token));

        // admin_<millis>_<suffix>
        let rest = token.strip_prefix("admin_").unwrap();
        let (millis, suffix) = rest.split_once('_').unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), 9);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn any_prefixed_string_is_accepted() {
        assert!(validate_session_token("admin_1700000000000_abc123xyz"));
        assert!(validate_session_token("admin_forged"));
        assert!(!validate_session_token("user_1700000000000_abc123xyz"));
        assert!(!validate_session_token(""));
    }

    #[test]
    fn cookie_header_parsing_is_exact_and_case_sensitive() {
        assert_eq!(
            token_from_cookie_header(Some("admin-auth=admin_1_abc")),
            Some("admin_1_abc".to_string())
        );
        assert_eq!(
            token_from_cookie_header(Some("theme=dark; admin-auth=admin_1_abc; lang=en")),
            Some("admin_1_abc".to_string())
        );
        assert_eq!(token_from_cookie_header(Some("Admin-Auth=admin_1_abc")), None);
        assert_eq!(token_from_cookie_header(Some("theme=dark")), None);
        assert_eq!(token_from_cookie_header(None), None);
    }

    #[test]
    fn login_checks_missing_fields_before_credentials() {
        let config = AppConfig::default();
        assert_eq!(login(&config, "", ""), Err(AuthError::MissingFields));
        assert_eq!(login(&config, "admin", ""), Err(AuthError::MissingFields));
        assert_eq!(
            login(&config, "admin", "wrongpass"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(login(&config, "admin", "admin123").is_ok());
    }
}
