use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints reachable without a session token. The set mirrors the
/// gate's public-route table: the marketing page, the project listing and
/// creation API, the image upload endpoint, and the login API/page. The gate
/// classifies everything here as Public or Other and lets it through
/// unconditionally.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Marketing site shell. The hero/about/projects/blog/contact sections
        // render client-side.
        .route("/", get(handlers::marketing_page))
        // GET /health
        // Unauthenticated liveness endpoint for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/projects — full listing, newest first.
        // POST /api/projects — project creation with field validation.
        .route(
            "/api/projects",
            get(handlers::get_projects).post(handlers::create_project),
        )
        // GET /api/projects/{id} — public single-project detail.
        .route("/api/projects/{id}", get(handlers::get_public_project))
        // POST /api/upload
        // Multipart image upload; stored files are served from /uploads.
        .route("/api/upload", post(handlers::upload_image))
        // GET/POST/DELETE /api/admin/login
        // The login API lives under the admin prefix but is whitelisted by the
        // gate so a logged-out client can reach it.
        .route(
            "/api/admin/login",
            get(handlers::login_info)
                .post(handlers::login)
                .delete(handlers::logout),
        )
        // GET /admin/login
        // Login page shell; the gate's UI redirects land here with a
        // `redirect` query parameter carrying the originally requested path.
        .route("/admin/login", get(handlers::admin_login_page))
}
