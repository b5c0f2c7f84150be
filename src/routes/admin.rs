use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes under the protected admin prefixes. Access control is
/// NOT performed here: the session gate middleware classifies these paths as
/// AdminUi/AdminApi and rejects or redirects requests lacking a structurally
/// valid token before any handler below runs.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET/PUT/DELETE /api/admin/projects/{id}
        // Single-project admin API used by the edit form: fetch, full update,
        // and delete. Ids are validated as 24-hex ObjectIds in the handlers.
        .route(
            "/api/admin/projects/{id}",
            get(handlers::get_admin_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        // Admin UI shells. These exist so browser navigation has concrete
        // endpoints; unauthenticated visits are redirected to /admin/login by
        // the gate before reaching them.
        .route("/admin", get(handlers::admin_page))
        .route("/admin/projects", get(handlers::admin_page))
        .route("/admin/projects/create", get(handlers::admin_page))
        .route("/admin/projects/edit/{id}", get(handlers::admin_page))
}
