use crate::{
    AppState, auth,
    models::{
        CreateProjectRequest, LoginRequest, LoginResponse, LoginUser, Project, ProjectDocument,
        ProjectUpdate, UpdateOutcome, UpdateProjectRequest, UploadResponse,
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use bson::oid::ObjectId;
use serde_json::json;

// --- Helpers ---

/// error_json
///
/// Uniform JSON error body used across the API surface.
fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] POST /api/admin/login. Validates field presence before the
/// credential check, then mints a session token and sets it as the
/// `admin-auth` cookie (HttpOnly, SameSite=Strict, Max-Age one day, Secure in
/// production). The failure message never reveals which field was wrong.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), auth::AuthError> {
    let token = auth::login(&state.config, &payload.username, &payload.password)?;
    let jar = jar.add(auth::session_cookie(&state.config, token));

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: LoginUser {
                username: payload.username,
            },
        }),
    ))
}

/// logout
///
/// [Public Route] DELETE /api/admin/login. Always succeeds: overwrites the
/// session cookie with an empty value and Max-Age zero. There is no
/// server-side revocation store to contact.
#[utoipa::path(
    delete,
    path = "/api/admin/login",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(auth::clear_session_cookie(&state.config));
    (
        jar,
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

/// login_info
///
/// [Public Route] GET /api/admin/login. Static description payload.
#[utoipa::path(
    get,
    path = "/api/admin/login",
    responses((status = 200, description = "Endpoint description"))
)]
pub async fn login_info() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Admin login API",
        "endpoints": {
            "POST": "Login with username and password",
            "DELETE": "Logout"
        }
    }))
}

// --- Project Handlers ---

/// get_projects
///
/// [Public Route] Lists all projects, newest first. ObjectIds are serialized
/// as their 24-hex string form.
#[utoipa::path(
    get,
    path = "/api/projects",
    responses((status = 200, description = "All projects", body = [Project]))
)]
pub async fn get_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    let projects = state.repo.list_projects().await;
    Json(projects)
}

/// create_project
///
/// [Public Route] Submits a new project. `title`, `description`, and
/// `category` are required; the tech stack accepts either an array or a
/// comma-separated string; `featured`/`order` default to false/0 and the
/// timestamps are set server-side.
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Response {
    if payload.title.is_empty() || payload.description.is_empty() || payload.category.is_empty() {
        return error_json(
            StatusCode::BAD_REQUEST,
            "Title, description, and category are required",
        );
    }

    let now = bson::DateTime::now();
    let document = ProjectDocument {
        id: None,
        title: payload.title,
        category: payload.category,
        description: payload.description,
        image: payload.image,
        tech: payload.tech.map(|tech| tech.normalize()).unwrap_or_default(),
        github: payload.github,
        demo: payload.demo,
        details: payload.details,
        featured: payload.featured,
        order: payload.order,
        created_at: now,
        updated_at: now,
    };

    match state.repo.insert_project(document).await {
        Some(project) => Json(json!({
            "success": true,
            "message": "Project created successfully",
            "projectId": project.id,
            "project": project
        }))
        .into_response(),
        None => error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create project"),
    }
}

/// get_public_project
///
/// [Public Route] Single project by id for the marketing site's detail view.
/// The error bodies differ slightly from the admin variant: a malformed id is
/// `Invalid project ID` here.
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Found", body = Project),
        (status = 400, description = "Invalid id format"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_public_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return error_json(StatusCode::BAD_REQUEST, "Invalid project ID");
    };

    match state.repo.get_project(oid).await {
        Some(project) => Json(project).into_response(),
        None => error_json(StatusCode::NOT_FOUND, "Project not found"),
    }
}

/// get_admin_project
///
/// [Admin Route] Retrieves a single project by id for the edit form.
/// Malformed (non-24-hex) ids are a 400, unknown ids a 404.
#[utoipa::path(
    get,
    path = "/api/admin/projects/{id}",
    params(("id" = String, Path, description = "Project ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Found", body = Project),
        (status = 400, description = "Invalid id format"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_admin_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return error_json(StatusCode::BAD_REQUEST, "Invalid project ID format");
    };

    match state.repo.get_project(oid).await {
        Some(project) => Json(project).into_response(),
        None => error_json(StatusCode::NOT_FOUND, "Project not found"),
    }
}

/// update_project
///
/// [Admin Route] Full update of a project. Trimmed `title` and `description`
/// are required; `category` falls back to `frontend`; `updatedAt` is
/// refreshed. A matched-but-unmodified update is reported distinctly from a
/// real modification. Last write wins.
#[utoipa::path(
    put,
    path = "/api/admin/projects/{id}",
    params(("id" = String, Path, description = "Project ObjectId (24 hex chars)")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated or unchanged"),
        (status = 400, description = "Invalid id or validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Response {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return error_json(StatusCode::BAD_REQUEST, "Invalid project ID format");
    };

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation error", "message": "Project title is required" })),
        )
            .into_response();
    }
    let description = payload.description.trim().to_string();
    if description.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(
                json!({ "error": "Validation error", "message": "Project description is required" }),
            ),
        )
            .into_response();
    }

    let update = ProjectUpdate {
        title,
        category: payload.category.unwrap_or_else(|| "frontend".to_string()),
        description,
        details: payload.details.trim().to_string(),
        image: payload.image,
        tech: payload.tech,
        github: payload.github,
        demo: payload.demo,
        featured: payload.featured,
        order: payload.order,
        updated_at: bson::DateTime::now(),
    };

    match state.repo.update_project(oid, update).await {
        UpdateOutcome::NotFound => error_json(StatusCode::NOT_FOUND, "Project not found"),
        UpdateOutcome::Unchanged => Json(json!({
            "success": true,
            "message": "No changes detected",
            "projectId": id
        }))
        .into_response(),
        UpdateOutcome::Updated => Json(json!({
            "success": true,
            "message": "Project updated successfully",
            "projectId": id
        }))
        .into_response(),
    }
}

/// delete_project
///
/// [Admin Route] Removes a project. Returns the deleted id on success; an
/// unknown id is a 404 with `success: false`.
#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    params(("id" = String, Path, description = "Project ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Invalid id format"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(oid) = ObjectId::parse_str(&id) else {
        return error_json(StatusCode::BAD_REQUEST, "Invalid project ID format");
    };

    if state.repo.delete_project(oid).await {
        Json(json!({ "success": true, "message": "Project deleted", "deletedId": id }))
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Project not found" })),
        )
            .into_response()
    }
}

// --- Upload Handler ---

/// upload_image
///
/// [Public Route] Accepts a multipart form with an `image` part, validates the
/// declared content type, and hands the bytes to the storage service. The
/// returned URL is immediately servable from the static `/uploads` mount.
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing or non-image file")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    // Locate the `image` part; other parts are ignored.
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("image") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => return error_json(StatusCode::BAD_REQUEST, "No image file provided"),
            Err(_) => return error_json(StatusCode::BAD_REQUEST, "No image file provided"),
        }
    };

    let is_image = field
        .content_type()
        .is_some_and(|ct| ct.starts_with("image/"));
    if !is_image {
        return error_json(StatusCode::BAD_REQUEST, "File must be an image");
    }

    let suggested_name = field.file_name().unwrap_or("upload").to_string();
    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("upload read error: {:?}", e);
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload image");
        }
    };

    match state.storage.store(&bytes, &suggested_name).await {
        Ok(stored) => Json(UploadResponse {
            success: true,
            url: stored.url,
            filename: stored.filename,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Storage Error: {}", e);
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload image")
        }
    }
}

// --- Page Shells ---
// The marketing sections and admin forms are rendered client-side and are out
// of scope here; these shells exist so browser navigation (and the gate's
// redirect flow) has real endpoints to land on.

pub async fn marketing_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Portfolio</title></head>\
         <body><div id=\"root\"></div></body></html>",
    )
}

pub async fn admin_login_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Admin Login</title></head>\
         <body><div id=\"root\" data-page=\"admin-login\"></div></body></html>",
    )
}

pub async fn admin_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Admin</title></head>\
         <body><div id=\"root\" data-page=\"admin\"></div></body></html>",
    )
}
