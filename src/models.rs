use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas ---

/// ProjectDocument
///
/// Raw database row (internal use). Directly maps to the `projects` collection
/// in MongoDB: the `_id` is a BSON ObjectId and timestamps are stored as BSON
/// datetimes. This structure is used internally by the Repository before being
/// transformed into the API-facing `Project`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
}

/// Project
///
/// API-facing project record. The ObjectId is serialized as its 24-hex-character
/// string form and timestamps as RFC 3339, matching what the frontend consumes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// One of `frontend`, `ui-ux`, `backend`, `fullstack`.
    pub category: String,
    pub description: String,
    /// Public URL of the cover image (typically `/uploads/<name>`).
    pub image: String,
    pub tech: Vec<String>,
    pub github: String,
    pub demo: String,
    pub details: String,
    pub featured: bool,
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDocument> for Project {
    fn from(doc: ProjectDocument) -> Self {
        Project {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: doc.title,
            category: doc.category,
            description: doc.description,
            image: doc.image,
            tech: doc.tech,
            github: doc.github,
            demo: doc.demo,
            details: doc.details,
            featured: doc.featured,
            order: doc.order,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// TechInput
///
/// The create endpoint accepts the tech stack either as a JSON array or as a
/// single comma-separated string; both normalize to a trimmed list.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[serde(untagged)]
#[ts(export)]
pub enum TechInput {
    List(Vec<String>),
    Csv(String),
}

impl TechInput {
    pub fn normalize(self) -> Vec<String> {
        match self {
            TechInput::List(list) => list,
            TechInput::Csv(csv) => csv
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// CreateProjectRequest
///
/// Input payload for submitting a new project (POST /api/projects).
/// `title`, `description`, and `category` are required; everything else falls
/// back to an empty value, `featured=false`, `order=0`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tech: Option<TechInput>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
}

/// UpdateProjectRequest
///
/// Full update payload for PUT /api/admin/projects/{id}. Unlike creation, the
/// tech stack must already be an array here; missing optional fields reset to
/// their defaults (`category` to `frontend`), matching last-write-wins
/// document replacement semantics.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub demo: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
}

/// ProjectUpdate
///
/// The `$set` document applied by the repository for an update. Built from an
/// `UpdateProjectRequest` after handler-side validation; serialization names
/// match the collection's field names.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectUpdate {
    pub title: String,
    pub category: String,
    pub description: String,
    pub details: String,
    pub image: String,
    pub tech: Vec<String>,
    pub github: String,
    pub demo: String,
    pub featured: bool,
    pub order: i32,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
}

/// UpdateOutcome
///
/// Distinguishes the three observable results of a single-document update:
/// the id matched nothing, the id matched but nothing changed, or the
/// document was modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    NotFound,
    Unchanged,
    Updated,
}

// --- Auth Payloads ---

/// LoginRequest
///
/// Input payload for POST /api/admin/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// LoginResponse
///
/// Success payload for POST /api/admin/login. The minted token travels only in
/// the Set-Cookie header, never in the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginUser {
    pub username: String,
}

// --- Upload Payloads ---

/// UploadResponse
///
/// Output schema of the image upload endpoint: the public URL the stored file
/// is served from, plus the generated filename.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_input_normalizes_csv_and_list() {
        let csv = TechInput::Csv("React, Next.js , ,Tailwind".to_string());
        assert_eq!(csv.normalize(), vec!["React", "Next.js", "Tailwind"]);

        let list = TechInput::List(vec!["Rust".to_string(), "Axum".to_string()]);
        assert_eq!(list.normalize(), vec!["Rust", "Axum"]);
    }

    #[test]
    fn document_converts_to_api_project() {
        let oid = ObjectId::new();
        let now = bson::DateTime::now();
        let doc = ProjectDocument {
            id: Some(oid),
            title: "Portfolio".to_string(),
            category: "frontend".to_string(),
            description: "A site".to_string(),
            image: "/uploads/a.png".to_string(),
            tech: vec!["Rust".to_string()],
            github: String::new(),
            demo: String::new(),
            details: String::new(),
            featured: true,
            order: 2,
            created_at: now,
            updated_at: now,
        };

        let project = Project::from(doc);
        assert_eq!(project.id, oid.to_hex());
        assert_eq!(project.id.len(), 24);
        assert!(project.featured);
        assert_eq!(project.order, 2);
    }
}
