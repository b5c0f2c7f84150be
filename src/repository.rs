use crate::models::{Project, ProjectDocument, ProjectUpdate, UpdateOutcome};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::{Collection, Database};
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations over the
/// `projects` collection. This is the core of the Repository Abstraction
/// pattern, allowing the handlers to interact with the data layer without
/// knowing the specific implementation (MongoDB, in-memory mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable and usable across Axum's
/// asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    /// All projects, newest first (`createdAt` descending).
    async fn list_projects(&self) -> Vec<Project>;
    /// Inserts a new document and returns the stored project with its
    /// store-assigned id, or None on failure.
    async fn insert_project(&self, doc: ProjectDocument) -> Option<Project>;
    async fn get_project(&self, id: ObjectId) -> Option<Project>;
    /// Applies a full `$set` update; distinguishes not-found, matched-but-
    /// unchanged, and modified. Last write wins — no versioning.
    async fn update_project(&self, id: ObjectId, update: ProjectUpdate) -> UpdateOutcome;
    /// Returns true iff a document was removed.
    async fn delete_project(&self, id: ObjectId) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// MongoRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// `projects` collection of the configured MongoDB database.
pub struct MongoRepository {
    collection: Collection<ProjectDocument>,
}

impl MongoRepository {
    /// Creates a new repository instance over the given database handle.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("projects"),
        }
    }
}

#[async_trait]
impl Repository for MongoRepository {
    /// list_projects
    ///
    /// Full collection scan sorted by creation date, newest first. Failures
    /// are logged and degrade to an empty listing.
    async fn list_projects(&self) -> Vec<Project> {
        let cursor = match self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
        {
            Ok(cursor) => cursor,
            Err(e) => {
                tracing::error!("list_projects error: {:?}", e);
                return vec![];
            }
        };

        match cursor.try_collect::<Vec<ProjectDocument>>().await {
            Ok(docs) => docs.into_iter().map(Project::from).collect(),
            Err(e) => {
                tracing::error!("list_projects cursor error: {:?}", e);
                vec![]
            }
        }
    }

    /// insert_project
    ///
    /// Inserts the document and echoes it back with the id MongoDB assigned.
    async fn insert_project(&self, mut document: ProjectDocument) -> Option<Project> {
        match self.collection.insert_one(&document).await {
            Ok(result) => {
                document.id = result.inserted_id.as_object_id();
                Some(Project::from(document))
            }
            Err(e) => {
                tracing::error!("insert_project error: {:?}", e);
                None
            }
        }
    }

    /// get_project
    ///
    /// Single-document lookup by ObjectId.
    async fn get_project(&self, id: ObjectId) -> Option<Project> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_project error: {:?}", e);
                None
            })
            .map(Project::from)
    }

    /// update_project
    ///
    /// Applies the prepared `$set` document. Mongo's matched/modified counts
    /// map directly onto the three `UpdateOutcome` variants.
    async fn update_project(&self, id: ObjectId, update: ProjectUpdate) -> UpdateOutcome {
        let set_doc = match bson::to_document(&update) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!("update_project serialization error: {:?}", e);
                return UpdateOutcome::NotFound;
            }
        };

        match self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set_doc })
            .await
        {
            Ok(result) if result.matched_count == 0 => UpdateOutcome::NotFound,
            Ok(result) if result.modified_count == 0 => UpdateOutcome::Unchanged,
            Ok(_) => UpdateOutcome::Updated,
            Err(e) => {
                tracing::error!("update_project error: {:?}", e);
                UpdateOutcome::NotFound
            }
        }
    }

    /// delete_project
    ///
    /// Single-document delete; true iff a row was removed.
    async fn delete_project(&self, id: ObjectId) -> bool {
        match self.collection.delete_one(doc! { "_id": id }).await {
            Ok(result) => result.deleted_count > 0,
            Err(e) => {
                tracing::error!("delete_project error: {:?}", e);
                false
            }
        }
    }
}
