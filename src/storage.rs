use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Public URL prefix uploaded images are served from.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// StoredImage
///
/// Result of a successful store operation: the public URL the file is served
/// from, and the generated filename.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub url: String,
    pub filename: String,
}

// 1. StorageService Contract
/// StorageService
///
/// Defines the abstract contract for the image upload sink. This trait allows
/// us to swap the concrete implementation — the local-disk writer
/// (LocalDiskStorage) in production against the in-memory Mock
/// (MockStorageService) during testing — without affecting the calling
/// handlers.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the upload directory exists. Used in the `Env::Local` setup to
    /// automatically provision the directory on startup.
    async fn ensure_upload_dir(&self);

    /// Persists the file bytes under a unique name derived from the suggested
    /// name's extension, returning the public URL.
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<StoredImage, String>;
}

/// StorageState
///
/// The concrete type used to share the storage service access across the
/// application state.
pub type StorageState = Arc<dyn StorageService>;

// 2. The Real Implementation (Local Disk)
/// LocalDiskStorage
///
/// Writes uploads to a directory that is also mounted as a static file
/// service under `/uploads`, so the returned URL is immediately servable.
#[derive(Clone)]
pub struct LocalDiskStorage {
    upload_dir: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    /// ensure_upload_dir
    ///
    /// Idempotent directory creation; safe to call at every startup.
    async fn ensure_upload_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.upload_dir).await {
            tracing::error!("failed to create upload dir: {:?}", e);
        }
    }

    /// store
    ///
    /// Names the file `<uuid>.<ext>` where the extension is taken from the
    /// suggested name and sanitized, then writes the bytes to disk.
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<StoredImage, String> {
        let filename = unique_filename(suggested_name);
        let filepath = self.upload_dir.join(&filename);

        tokio::fs::write(&filepath, bytes)
            .await
            .map_err(|e| e.to_string())?;

        Ok(StoredImage {
            url: format!("{UPLOADS_URL_PREFIX}/{filename}"),
            filename,
        })
    }
}

/// unique_filename
///
/// Derives a collision-free filename from a fresh UUID plus the sanitized
/// extension of the client-supplied name. The original name itself is never
/// used, which removes any path traversal surface.
fn unique_filename(suggested_name: &str) -> String {
    let extension = Path::new(suggested_name)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(sanitize_extension)
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// sanitize_extension
///
/// Keeps only ASCII alphanumerics, lowercased. Anything else in a
/// client-supplied extension is dropped.
fn sanitize_extension(ext: &str) -> String {
    ext.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// 3. The Mock Implementation (For Unit Tests)
/// MockStorageService
///
/// A mock implementation of `StorageService` used exclusively for unit and
/// integration testing. This allows us to test the upload handler logic
/// without touching the filesystem, isolating the test boundary.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_upload_dir(&self) {
        // No-op in mock environment.
    }

    async fn store(&self, _bytes: &[u8], suggested_name: &str) -> Result<StoredImage, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        // Deterministic name for mock assertions.
        let filename = format!("mock-{}", unique_filename(suggested_name));
        Ok(StoredImage {
            url: format!("{UPLOADS_URL_PREFIX}/{filename}"),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_keep_a_sanitized_extension() {
        let name = unique_filename("photo.PNG");
        assert!(name.ends_with(".png"));

        let name = unique_filename("../../../etc/passwd");
        assert!(name.ends_with(".bin"));
        assert!(!name.contains('/'));

        let name = unique_filename("noextension");
        assert!(name.ends_with(".bin"));

        let name = unique_filename("shot.j%p@g");
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn filenames_are_unique() {
        assert_ne!(unique_filename("a.jpg"), unique_filename("a.jpg"));
    }
}
