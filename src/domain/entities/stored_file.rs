//! Uploaded file metadata entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Metadata for a chat attachment on disk. Maps to the `uploaded_files` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredFile {
    /// Prefixed string id (`file_<hex>`)
    pub file_id: String,

    /// Name the client uploaded the file under
    pub original_name: String,

    /// Sanitized on-disk name (`<file_id><ext>`)
    pub stored_name: String,

    pub size: i64,

    pub content_type: String,

    pub uploaded_by: String,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for uploaded file metadata.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Record an uploaded file.
    async fn create(&self, file: &StoredFile) -> Result<StoredFile, AppError>;

    /// Look up a file by its on-disk name.
    async fn find_by_stored_name(&self, stored_name: &str)
        -> Result<Option<StoredFile>, AppError>;
}
