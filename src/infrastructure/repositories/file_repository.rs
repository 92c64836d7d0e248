//! File Repository Implementation
//!
//! PostgreSQL implementation of the FileRepository trait for uploaded file
//! metadata. The bytes themselves live on disk under the upload directory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{FileRepository, StoredFile};
use crate::shared::error::AppError;

/// PostgreSQL uploaded file metadata repository implementation.
#[derive(Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, file: &StoredFile) -> Result<StoredFile, AppError> {
        let row = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO uploaded_files (file_id, original_name, stored_name, size,
                                        content_type, uploaded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING file_id, original_name, stored_name, size,
                      content_type, uploaded_by, created_at
            "#,
        )
        .bind(&file.file_id)
        .bind(&file.original_name)
        .bind(&file.stored_name)
        .bind(file.size)
        .bind(&file.content_type)
        .bind(&file.uploaded_by)
        .bind(file.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_stored_name(
        &self,
        stored_name: &str,
    ) -> Result<Option<StoredFile>, AppError> {
        let row = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT file_id, original_name, stored_name, size,
                   content_type, uploaded_by, created_at
            FROM uploaded_files
            WHERE stored_name = $1
            "#,
        )
        .bind(stored_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
