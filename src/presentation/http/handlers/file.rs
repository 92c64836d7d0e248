//! File Handlers
//!
//! Chat attachment upload and download. Files land on local disk under the
//! configured upload directory; metadata goes to the uploaded_files table.
//! Stored names are derived from the generated file id, so a download can
//! only ever resolve to a file this server wrote.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;

use crate::application::dto::UploadedFileResponse;
use crate::domain::{FileRepository, StoredFile};
use crate::infrastructure::repositories::PgFileRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::id::prefixed_id;
use crate::startup::AppState;

/// Upload a chat attachment (multipart form, field name "file")
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedFileResponse>), AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let original_name = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::BadRequest("Missing file name".to_string()))?;

    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let extension = FsPath::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    if !state.settings.upload.is_extension_allowed(&extension) {
        return Err(AppError::BadRequest(format!(
            "File type {} is not allowed",
            if extension.is_empty() { "(none)" } else { &extension }
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

    if data.len() > state.settings.upload.max_file_size {
        return Err(AppError::BadRequest(format!(
            "File exceeds maximum size of {} bytes",
            state.settings.upload.max_file_size
        )));
    }

    let file_id = prefixed_id("file");
    let stored_name = format!("{}{}", file_id, extension);
    let disk_path = state.settings.upload.dir.join(&stored_name);

    tokio::fs::write(&disk_path, &data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store file: {}", e)))?;

    let file = StoredFile {
        file_id,
        original_name,
        stored_name: stored_name.clone(),
        size: data.len() as i64,
        content_type,
        uploaded_by: auth_user.user_id,
        created_at: Utc::now(),
    };

    let repo = PgFileRepository::new(state.db.clone());
    let stored = match repo.create(&file).await {
        Ok(stored) => stored,
        Err(e) => {
            // Do not leave orphaned bytes behind when metadata insert fails.
            let _ = tokio::fs::remove_file(&disk_path).await;
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadedFileResponse {
            url: format!("/api/files/{}", stored.stored_name),
            file_id: stored.file_id,
            original_name: stored.original_name,
            stored_name: stored.stored_name,
            size: stored.size,
            content_type: stored.content_type,
        }),
    ))
}

/// Download a previously uploaded file
pub async fn download_file(
    State(state): State<AppState>,
    Path(stored_name): Path<String>,
) -> Result<Response, AppError> {
    // Stored names are flat id-based names; anything with a path separator
    // cannot be one of ours.
    if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
        return Err(AppError::BadRequest("Invalid file name".to_string()));
    }

    let repo = Arc::new(PgFileRepository::new(state.db.clone()));
    let file = repo
        .find_by_stored_name(&stored_name)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let disk_path = state.settings.upload.dir.join(&file.stored_name);
    let data = tokio::fs::read(&disk_path)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.original_name),
        ),
    ];

    Ok((headers, data).into_response())
}
