//! Common utilities for the document upload handler

use axum::extract::Multipart;
use uuid::Uuid;

use ideaport_core::AppError;

/// Parsed multipart upload: file bytes, original filename, target idea.
pub struct UploadForm {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub idea_id: Uuid,
}

/// Extract the file and idea id from a multipart form.
/// Exactly one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut idea_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if file_data.is_some() {
                    return Err(AppError::Validation(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                filename = field.file_name().map(|s: &str| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
            }
            "idea_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read idea_id field: {}", e))
                })?;
                idea_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| AppError::Validation("idea_id must be a UUID".to_string()))?,
                );
            }
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    let idea_id =
        idea_id.ok_or_else(|| AppError::Validation("idea_id is required".to_string()))?;
    let original_filename = filename.unwrap_or_else(|| "unknown".to_string());

    Ok(UploadForm {
        data,
        original_filename,
        idea_id,
    })
}
