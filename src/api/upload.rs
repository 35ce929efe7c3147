//! Multipart form reading for scan uploads.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::analysis::ImageUpload;
use crate::api::error::ApiError;

/// Form field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Parsed upload form: the image part (if any) plus text fields by name.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<ImageUpload>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Trimmed text field, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self) -> Result<ImageUpload, ApiError> {
        self.file
            .take()
            .ok_or_else(|| ApiError::BadRequest("No file provided".into()))
    }
}

/// Drain a multipart stream into an `UploadForm`.
///
/// Only the first `file` part is kept. Unnamed parts are skipped.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == FILE_FIELD {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if form.file.is_none() {
                form.file = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
        } else {
            let value = field.text().await?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
