//! Request extractors.

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use noticeboard_core::notification::ImageUpload;
use serde::Deserialize;

use crate::error::ApiError;

/// Form field carrying the image file.
pub const IMAGE_FIELD: &str = "imageNotification";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Notification fields sent with a create or update request.
///
/// Accepts `multipart/form-data` (the only way to attach an image) and
/// `application/json`. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct NotificationForm {
    /// `titleName`.
    pub title_name: Option<String>,
    /// `detailNotification`.
    pub detail_notification: Option<String>,
    /// `dateNotification`.
    pub date_notification: Option<String>,
    /// `imageNotification` file part.
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonForm {
    title_name: Option<String>,
    detail_notification: Option<String>,
    date_notification: Option<String>,
}

impl From<JsonForm> for NotificationForm {
    fn from(form: JsonForm) -> Self {
        Self {
            title_name: form.title_name,
            detail_notification: form.detail_notification,
            date_notification: form.date_notification,
            image: None,
        }
    }
}

impl NotificationForm {
    /// Return a text field or a 400 naming it.
    pub fn require(value: Option<String>, field: &str) -> Result<String, ApiError> {
        value.ok_or_else(|| ApiError::validation(format!("{field} is required")))
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some(IMAGE_FIELD) => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_CONTENT_TYPE)
                        .to_string();
                    let data = field.bytes().await.map_err(|e| {
                        ApiError::validation(format!("Failed to read {IMAGE_FIELD}: {e}"))
                    })?;

                    // Browsers send an empty part when no file was picked.
                    if !data.is_empty() {
                        form.image = Some(ImageUpload {
                            filename,
                            content_type,
                            data,
                        });
                    }
                }
                Some(name @ ("titleName" | "detailNotification" | "dateNotification")) => {
                    let name = name.to_string();
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::validation(format!("Failed to read {name}: {e}")))?;
                    match name.as_str() {
                        "titleName" => form.title_name = Some(text),
                        "detailNotification" => form.detail_notification = Some(text),
                        _ => form.date_notification = Some(text),
                    }
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(form)
    }
}

impl<S: Send + Sync> FromRequest<S> for NotificationForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers();
        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        let empty_body = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|len| len.trim() == "0");

        // No body means no fields.
        if content_type.is_none() || empty_body {
            return Ok(Self::default());
        }

        if content_type.is_some_and(|ct| ct.starts_with("application/json")) {
            let Json(form) = Json::<JsonForm>::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;
            return Ok(form.into());
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        Self::from_multipart(multipart).await
    }
}
