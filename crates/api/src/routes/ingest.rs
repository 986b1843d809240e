//! Public submission endpoint.
//!
//! `POST /f/{key}` accepts `multipart/form-data` or urlencoded bodies from any
//! origin. The form key is the only credential.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_TYPE, USER_AGENT},
    },
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use serde_json::json;

use crate::{AppState, error::ApiError};
use formrelay_core::ingest::{IncomingField, IngestError, IngestService, RequestMetadata};
use formrelay_core::storage::StorageService;
use formrelay_db::{FormRepository, SubmissionRepository};
use formrelay_shared::EmailService;

type Ingest = IngestService<FormRepository, SubmissionRepository, StorageService, EmailService>;

/// Creates the ingest route, accepting bodies up to `body_limit` bytes.
pub fn routes(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/f/{key}", post(submit))
        .layer(DefaultBodyLimit::max(body_limit))
}

fn ingest_service(state: &AppState) -> Ingest {
    IngestService::new(
        Arc::new(FormRepository::new((*state.db).clone())),
        Arc::new(SubmissionRepository::new((*state.db).clone())),
        state.storage.clone(),
        state.email_service.clone(),
    )
}

/// Generic failure shown to anonymous submitters.
fn failure(key: &str, err: &dyn std::fmt::Display) -> Response {
    tracing::error!(form_key = %key, error = %err, "Failed to process submission");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to process submission" })),
    )
        .into_response()
}

fn request_metadata(headers: &HeaderMap) -> RequestMetadata {
    RequestMetadata::from_headers(
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok()),
        headers.get(USER_AGENT).and_then(|v| v.to_str().ok()),
    )
}

/// Reads the body into fields in the order they were sent.
///
/// A multipart part with a filename is a file; parts with an empty filename
/// are unset file inputs and are skipped, as are parts without a name.
async fn read_fields(request: Request, state: &AppState) -> Result<Vec<IncomingField>, IngestError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| IngestError::malformed(e.body_text()))?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| IngestError::malformed(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) if filename.is_empty() => {}
                Some(filename) => {
                    let file_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| IngestError::malformed(e.body_text()))?;
                    fields.push(IncomingField::file(name, filename, file_type, bytes));
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| IngestError::malformed(e.body_text()))?;
                    fields.push(IncomingField::text(name, text));
                }
            }
        }
        Ok(fields)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
            .await
            .map_err(|e| IngestError::malformed(e.body_text()))?;
        Ok(pairs
            .into_iter()
            .map(|(name, value)| IncomingField::text(name, value))
            .collect())
    } else {
        Err(IngestError::malformed(format!(
            "unsupported content type '{content_type}'"
        )))
    }
}

/// POST `/f/{key}`
/// Record a submission for the form with this key.
async fn submit(State(state): State<AppState>, Path(key): Path<String>, request: Request) -> Response {
    let service = ingest_service(&state);

    let form = match service.find_form(&key).await {
        Ok(form) => form,
        Err(e @ IngestError::UnknownKey(_)) => return ApiError::from(e).into_response(),
        Err(e) => return failure(&key, &e),
    };

    let metadata = request_metadata(request.headers());
    let fields = match read_fields(request, &state).await {
        Ok(fields) => fields,
        Err(e) => return failure(&key, &e),
    };

    match service.submit(&form, fields, metadata).await {
        Ok(outcome) => match outcome.redirect_url {
            Some(url) if HeaderValue::try_from(url.as_str()).is_ok() => {
                Redirect::to(&url).into_response()
            }
            Some(url) => failure(&key, &format!("unusable redirect url {url:?}")),
            None => Json(json!({
                "success": true,
                "message": "Submission received"
            }))
            .into_response(),
        },
        Err(e) => failure(&key, &e),
    }
}
