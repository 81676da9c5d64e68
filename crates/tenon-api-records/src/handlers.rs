//! Request handlers for the records API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tenon_docstore::Document;

use crate::error::RecordsError;
use crate::models::MessageResponse;
use crate::router::RecordsState;

/// POST /write
///
/// Create or fully replace the record keyed by the body's `id` field.
pub async fn write_handler(
    State(state): State<RecordsState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<MessageResponse>), RecordsError> {
    let document = as_object(&body)?;
    state.store.upsert(document).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Data written or updated successfully")),
    ))
}

/// GET /retrieve/:id
pub async fn retrieve_handler(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, RecordsError> {
    Ok(Json(state.store.read(&id).await?))
}

/// GET /retrieve-all
///
/// Full cross-partition scan; O(n) in container size.
pub async fn retrieve_all_handler(
    State(state): State<RecordsState>,
) -> Result<Json<Vec<Document>>, RecordsError> {
    Ok(Json(state.store.query_all().await?))
}

/// GET /retrieve/by/:field/:value
///
/// First record whose top-level `field` equals `value`. Non-unique filtered
/// lookup, in contrast to the primary-key read above.
pub async fn retrieve_by_field_handler(
    State(state): State<RecordsState>,
    Path((field, value)): Path<(String, String)>,
) -> Result<Json<Document>, RecordsError> {
    Ok(Json(state.store.find_by_field(&field, &value).await?))
}

/// DELETE /delete/:id
pub async fn delete_handler(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, RecordsError> {
    state.store.delete(&id).await?;
    Ok(Json(MessageResponse::new("Data deleted successfully")))
}

/// PUT /edit/:id
///
/// Read-modify-write: fetch the record, shallow-merge the patch over it
/// (patch fields win), write back. The write carries the etag from the read,
/// so a concurrent change surfaces as 409 instead of a silent lost update.
pub async fn edit_handler(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, RecordsError> {
    let patch = as_object(&body)?;
    if patch.is_empty() {
        return Err(RecordsError::Validation(
            "Invalid input. A non-empty JSON body is required.".into(),
        ));
    }
    // The partition key derives from `id`; changing it would orphan the record.
    if let Some(patched_id) = patch.get("id") {
        if patched_id.as_str() != Some(id.as_str()) {
            return Err(RecordsError::Validation(
                "'id' is immutable and cannot be changed".into(),
            ));
        }
    }

    let existing = state.store.read(&id).await?;
    let etag = existing
        .get("_etag")
        .and_then(Value::as_str)
        .map(str::to_string);
    let merged = merge_document(existing, &patch);
    state.store.replace(&id, merged, etag.as_deref()).await?;
    Ok(Json(MessageResponse::new("Data updated successfully")))
}

/// Require the request body to be a JSON object.
fn as_object(body: &Value) -> Result<Document, RecordsError> {
    body.as_object()
        .cloned()
        .ok_or_else(|| RecordsError::Validation("Request body must be a JSON object".into()))
}

/// Shallow merge: every top-level patch field overwrites the stored field of
/// the same name; stored fields absent from the patch are preserved.
fn merge_document(mut existing: Document, patch: &Document) -> Document {
    for (key, value) in patch {
        existing.insert(key.clone(), value.clone());
    }
    existing
}
