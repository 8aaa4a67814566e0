// Note operation handlers
// Decode the body, call the store, serialize the result. Errors bubble up as ApiError.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::{Map, Value};

use super::error::ApiError;
use super::response::json_response;
use crate::http;
use crate::model::{NewNote, NotePatch};
use crate::store::NoteStore;

type ApiResult = Result<Response<Full<Bytes>>, ApiError>;

/// Body accepted by `POST /api/notes`
#[derive(Debug, Deserialize)]
struct CreateNoteBody {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    important: Option<bool>,
}

/// Decode a JSON object body; an empty body counts as `{}`
///
/// Only objects are accepted. A derived struct `Deserialize` would otherwise
/// also take a JSON array and match its elements to fields by position.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Object(Map::new()))
            .map_err(|e| ApiError::InvalidBody(e.to_string()));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => ApiError::InvalidBody(e.to_string()),
        Category::Io | Category::Syntax | Category::Eof => ApiError::MalformedJson,
    })?;

    if !value.is_object() {
        return Err(ApiError::InvalidBody(
            "request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

pub async fn list(store: &dyn NoteStore) -> ApiResult {
    let notes = store.list_all().await?;
    Ok(json_response(StatusCode::OK, &notes))
}

pub async fn get(store: &dyn NoteStore, id: &str) -> ApiResult {
    let note = store.get_by_id(id).await?;
    Ok(json_response(StatusCode::OK, &note))
}

pub async fn create(store: &dyn NoteStore, body: &[u8]) -> ApiResult {
    let input: CreateNoteBody = decode(body)?;
    let content = input.content.ok_or(ApiError::MissingField("content"))?;

    let note = NewNote::new(content).important(input.important.unwrap_or(false));
    let saved = store.create(note).await?;
    Ok(json_response(StatusCode::CREATED, &saved))
}

pub async fn update(store: &dyn NoteStore, id: &str, body: &[u8]) -> ApiResult {
    let patch: NotePatch = decode(body)?;
    let updated = store.update(id, patch).await?;
    Ok(json_response(StatusCode::OK, &updated))
}

pub async fn delete(store: &dyn NoteStore, id: &str) -> ApiResult {
    store.delete(id).await?;
    Ok(http::build_empty_response(StatusCode::NO_CONTENT))
}
