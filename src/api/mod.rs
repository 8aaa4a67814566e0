// API module entry
// REST endpoints for notes under /api/notes

mod error;
mod notes;
mod response;
mod route;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::store::NoteStore;

// Re-export public types
pub use error::ApiError;
pub use response::{error_response, json_response, unknown_endpoint};
pub use route::{NoteRoute, NOTES_PATH};

/// Notes route handler
///
/// Runs the matched operation and translates any failure into its response.
pub async fn handle_notes(
    route: NoteRoute,
    body: &[u8],
    store: &dyn NoteStore,
) -> Response<Full<Bytes>> {
    let result = match route {
        NoteRoute::List => notes::list(store).await,
        NoteRoute::Get(id) => notes::get(store, &id).await,
        NoteRoute::Create => notes::create(store, body).await,
        NoteRoute::Update(id) => notes::update(store, &id, body).await,
        NoteRoute::Delete(id) => notes::delete(store, &id).await,
    };

    result.unwrap_or_else(ApiError::into_response)
}
