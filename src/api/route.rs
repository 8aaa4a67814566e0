//! Route table for the notes API
//!
//! Maps (method, path) to one of the five note operations.

use hyper::Method;

/// Collection path; item paths are `/api/notes/{id}`
pub const NOTES_PATH: &str = "/api/notes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteRoute {
    List,
    Get(String),
    Create,
    Update(String),
    Delete(String),
}

impl NoteRoute {
    /// Match a request; `None` means unknown endpoint
    pub fn parse(method: &Method, path: &str) -> Option<Self> {
        let rest = path.strip_prefix(NOTES_PATH)?;

        // Collection: "/api/notes" or "/api/notes/"
        if rest.is_empty() || rest == "/" {
            return match *method {
                Method::GET => Some(Self::List),
                Method::POST => Some(Self::Create),
                _ => None,
            };
        }

        // Item: exactly one non-empty segment
        let id = rest.strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }

        match *method {
            Method::GET => Some(Self::Get(id.to_string())),
            Method::PUT => Some(Self::Update(id.to_string())),
            Method::DELETE => Some(Self::Delete(id.to_string())),
            _ => None,
        }
    }
}
