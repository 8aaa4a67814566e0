//! Note data model
//!
//! The persisted `Note` plus the input shapes used to create and patch it.

mod note;

pub use note::{NewNote, Note, NotePatch};
