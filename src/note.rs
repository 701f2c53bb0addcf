//! Core data records for the marknotes library.
//!
//! Notes, folders, and tags serialize with camelCase field names so the
//! persisted JSON records round-trip losslessly.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the distinguished root folder. It always exists, is never
/// removed, and disables folder filtering while active.
pub const ROOT_FOLDER_ID: &str = "root";

/// Placeholder title for notes without one.
pub const UNTITLED: &str = "Untitled Note";

/// A single markdown note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, immutable after creation.
    pub id: String,
    /// Note title; coerced to [`UNTITLED`] when committed empty.
    pub title: String,
    /// Note content in Markdown format.
    pub content: String,
    /// Folder this note lives in.
    pub folder_id: String,
    /// Tag ids; stored records may lack the field entirely.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the note was created. Immutable.
    pub created_at: DateTime<Utc>,
    /// Advances on every committed mutation.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a fresh note in the given folder with placeholder title,
    /// empty content, and matching created/updated timestamps.
    pub fn new(folder_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Note {
            id: generate_id(),
            title: UNTITLED.to_string(),
            content: String::new(),
            folder_id: folder_id.into(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A folder in the workspace tree.
///
/// Folders are only ever created as children of existing folders and never
/// re-parented, so the tree stays acyclic by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Parent folder, or `None` for the root.
    pub parent_id: Option<String>,
}

impl Folder {
    /// Creates a folder under the given parent.
    pub fn new(name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Folder {
            id: generate_id(),
            name: name.into(),
            parent_id: Some(parent_id.into()),
        }
    }

    /// The distinguished top-level folder every workspace carries.
    pub fn root() -> Self {
        Folder {
            id: ROOT_FOLDER_ID.to_string(),
            name: "Root".to_string(),
            parent_id: None,
        }
    }
}

/// A tag. Flat set, no hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            id: generate_id(),
            name: name.into(),
        }
    }
}

/// Generates a unique identifier from the current timestamp and a
/// process-local sequence number.
pub fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", Utc::now().timestamp_millis(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_serializes_with_camel_case_wire_names() {
        let note = Note::new(ROOT_FOLDER_ID);
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("folderId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("folder_id").is_none());
    }

    #[test]
    fn stored_note_without_tags_field_coerces_to_empty() {
        let json = r#"{
            "id": "n1",
            "title": "A",
            "content": "",
            "folderId": "root",
            "createdAt": "2024-01-05T10:00:00Z",
            "updatedAt": "2024-01-05T10:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.tags.is_empty());
        assert_eq!(note.folder_id, "root");
    }

    #[test]
    fn folder_parent_round_trips_as_parent_id() {
        let folder = Folder::new("Projects", ROOT_FOLDER_ID);
        let json = serde_json::to_value(&folder).unwrap();
        assert_eq!(json["parentId"], "root");

        let root_json = serde_json::to_value(Folder::root()).unwrap();
        assert!(root_json["parentId"].is_null());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn new_note_starts_with_matching_timestamps() {
        let note = Note::new(ROOT_FOLDER_ID);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.title, UNTITLED);
        assert!(note.content.is_empty());
    }
}
