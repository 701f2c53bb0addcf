//! Shared types for the marknotes library.

use serde::{Deserialize, Serialize};

use crate::{Folder, Note, NotesError, Tag};

/// A specialized Result type for marknotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Sort key for the visible note list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest created first.
    Created,
    /// Most recently updated first.
    #[default]
    Updated,
}

/// The three persisted collections, as loaded from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredData {
    pub notes: Vec<Note>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
}

impl Default for StoredData {
    /// An empty workspace: no notes, no tags, a single root folder.
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            folders: vec![Folder::root()],
            tags: Vec::new(),
        }
    }
}

/// Panel preferences, loaded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    /// Whether the sidebar panel starts open.
    pub sidebar_open: bool,
    /// Whether the markdown preview pane starts visible.
    pub preview_visible: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            preview_visible: false,
        }
    }
}
