//! The in-memory workspace state and its mutations.
//!
//! [`NoteStore`] is the single writer over the persisted collections. Every
//! mutating operation finishes by handing the touched collection to the
//! storage adapter; persistence never happens mid-mutation.

use std::collections::HashMap;

use chrono::Utc;
use log::{debug, warn};

use crate::{
    filter::{self, FilterCriteria},
    storage::{StorageAdapter, FOLDERS_KEY, NOTES_KEY, TAGS_KEY},
    Folder, Note, NotesError, Result, SortBy, StoredData, Tag, ROOT_FOLDER_ID, UNTITLED,
};

/// Workspace state: collections, filter criteria, and the active selection.
pub struct NoteStore {
    notes: HashMap<String, Note>,
    /// Folder arena keyed by id; the tree is traversed by child lookup.
    folders: HashMap<String, Folder>,
    tags: HashMap<String, Tag>,
    criteria: FilterCriteria,
    active_note_id: Option<String>,
    adapter: StorageAdapter,
}

impl NoteStore {
    /// Builds a store from previously loaded collections. The root folder
    /// is reinstated if the loaded data somehow lacks it.
    pub fn new(data: StoredData, adapter: StorageAdapter) -> Self {
        let mut folders: HashMap<String, Folder> = data
            .folders
            .into_iter()
            .map(|folder| (folder.id.clone(), folder))
            .collect();
        folders
            .entry(ROOT_FOLDER_ID.to_string())
            .or_insert_with(Folder::root);

        Self {
            notes: data
                .notes
                .into_iter()
                .map(|note| (note.id.clone(), note))
                .collect(),
            folders,
            tags: data
                .tags
                .into_iter()
                .map(|tag| (tag.id.clone(), tag))
                .collect(),
            criteria: FilterCriteria::default(),
            active_note_id: None,
            adapter,
        }
    }

    // --- queries ---

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_note_id.as_deref().and_then(|id| self.notes.get(id))
    }

    pub fn active_note_id(&self) -> Option<&str> {
        self.active_note_id.as_deref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The ordered note list the sidebar displays.
    pub fn visible_notes(&self) -> Vec<Note> {
        filter::filter_notes(self.notes.values(), &self.criteria)
    }

    /// Display name for a folder; dangling references read as "Unknown".
    pub fn folder_name(&self, id: &str) -> &str {
        self.folders
            .get(id)
            .map(|folder| folder.name.as_str())
            .unwrap_or("Unknown")
    }

    /// Direct children of a folder, sorted by name.
    pub fn child_folders(&self, parent_id: &str) -> Vec<&Folder> {
        let mut children: Vec<&Folder> = self
            .folders
            .values()
            .filter(|folder| folder.parent_id.as_deref() == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    /// Names of the given tag ids; dangling ids are skipped.
    pub fn tag_names(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.tags.get(id))
            .map(|tag| tag.name.clone())
            .collect()
    }

    /// All tags, sorted by name.
    pub fn all_tags(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.values().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.folder_id != ROOT_FOLDER_ID
            || !self.criteria.tag_ids.is_empty()
            || !self.criteria.query.is_empty()
    }

    // --- mutations ---

    /// Creates a note in the given folder (or the active one), makes it the
    /// active note, and switches the active folder when an explicit one was
    /// requested.
    pub fn create_note(&mut self, folder_id: Option<&str>) -> Note {
        let folder_id = folder_id
            .unwrap_or(self.criteria.folder_id.as_str())
            .to_string();
        let note = Note::new(folder_id.clone());
        debug!("Creating note {} in folder {}", note.id, folder_id);

        self.active_note_id = Some(note.id.clone());
        if folder_id != self.criteria.folder_id {
            self.criteria.folder_id = folder_id;
        }
        self.notes.insert(note.id.clone(), note.clone());

        self.persist_notes();
        note
    }

    /// Commits an edit buffer to a note. An empty title is coerced to the
    /// placeholder and `updated_at` advances.
    pub fn commit_note(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Note> {
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })?;

        note.title = if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title.to_string()
        };
        note.content = content.to_string();
        note.tags = tags.to_vec();
        note.updated_at = Utc::now();
        let committed = note.clone();

        self.persist_notes();
        Ok(committed)
    }

    /// Deletes a note, clearing the active selection when it pointed here.
    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        if self.notes.remove(id).is_none() {
            return Err(NotesError::NoteNotFound { id: id.to_string() });
        }
        if self.active_note_id.as_deref() == Some(id) {
            self.active_note_id = None;
        }
        debug!("Deleted note {}", id);

        self.persist_notes();
        Ok(())
    }

    /// Creates a folder under an existing parent.
    pub fn create_folder(&mut self, name: &str, parent_id: &str) -> Result<Folder> {
        if !self.folders.contains_key(parent_id) {
            return Err(NotesError::FolderNotFound {
                id: parent_id.to_string(),
            });
        }
        let folder = Folder::new(name, parent_id);
        debug!("Creating folder {} under {}", folder.id, parent_id);
        self.folders.insert(folder.id.clone(), folder.clone());

        self.persist_folders();
        Ok(folder)
    }

    /// Creates a tag from a (trimmed) name.
    pub fn create_tag(&mut self, name: &str) -> Tag {
        let tag = Tag::new(name.trim());
        self.tags.insert(tag.id.clone(), tag.clone());

        self.persist_tags();
        tag
    }

    /// Moves a note into another folder, advancing its `updated_at`.
    pub fn move_note_to_folder(&mut self, note_id: &str, folder_id: &str) -> Result<()> {
        if !self.folders.contains_key(folder_id) {
            return Err(NotesError::FolderNotFound {
                id: folder_id.to_string(),
            });
        }
        let note = self
            .notes
            .get_mut(note_id)
            .ok_or_else(|| NotesError::NoteNotFound {
                id: note_id.to_string(),
            })?;
        note.folder_id = folder_id.to_string();
        note.updated_at = Utc::now();

        self.persist_notes();
        Ok(())
    }

    // --- selection and filters ---

    /// Selects a note directly. Selecting from the filtered list always
    /// succeeds; an unknown id leaves the selection untouched.
    pub fn set_active_note(&mut self, id: Option<&str>) {
        match id {
            Some(id) if self.notes.contains_key(id) => {
                self.active_note_id = Some(id.to_string());
            }
            Some(id) => warn!("Tried to select a note that doesn't exist: {}", id),
            None => self.active_note_id = None,
        }
    }

    pub fn set_active_folder(&mut self, folder_id: &str) {
        self.criteria.folder_id = folder_id.to_string();
        self.deselect_if_hidden();
    }

    pub fn set_active_tags(&mut self, tag_ids: Vec<String>) {
        self.criteria.tag_ids = tag_ids;
        self.deselect_if_hidden();
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.criteria.query = query.to_string();
        self.deselect_if_hidden();
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.criteria.sort_by = sort_by;
    }

    /// Resets folder, tag, and search filters in one step. Everything
    /// passes an empty filter set, so the selection stays.
    pub fn clear_filters(&mut self) {
        self.criteria.folder_id = ROOT_FOLDER_ID.to_string();
        self.criteria.tag_ids.clear();
        self.criteria.query.clear();
    }

    /// Drops the active note when it no longer passes the current filters.
    /// Runs synchronously after every filter-state change.
    fn deselect_if_hidden(&mut self) {
        let hidden = self
            .active_note()
            .is_some_and(|note| !filter::note_matches(note, &self.criteria));
        if hidden {
            debug!("Active note no longer passes the filters, clearing selection");
            self.active_note_id = None;
        }
    }

    // --- persistence boundary: each mutation ends here, never mid-operation ---

    fn persist_notes(&self) {
        let notes: Vec<&Note> = self.notes.values().collect();
        self.adapter.save(NOTES_KEY, &notes);
    }

    fn persist_folders(&self) {
        let folders: Vec<&Folder> = self.folders.values().collect();
        self.adapter.save(FOLDERS_KEY, &folders);
    }

    fn persist_tags(&self) {
        let tags: Vec<&Tag> = self.tags.values().collect();
        self.adapter.save(TAGS_KEY, &tags);
    }
}
