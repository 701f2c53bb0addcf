//! Composition root wiring storage, state, and autosave together.

use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;

use crate::{
    preview::Preview,
    storage::{FileStore, StorageAdapter, PREVIEW_VISIBLE_KEY, SIDEBAR_OPEN_KEY},
    AutosaveController, Config, Note, NoteStore, Preferences, Result,
};

/// A running workspace: loaded collections, panel preferences, and the
/// autosave controller over a shared store.
pub struct Session {
    store: Arc<Mutex<NoteStore>>,
    autosave: AutosaveController,
    adapter: StorageAdapter,
    prefs: Preferences,
    narrow_viewport: bool,
}

impl Session {
    /// Opens the workspace at the configured data directory.
    pub fn open(config: &Config) -> Result<Self> {
        let file_store = FileStore::new(&config.data_dir)?;
        Self::with_store(config, StorageAdapter::new(file_store))
    }

    /// Opens a workspace over an explicit storage adapter.
    pub fn with_store(config: &Config, adapter: StorageAdapter) -> Result<Self> {
        let data = adapter.load();
        let mut prefs = adapter.load_preferences();
        if config.narrow_viewport {
            // Narrow viewports always start with the preview closed,
            // whatever the stored flag says.
            prefs.preview_visible = false;
        }

        let store = Arc::new(Mutex::new(NoteStore::new(data, adapter.clone())));
        let autosave = AutosaveController::new(Arc::clone(&store), config);
        debug!(
            "Session opened (sidebar: {}, preview: {})",
            prefs.sidebar_open, prefs.preview_visible
        );

        Ok(Self {
            store,
            autosave,
            adapter,
            prefs,
            narrow_viewport: config.narrow_viewport,
        })
    }

    /// Shared handle to the workspace state.
    pub fn store(&self) -> Arc<Mutex<NoteStore>> {
        Arc::clone(&self.store)
    }

    /// The editor's autosave controller.
    pub fn autosave(&mut self) -> &mut AutosaveController {
        &mut self.autosave
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    /// Creates a note and opens it in the editor.
    pub async fn create_note(&mut self, folder_id: Option<&str>) -> Result<Note> {
        let note = { self.store.lock().await.create_note(folder_id) };
        self.autosave.open_note(&note.id).await?;
        Ok(note)
    }

    /// Selects a note from the visible list and opens it in the editor.
    pub async fn select_note(&mut self, id: &str) -> Result<()> {
        { self.store.lock().await.set_active_note(Some(id)) };
        self.autosave.open_note(id).await
    }

    /// Deletes a note, dropping any autosave scheduled for it.
    pub async fn delete_note(&mut self, id: &str) -> Result<()> {
        self.autosave.note_deleted(id).await;
        self.store.lock().await.delete_note(id)
    }

    /// Closes the editor, abandoning pending edits.
    pub async fn close_editor(&mut self) {
        self.autosave.close().await;
        self.store.lock().await.set_active_note(None);
    }

    /// Flushes pending edits; call before exit.
    pub async fn shutdown(&mut self) {
        self.autosave.flush().await;
    }

    /// The ordered note list for the sidebar.
    pub async fn visible_notes(&self) -> Vec<Note> {
        self.store.lock().await.visible_notes()
    }

    /// Flips the sidebar flag and persists it.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.prefs.sidebar_open = !self.prefs.sidebar_open;
        self.adapter
            .save_bool(SIDEBAR_OPEN_KEY, self.prefs.sidebar_open);
        self.prefs.sidebar_open
    }

    /// Flips the preview flag. Not persisted while the viewport is narrow,
    /// so overlays never reopen on the next narrow launch.
    pub fn toggle_preview(&mut self) -> bool {
        self.prefs.preview_visible = !self.prefs.preview_visible;
        if !self.narrow_viewport {
            self.adapter
                .save_bool(PREVIEW_VISIBLE_KEY, self.prefs.preview_visible);
        }
        self.prefs.preview_visible
    }

    /// Preview-pane data for the active note, if one is selected.
    pub async fn preview(&self) -> Option<Preview> {
        let store = self.store.lock().await;
        let note = store.active_note()?;
        let tag_names = store.tag_names(&note.tags);
        Some(Preview::of(note, tag_names))
    }
}
