//! Debounced autosave for the note open in the editor.
//!
//! Edits land in a local buffer and are committed to the store only after a
//! quiet period with no further edits (trailing-edge debounce, not
//! throttling). The pending commit is a cancellable tokio task; another
//! edit, switching notes, or deleting the open note cancels it. Every
//! commit re-checks under lock that the note it was scheduled for is still
//! the open one, so a stale timer can never write across notes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::{Config, NoteStore, NotesError, Result};

/// Editor-facing save status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// No unsaved edits pending.
    Idle,
    /// A debounce timer is pending or a commit is in flight.
    Saving,
    /// A commit just completed; reverts to `Idle` after the hold period.
    Saved,
}

/// Local edit buffers for the open note.
#[derive(Debug, Clone, Default)]
struct EditBuffer {
    title: String,
    content: String,
    tags: Vec<String>,
}

struct Inner {
    /// Id of the note the editor has open, if any.
    open_note: Option<String>,
    buffer: EditBuffer,
    state: SaveState,
    last_saved: Option<DateTime<Utc>>,
    /// Bumped on every edit and every open/close; a scheduled commit only
    /// applies when the generation it captured is still current.
    generation: u64,
}

/// Per-note autosave state machine over a shared [`NoteStore`].
pub struct AutosaveController {
    store: Arc<Mutex<NoteStore>>,
    inner: Arc<Mutex<Inner>>,
    quiet: Duration,
    hold: Duration,
    /// At most one pending debounce task at any time.
    pending: Option<JoinHandle<()>>,
}

impl AutosaveController {
    pub fn new(store: Arc<Mutex<NoteStore>>, config: &Config) -> Self {
        Self {
            store,
            inner: Arc::new(Mutex::new(Inner {
                open_note: None,
                buffer: EditBuffer::default(),
                state: SaveState::Idle,
                last_saved: None,
                generation: 0,
            })),
            quiet: config.autosave_quiet(),
            hold: config.saved_hold(),
            pending: None,
        }
    }

    /// Opens a note in the editor: cancels any pending commit for the
    /// previously open note and reloads the buffers from stored data.
    pub async fn open_note(&mut self, id: &str) -> Result<()> {
        self.cancel_pending();
        let buffer = {
            let store = self.store.lock().await;
            let note = store
                .note(id)
                .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })?;
            EditBuffer {
                title: note.title.clone(),
                content: note.content.clone(),
                tags: note.tags.clone(),
            }
        };

        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.open_note = Some(id.to_string());
        inner.buffer = buffer;
        inner.state = SaveState::Idle;
        debug!("Editor opened note {}", id);
        Ok(())
    }

    /// Closes the editor without committing pending edits.
    pub async fn close(&mut self) {
        self.cancel_pending();
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.open_note = None;
        inner.buffer = EditBuffer::default();
        inner.state = SaveState::Idle;
    }

    /// Called when a note is deleted; drops pending work if it was open.
    pub async fn note_deleted(&mut self, id: &str) {
        let was_open = { self.inner.lock().await.open_note.as_deref() == Some(id) };
        if was_open {
            debug!("Open note {} deleted, dropping pending autosave", id);
            self.close().await;
        }
    }

    pub async fn edit_title(&mut self, title: &str) {
        let title = title.to_string();
        self.apply_edit(move |buffer| buffer.title = title).await;
    }

    pub async fn edit_content(&mut self, content: &str) {
        let content = content.to_string();
        self.apply_edit(move |buffer| buffer.content = content).await;
    }

    pub async fn set_tags(&mut self, tags: Vec<String>) {
        self.apply_edit(move |buffer| buffer.tags = tags).await;
    }

    pub async fn state(&self) -> SaveState {
        self.inner.lock().await.state
    }

    /// When the last commit landed, if any did this session.
    pub async fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_saved
    }

    /// Commits pending edits immediately, without waiting out the quiet
    /// period. Used on shutdown paths.
    pub async fn flush(&mut self) {
        self.cancel_pending();
        let (note_id, generation) = {
            let inner = self.inner.lock().await;
            match (&inner.open_note, inner.state) {
                (Some(id), SaveState::Saving) => (id.clone(), inner.generation),
                _ => return,
            }
        };
        commit(
            Arc::clone(&self.store),
            Arc::clone(&self.inner),
            note_id,
            generation,
        )
        .await;
    }

    /// Records an edit and (re)starts the debounce timer. A burst of rapid
    /// edits collapses into a single commit carrying the last edit's
    /// values.
    async fn apply_edit(&mut self, mutate: impl FnOnce(&mut EditBuffer)) {
        self.cancel_pending();
        let (note_id, generation) = {
            let mut inner = self.inner.lock().await;
            let Some(note_id) = inner.open_note.clone() else {
                warn!("Edit ignored: no note is open");
                return;
            };
            mutate(&mut inner.buffer);
            inner.state = SaveState::Saving;
            inner.generation += 1;
            (note_id, inner.generation)
        };

        let store = Arc::clone(&self.store);
        let inner = Arc::clone(&self.inner);
        let quiet = self.quiet;
        let hold = self.hold;
        self.pending = Some(tokio::spawn(async move {
            time::sleep(quiet).await;
            if !commit(store, Arc::clone(&inner), note_id, generation).await {
                return;
            }
            // Hold the saved indicator, then fall back to idle unless a
            // newer edit took over in the meantime.
            time::sleep(hold).await;
            let mut inner = inner.lock().await;
            if inner.generation == generation && inner.state == SaveState::Saved {
                inner.state = SaveState::Idle;
            }
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for AutosaveController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Applies the buffered edits to the store. Returns `true` when a commit
/// was written; a stale generation, a switched-away note, or a deleted
/// note all discard the commit silently.
async fn commit(
    store: Arc<Mutex<NoteStore>>,
    inner: Arc<Mutex<Inner>>,
    note_id: String,
    generation: u64,
) -> bool {
    let mut inner = inner.lock().await;
    if inner.generation != generation {
        debug!("Discarding stale autosave for note {}", note_id);
        return false;
    }
    if inner.open_note.as_deref() != Some(note_id.as_str()) {
        debug!("Discarding autosave: note {} is no longer open", note_id);
        return false;
    }
    let buffer = inner.buffer.clone();

    let mut store = store.lock().await;
    match store.commit_note(&note_id, &buffer.title, &buffer.content, &buffer.tags) {
        Ok(_) => {
            inner.state = SaveState::Saved;
            inner.last_saved = Some(Utc::now());
            debug!("Autosaved note {}", note_id);
            true
        }
        Err(NotesError::NoteNotFound { .. }) => {
            debug!("Discarding autosave for deleted note {}", note_id);
            false
        }
        Err(e) => {
            warn!("Autosave for note {} failed: {}", note_id, e);
            false
        }
    }
}
