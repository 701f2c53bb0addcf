//! Pure filtering and ordering of the note list.
//!
//! Given the full note collection and the active criteria, these functions
//! compute the ordered sequence of notes to display. No side effects; the
//! visible list can be recomputed at any time from current state.

use crate::{Note, SortBy, ROOT_FOLDER_ID};

/// The four independent criteria applied to the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Active folder; the root sentinel disables folder filtering.
    pub folder_id: String,
    /// Selected tag ids. A note must carry every one of them.
    pub tag_ids: Vec<String>,
    /// Search query, matched case-insensitively against title and content.
    pub query: String,
    pub sort_by: SortBy,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            folder_id: ROOT_FOLDER_ID.to_string(),
            tag_ids: Vec::new(),
            query: String::new(),
            sort_by: SortBy::default(),
        }
    }
}

/// Whether a note passes all active filters.
///
/// The folder, tag, and search predicates compose as a strict conjunction:
/// a note failing any one of them is hidden no matter what the others say.
pub fn note_matches(note: &Note, criteria: &FilterCriteria) -> bool {
    matches_folder(note, &criteria.folder_id)
        && matches_tags(note, &criteria.tag_ids)
        && matches_query(note, &criteria.query)
}

fn matches_folder(note: &Note, folder_id: &str) -> bool {
    // Root shows notes from all folders; otherwise exact match only, so
    // selecting a parent never pulls in descendant folders' notes.
    folder_id == ROOT_FOLDER_ID || note.folder_id == folder_id
}

fn matches_tags(note: &Note, tag_ids: &[String]) -> bool {
    tag_ids.iter().all(|id| note.tags.contains(id))
}

fn matches_query(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    note.title.to_lowercase().contains(&query) || note.content.to_lowercase().contains(&query)
}

/// Computes the ordered list of visible notes.
///
/// Sorting is descending by the chosen timestamp; ties fall wherever the
/// sort leaves them.
pub fn filter_notes<'a>(
    notes: impl Iterator<Item = &'a Note>,
    criteria: &FilterCriteria,
) -> Vec<Note> {
    let mut visible: Vec<Note> = notes
        .filter(|note| note_matches(note, criteria))
        .cloned()
        .collect();
    visible.sort_by(|a, b| match criteria.sort_by {
        SortBy::Created => b.created_at.cmp(&a.created_at),
        SortBy::Updated => b.updated_at.cmp(&a.updated_at),
    });
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn note(title: &str, content: &str, folder: &str, tags: &[&str]) -> Note {
        let mut note = Note::new(folder);
        note.title = title.to_string();
        note.content = content.to_string();
        note.tags = tags.iter().map(|t| t.to_string()).collect();
        note
    }

    #[test]
    fn root_folder_shows_notes_from_all_folders() {
        let notes = [
            note("a", "", "root", &[]),
            note("b", "", "work-folder", &[]),
        ];
        let criteria = FilterCriteria::default();
        assert_eq!(filter_notes(notes.iter(), &criteria).len(), 2);
    }

    #[test]
    fn folder_filter_is_exact_and_non_recursive() {
        let notes = [
            note("parent note", "", "parent", &[]),
            note("child note", "", "child-of-parent", &[]),
        ];
        let criteria = FilterCriteria {
            folder_id: "parent".to_string(),
            ..Default::default()
        };
        let visible = filter_notes(notes.iter(), &criteria);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "parent note");
    }

    #[test]
    fn tag_filter_requires_all_selected_tags() {
        let n = note("x", "", "root", &["work", "urgent"]);
        let mut criteria = FilterCriteria::default();

        criteria.tag_ids = vec!["work".to_string()];
        assert!(note_matches(&n, &criteria));

        criteria.tag_ids = vec!["work".to_string(), "urgent".to_string()];
        assert!(note_matches(&n, &criteria));

        criteria.tag_ids = vec!["personal".to_string()];
        assert!(!note_matches(&n, &criteria));
    }

    #[test]
    fn empty_tag_selection_passes_everything() {
        let n = note("x", "", "root", &[]);
        assert!(note_matches(&n, &FilterCriteria::default()));
    }

    #[test]
    fn search_matches_title_and_content_case_insensitively() {
        let n = note("Meeting Notes", "discuss the Roadmap", "root", &[]);
        let mut criteria = FilterCriteria::default();

        criteria.query = "meeting".to_string();
        assert!(note_matches(&n, &criteria));

        criteria.query = "roadmap".to_string();
        assert!(note_matches(&n, &criteria));

        criteria.query = "retro".to_string();
        assert!(!note_matches(&n, &criteria));
    }

    #[test]
    fn search_cannot_revive_a_note_failing_the_tag_filter() {
        // All predicates AND together; a matching query must not override
        // a failing tag check.
        let n = note("meeting", "agenda", "root", &["work"]);
        let criteria = FilterCriteria {
            tag_ids: vec!["personal".to_string()],
            query: "agenda".to_string(),
            ..Default::default()
        };
        assert!(!note_matches(&n, &criteria));
    }

    #[test]
    fn search_cannot_revive_a_note_failing_the_folder_filter() {
        let n = note("meeting", "agenda", "inbox", &[]);
        let criteria = FilterCriteria {
            folder_id: "archive".to_string(),
            query: "agenda".to_string(),
            ..Default::default()
        };
        assert!(!note_matches(&n, &criteria));
    }

    #[test]
    fn sort_by_updated_is_descending() {
        let mut older = note("older", "", "root", &[]);
        let mut newer = note("newer", "", "root", &[]);
        older.updated_at = older.updated_at - Duration::minutes(10);
        newer.updated_at = newer.updated_at + Duration::minutes(10);

        let notes = [older, newer];
        let criteria = FilterCriteria {
            sort_by: SortBy::Updated,
            ..Default::default()
        };
        let visible = filter_notes(notes.iter(), &criteria);
        assert_eq!(visible[0].title, "newer");
        assert_eq!(visible[1].title, "older");
    }

    #[test]
    fn sort_by_created_is_descending() {
        let mut first = note("first", "", "root", &[]);
        let mut second = note("second", "", "root", &[]);
        first.created_at = first.created_at - Duration::hours(1);
        // Updated order deliberately contradicts created order.
        first.updated_at = first.updated_at + Duration::hours(2);
        second.created_at = second.created_at + Duration::hours(1);

        let notes = [first, second];
        let criteria = FilterCriteria {
            sort_by: SortBy::Created,
            ..Default::default()
        };
        let visible = filter_notes(notes.iter(), &criteria);
        assert_eq!(visible[0].title, "second");
        assert_eq!(visible[1].title, "first");
    }
}
