//! Markdown rendering and content statistics for the preview pane.

use chrono::{DateTime, Utc};
use pulldown_cmark::{html, Options, Parser};

use crate::Note;

/// Everything the preview pane shows for a note.
#[derive(Debug, Clone)]
pub struct Preview {
    pub title: String,
    /// Rendered HTML fragment of the note content.
    pub html: String,
    /// Resolved tag names; dangling ids are already skipped.
    pub tag_names: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub words: usize,
    pub chars: usize,
}

impl Preview {
    pub fn of(note: &Note, tag_names: Vec<String>) -> Self {
        Self {
            title: note.title.clone(),
            html: render_markdown(&note.content),
            tag_names,
            created_at: note.created_at,
            updated_at: note.updated_at,
            words: word_count(&note.content),
            chars: char_count(&note.content),
        }
    }
}

/// Renders markdown to an HTML fragment.
///
/// Tables, strikethrough, and task lists are enabled on top of CommonMark.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(content, options);

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Whitespace-delimited word count of the content.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Character count of the trimmed content.
pub fn char_count(content: &str) -> usize {
    content.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render_markdown("# Title\n\nsome *emphasis* here");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn renders_strikethrough_extension() {
        let html = render_markdown("~~gone~~");
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn empty_content_renders_to_nothing() {
        assert!(render_markdown("").is_empty());
    }

    #[test]
    fn counts_ignore_surrounding_whitespace() {
        assert_eq!(word_count("  hello   world  "), 2);
        assert_eq!(char_count("  hello   world  "), 13);
        assert_eq!(word_count(""), 0);
        assert_eq!(char_count("   "), 0);
    }
}
