//! Markdown paper processing.
//!
//! This module handles:
//! - Parsing markdown with comrak into an owned node tree
//! - Extracting the `md*` directives (config, citations, captions, footnotes)
//! - Numbering headings
//!
//! [`Pipeline`] ties the passes together in their fixed order.

pub mod directives;
mod error;
pub mod headings;
pub mod html;
mod parser;
mod pipeline;
pub mod tree;
mod types;

use std::path::Path;

pub use error::{PipelineError, UnsupportedInput};
pub use parser::{ParseOptions, parse, render_html};
pub use pipeline::{Pipeline, RunState, Stage};
pub use tree::{Element, Node};
pub use types::{Caption, Citation, Footnote, Heading, Paper, PaperConfig, PaperSummary, TextAlign};

/// Extensions accepted as markdown.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd"];

/// Extensions accepted as plain text (rendered as markdown).
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Check that `file_path` is something we can typeset and hand back its
/// content.
///
/// Markdown and plain text files, including files without an extension,
/// pass through unchanged.
pub fn prepare_content(file_path: &Path, content: String) -> Result<String, UnsupportedInput> {
    if is_supported_file(file_path) {
        Ok(content)
    } else {
        Err(UnsupportedInput {
            path: file_path.to_path_buf(),
        })
    }
}

/// Returns true for markdown, plain text, and extensionless files.
pub fn is_supported_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return path.extension().is_none();
    };
    let ext = ext.to_ascii_lowercase();
    MARKDOWN_EXTENSIONS.contains(&ext.as_str()) || TEXT_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_content_passes_markdown_through() {
        let content = "# Hello\nworld".to_string();
        let result = prepare_content(Path::new("README.md"), content.clone()).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_prepare_content_accepts_markdown_variants() {
        for name in ["a.markdown", "a.mdown", "a.mkd", "a.MD"] {
            assert!(
                prepare_content(Path::new(name), String::new()).is_ok(),
                "{name} should be accepted"
            );
        }
    }

    #[test]
    fn test_prepare_content_accepts_plain_text() {
        assert!(prepare_content(Path::new("notes.txt"), String::new()).is_ok());
        assert!(prepare_content(Path::new("notes.text"), String::new()).is_ok());
        assert!(prepare_content(Path::new("NOTES"), String::new()).is_ok());
    }

    #[test]
    fn test_prepare_content_rejects_other_files() {
        let err = prepare_content(Path::new("photo.png"), String::new()).unwrap_err();
        assert_eq!(err.path, Path::new("photo.png"));
        assert!(err.to_string().contains("unsupported input photo.png"));
        assert!(prepare_content(Path::new("main.rs"), String::new()).is_err());
    }
}
