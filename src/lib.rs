// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. document::PaperConfig)
    clippy::module_name_repetitions
)]

//! # Paperset
//!
//! Typesets a markdown document as a print-style paper.
//!
//! Paperset extends markdown with a few custom tags:
//! - `<mdConfig />` for page settings (columns, padding, fonts, ...)
//! - `<mdCitation>` for numbered references
//! - `<mdCaption>` for figure and table captions, numbered per type
//! - `<mdFootnote>` for notes
//!
//! Headings are numbered hierarchically (`1`, `1.1`, `1.2`, `2`, ...); a
//! heading starting with `[!]` is left unnumbered.
//!
//! ## Architecture
//!
//! A [`document::Pipeline`] parses the markdown and runs the directive and
//! heading passes over the tree, producing a [`document::Paper`]. The
//! session follows The Elm Architecture (TEA):
//! - **Model**: Session state
//! - **Message**: Render requests and results
//! - **Update**: Pure state transitions
//!
//! ## Modules
//!
//! - [`app`]: Session state and render loop
//! - [`document`]: Markdown parsing and the transform pipeline
//! - [`highlight`]: Syntax highlighting
//! - [`layout`]: Pages and the HTML page shell
//! - [`watcher`]: File watching
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod document;
pub mod highlight;
pub mod layout;
pub mod perf;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Paper, PaperConfig, Pipeline, PipelineError};
    pub use crate::layout::{Page, paginate, render_document};
}
