//! Session state and the render loop.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: The complete session state
//! - [`Message`]: Render requests and results
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Executes jobs and writes output, optionally watching
//!   the source for changes

mod effects;
mod event_loop;
mod model;
mod update;

pub use model::Model;
pub use update::{Input, Job, Message, Trigger, update};

use std::path::PathBuf;

use crate::document::ParseOptions;
use crate::highlight::HighlightBackground;

/// Output format written after each successful render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Standalone HTML page
    #[default]
    Html,
    /// Side-tables, config and body as JSON
    Json,
}

/// Renders one document, once or on every change.
#[derive(Debug, Clone)]
pub struct App {
    file_path: PathBuf,
    watch_enabled: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
    parse_options: ParseOptions,
    highlight_enabled: bool,
    background: HighlightBackground,
}

impl App {
    /// Create an application for the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            format: OutputFormat::Html,
            output: None,
            parse_options: ParseOptions::default(),
            highlight_enabled: true,
            background: HighlightBackground::Light,
        }
    }

    /// Re-render whenever the file changes.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to `path` instead of stdout.
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    pub const fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Enable or disable syntax highlighting of code blocks.
    pub const fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight_enabled = enabled;
        self
    }

    /// Background the code theme is chosen for.
    pub const fn with_background(mut self, background: HighlightBackground) -> Self {
        self.background = background;
        self
    }
}
