use std::path::PathBuf;

use crate::document::Paper;
use crate::layout::Page;

/// The complete session state.
///
/// All state lives here; [`super::update`] is the only thing that changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Document the session renders, once one has been chosen
    pub source: Option<PathBuf>,
    /// A pipeline run is in flight
    pub processing: bool,
    /// Ticket of the most recent run
    pub generation: u64,
    /// Last successfully rendered paper
    pub paper: Option<Paper>,
    pub pages: Vec<Page>,
    /// Message of the last failed run, cleared by the next success
    pub last_error: Option<String>,
}

impl Model {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub const fn has_paper(&self) -> bool {
        self.paper.is_some()
    }
}
