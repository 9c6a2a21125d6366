//! The document transform pipeline.
//!
//! A run parses the markdown, then applies the directive and heading passes
//! in a fixed order over one owned tree. All numbering state lives in a
//! [`RunState`] created per run, so a [`Pipeline`] can be reused freely.

use super::directives::{
    DirectiveCounters, extract_config, process_captions, process_citations, process_footnotes,
};
use super::error::PipelineError;
use super::headings::{HeadingCounters, number_headings};
use super::parser::{ParseOptions, parse};
use super::types::Paper;
use crate::highlight::{Highlighter, SyntectHighlighter};

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Parsed,
    ConfigExtracted,
    CitationsProcessed,
    CaptionsProcessed,
    FootnotesProcessed,
    HeadingsNumbered,
    Done,
}

impl Stage {
    /// The stage that follows this one. `Done` is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::Parsed,
            Self::Parsed => Self::ConfigExtracted,
            Self::ConfigExtracted => Self::CitationsProcessed,
            Self::CitationsProcessed => Self::CaptionsProcessed,
            Self::CaptionsProcessed => Self::FootnotesProcessed,
            Self::FootnotesProcessed => Self::HeadingsNumbered,
            Self::HeadingsNumbered | Self::Done => Self::Done,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsed => "parsed",
            Self::ConfigExtracted => "config-extracted",
            Self::CitationsProcessed => "citations-processed",
            Self::CaptionsProcessed => "captions-processed",
            Self::FootnotesProcessed => "footnotes-processed",
            Self::HeadingsNumbered => "headings-numbered",
            Self::Done => "done",
        }
    }
}

/// Per-run numbering state.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub stage: Stage,
    pub directives: DirectiveCounters,
    pub headings: HeadingCounters,
}

impl RunState {
    /// Move to the next stage, reporting how many records the finished one
    /// produced.
    fn advance(&mut self, records: usize) {
        self.stage = self.stage.next();
        tracing::debug!(stage = self.stage.name(), records, "pipeline stage finished");
    }
}

/// Turns markdown into a [`Paper`].
pub struct Pipeline {
    highlighter: Box<dyn Highlighter>,
    options: ParseOptions,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Box::new(SyntectHighlighter))
    }
}

impl Pipeline {
    pub fn new(highlighter: Box<dyn Highlighter>) -> Self {
        Self {
            highlighter,
            options: ParseOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Run every stage over `markdown`.
    ///
    /// Fails only when the markdown cannot be turned into a tree; directive
    /// problems fall back to defaults.
    pub fn run(&self, markdown: &str) -> Result<Paper, PipelineError> {
        let span = tracing::info_span!("pipeline", bytes = markdown.len());
        let _enter = span.enter();
        let _scope = crate::perf::scope("pipeline.run");

        let mut state = RunState::default();

        let nodes = parse(markdown, &self.options, self.highlighter.as_ref())?;
        state.advance(nodes.len());

        let (nodes, config) = extract_config(nodes);
        state.advance(1);

        let (nodes, citations) = process_citations(nodes, &mut state.directives);
        state.advance(citations.len());

        let (nodes, captions) = process_captions(nodes, &mut state.directives);
        state.advance(captions.len());

        let (nodes, footnotes) = process_footnotes(nodes);
        state.advance(footnotes.len());

        let (nodes, headings) = number_headings(nodes, &mut state.headings);
        state.advance(headings.len());

        state.stage = Stage::Done;
        tracing::debug!(stage = state.stage.name(), "pipeline finished");

        Ok(Paper {
            nodes,
            config,
            citations,
            captions,
            footnotes,
            headings,
        })
    }
}
