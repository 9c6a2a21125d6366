use std::path::PathBuf;

use crate::app::Model;
use crate::document::Paper;
use crate::layout::paginate;

/// What asked for a (re-)render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Markdown handed over directly
    Initial(String),
    /// A file was dropped onto the session; `None` when nothing usable was dropped
    FileDropped(Option<PathBuf>),
    /// A file was chosen explicitly; `None` when the choice was cancelled
    FilePicked(Option<PathBuf>),
    /// The current source changed on disk
    FileChanged,
}

/// All possible events in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Start a pipeline run
    Begin(Trigger),
    /// A run finished
    Finished {
        generation: u64,
        result: Result<Paper, String>,
    },
}

/// Where a job's markdown comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    File(PathBuf),
}

/// Work the runner must perform, reported back with [`Message::Finished`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub generation: u64,
    pub input: Input,
}

/// Apply a message to the model, returning the job to run, if any.
pub fn update(mut model: Model, msg: Message) -> (Model, Option<Job>) {
    match msg {
        Message::Begin(trigger) => {
            if model.processing {
                tracing::warn!(?trigger, "render already in progress, ignoring trigger");
                return (model, None);
            }
            let input = match trigger {
                Trigger::Initial(text) => Input::Text(text),
                Trigger::FileDropped(Some(path)) | Trigger::FilePicked(Some(path)) => {
                    model.source = Some(path.clone());
                    Input::File(path)
                }
                Trigger::FileDropped(None) | Trigger::FilePicked(None) => return (model, None),
                Trigger::FileChanged => match &model.source {
                    Some(path) => Input::File(path.clone()),
                    None => return (model, None),
                },
            };
            model.processing = true;
            model.generation += 1;
            let job = Job {
                generation: model.generation,
                input,
            };
            (model, Some(job))
        }
        Message::Finished { generation, result } => {
            if generation != model.generation {
                tracing::debug!(generation, current = model.generation, "discarding stale result");
                return (model, None);
            }
            model.processing = false;
            match result {
                Ok(paper) => {
                    model.pages = paginate(&paper);
                    model.paper = Some(paper);
                    model.last_error = None;
                }
                Err(err) => {
                    tracing::error!(generation, error = %err, "render failed");
                    model.last_error = Some(err);
                }
            }
            (model, None)
        }
    }
}
