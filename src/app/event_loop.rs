use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::app::{App, Message, Model, Trigger, update};
use crate::document::Pipeline;
use crate::watcher::{DEFAULT_DEBOUNCE, FileWatcher};

/// How often the watch loop polls for file changes.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl App {
    /// Render the file, then keep re-rendering on change in watch mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the first render fails or the output cannot be
    /// written. In watch mode, failures of later renders are logged and the
    /// previous output is kept.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let pipeline = self.make_pipeline();

        let model = Self::process(
            &pipeline,
            Model::new(None),
            Trigger::FilePicked(Some(self.file_path.clone())),
        );
        if let Some(err) = &model.last_error {
            bail!("{err}");
        }
        self.write_output(&model)?;

        if !self.watch_enabled {
            return Ok(());
        }
        self.watch(&pipeline, model)
    }

    fn watch(&self, pipeline: &Pipeline, mut model: Model) -> Result<()> {
        let mut watcher = FileWatcher::new(&self.file_path, DEFAULT_DEBOUNCE)
            .with_context(|| format!("Failed to watch {}", self.file_path.display()))?;
        tracing::info!(file = %watcher.document().display(), "watching for changes");

        loop {
            if watcher.take_change_ready() {
                let generation = model.generation;
                model = Self::process(pipeline, model, Trigger::FileChanged);
                if model.generation != generation && model.last_error.is_none() {
                    self.write_output(&model)?;
                }
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Drive one trigger through `update`, running the job it yields.
    pub(super) fn process(pipeline: &Pipeline, model: Model, trigger: Trigger) -> Model {
        let (model, job) = update(model, Message::Begin(trigger));
        let Some(job) = job else {
            return model;
        };
        let finished = Self::execute(pipeline, job);
        let (model, _) = update(model, finished);
        model
    }
}
