use std::io::Write;

use anyhow::{Context, Result};

use crate::app::{App, Input, Job, Message, Model, OutputFormat};
use crate::document::{Pipeline, prepare_content};
use crate::highlight::{PlainHighlighter, SyntectHighlighter, theme_css};
use crate::layout::{RenderOptions, render_document};

impl App {
    pub(super) fn make_pipeline(&self) -> Pipeline {
        let pipeline = if self.highlight_enabled {
            Pipeline::new(Box::new(SyntectHighlighter))
        } else {
            Pipeline::new(Box::new(PlainHighlighter))
        };
        pipeline.with_options(self.parse_options)
    }

    /// Run a job to completion and report the outcome.
    pub(super) fn execute(pipeline: &Pipeline, job: Job) -> Message {
        let _scope = crate::perf::scope("app.execute");
        let result = read_input(job.input).and_then(|markdown| {
            pipeline
                .run(&markdown)
                .context("Failed to render document")
        });
        Message::Finished {
            generation: job.generation,
            result: result.map_err(|err| format!("{err:#}")),
        }
    }

    /// Render the model's paper in the configured format.
    pub(super) fn render_output(&self, model: &Model) -> Result<Option<String>> {
        let Some(paper) = &model.paper else {
            return Ok(None);
        };
        let output = match self.format {
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(&paper.summary())
                    .context("Failed to serialize paper")?;
                json.push('\n');
                json
            }
            OutputFormat::Html => {
                let code_css = if self.highlight_enabled {
                    theme_css(self.background)
                } else {
                    String::new()
                };
                let options = RenderOptions {
                    title: self
                        .file_path
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned()),
                    code_css,
                };
                render_document(paper, &model.pages, &options)
            }
        };
        Ok(Some(output))
    }

    pub(super) fn write_output(&self, model: &Model) -> Result<()> {
        let Some(output) = self.render_output(model)? else {
            return Ok(());
        };
        let _scope = crate::perf::scope("app.write_output");
        if let Some(path) = &self.output {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "paper written");
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
        Ok(())
    }
}

fn read_input(input: Input) -> Result<String> {
    match input {
        Input::Text(text) => Ok(text),
        Input::File(path) => {
            let _scope = crate::perf::scope("app.read_file");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(prepare_content(&path, content)?)
        }
    }
}
