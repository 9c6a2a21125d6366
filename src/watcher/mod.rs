//! Change detection for the source document in watch mode.
//!
//! notify delivers raw file system events; [`FileWatcher`] filters them down
//! to the watched document and debounces bursts (editors often write a file
//! in several steps) into a single re-render.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Debounce used by the `--watch` loop.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches one document and reports debounced changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
    directory: PathBuf,
    document: PathBuf,
    document_name: Option<OsString>,
    debounce: Duration,
    changed_at: Option<Instant>,
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// The parent directory is watched rather than the file itself, so
    /// editors that save by replacing the file are still seen.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> notify::Result<Self> {
        // Backends report canonical paths.
        let document = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let document_name = document.file_name().map(std::ffi::OsStr::to_os_string);
        let directory = parent_directory(&document);

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;
        tracing::debug!(document = %document.display(), "watching for changes");

        Ok(Self {
            _watcher: watcher,
            events,
            directory,
            document,
            document_name,
            debounce,
            changed_at: None,
        })
    }

    /// Canonical path of the watched document.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Drain pending events; true once a change has settled for the
    /// debounce period.
    pub fn take_change_ready(&mut self) -> bool {
        let mut relevant = 0u32;
        let mut ignored = 0u32;
        while let Ok(event) = self.events.try_recv() {
            match event {
                Ok(event) if self.concerns_document(&event) => relevant += 1,
                Ok(event) => {
                    ignored += 1;
                    tracing::trace!(kind = ?event.kind, paths = ?event.paths, "ignoring event");
                }
                Err(err) => tracing::warn!(%err, "file watcher error"),
            }
        }

        if relevant + ignored > 0 {
            tracing::debug!(relevant, ignored, "file events received");
        }
        if relevant > 0 {
            self.changed_at = Some(Instant::now());
        }

        match self.changed_at {
            Some(changed_at) if changed_at.elapsed() >= self.debounce => {
                self.changed_at = None;
                true
            }
            _ => false,
        }
    }

    fn concerns_document(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.directory
                || path == &self.document
                || self
                    .document_name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

fn parent_directory(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
