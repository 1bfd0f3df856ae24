//! Content emitter: resolve a template per request and dump it to a file and/or a logger.
//!
//! The emitter never fails the request it instruments. Empty content is skipped
//! with a warning, file errors are logged and dropped, and the caller always
//! continues with the next pipeline stage.

mod file_sink;
mod mode;

pub use file_sink::{FileSink, FileSinkError};
pub use mode::FileMode;

use std::path::{Path, PathBuf};

use crate::config::EmitterConfig;
use crate::error::ConfigError;
use crate::placeholder::Replacer;

/// Base logger name; sub-loggers are `<BASE_LOGGER>.<logger_suffix>`.
pub const BASE_LOGGER: &str = "http.handlers.placeholder_dump";

/// What a single `handle` call did. Informational only; it never asks the caller to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// Resolved content was empty; no sink ran.
    Skipped,
    Emitted {
        /// Trimmed resolved content sent to every configured sink.
        content: String,
        /// True when a record went to the sub-logger.
        logged: bool,
        /// Outcome of the file sink, if a file template is configured.
        file: Option<FileOutcome>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written(PathBuf),
    /// The path template resolved to an empty string.
    EmptyPath,
    /// Open or write failed; the error was logged.
    Failed(PathBuf),
}

/// One configured handler instance.
#[derive(Debug)]
pub struct ContentEmitter {
    content: String,
    file: Option<String>,
    logger_name: Option<String>,
    sink: FileSink,
}

impl ContentEmitter {
    /// Validate `cfg` and build an emitter with its own file mutex.
    pub fn new(cfg: &EmitterConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            content: cfg.content.clone(),
            file: cfg.file().map(str::to_string),
            logger_name: cfg
                .logger_suffix()
                .map(|suffix| format!("{}.{}", BASE_LOGGER, suffix)),
            sink: FileSink::new(cfg.file_mode()?),
        })
    }

    /// Full sub-logger name, when a logger suffix is configured.
    pub fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }

    pub fn file_template(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn file_mode(&self) -> FileMode {
        self.sink.mode()
    }

    /// Resolve the content against `repl` and emit it to every configured sink.
    ///
    /// Blocks on file I/O; call from `spawn_blocking` if used from async code.
    pub fn handle(&self, repl: &Replacer) -> Emission {
        let resolved = repl.replace_all(&self.content, "");
        let content = resolved.trim();

        if content.is_empty() {
            tracing::warn!(logger = BASE_LOGGER, "resolved content is empty; skipping processing");
            return Emission::Skipped;
        }

        let logged = match &self.logger_name {
            Some(name) => {
                tracing::info!(logger = name.as_str(), content, "logging resolved content");
                true
            }
            None => false,
        };

        let file = self
            .file
            .as_deref()
            .map(|template| self.write_file(repl, template, content));

        Emission::Emitted {
            content: content.to_string(),
            logged,
            file,
        }
    }

    fn write_file(&self, repl: &Replacer, template: &str, content: &str) -> FileOutcome {
        let resolved = repl.replace_all(template, "");
        if resolved.is_empty() {
            tracing::debug!(logger = BASE_LOGGER, template, "file path resolved to empty; not writing");
            return FileOutcome::EmptyPath;
        }
        let path = Path::new(&resolved);
        match self.sink.append_line(path, content) {
            Ok(()) => {
                tracing::debug!(
                    logger = BASE_LOGGER,
                    file = %path.display(),
                    content,
                    "wrote content to file"
                );
                FileOutcome::Written(path.to_path_buf())
            }
            Err(e) => {
                tracing::error!(logger = BASE_LOGGER, file = %path.display(), "{}", e);
                FileOutcome::Failed(path.to_path_buf())
            }
        }
    }
}
