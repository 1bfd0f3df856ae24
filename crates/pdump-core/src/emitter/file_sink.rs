//! Append-only file sink guarded by a per-instance mutex.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;

use super::FileMode;

#[derive(Debug, Error)]
pub enum FileSinkError {
    #[error("failed to open file: {0}")]
    Open(#[source] io::Error),
    #[error("failed to write to file: {0}")]
    Write(#[source] io::Error),
}

/// Appends lines to files. Each `append_line` is one open + write + close cycle.
///
/// Writes through the same sink are serialized. Two sinks pointing at the same
/// path are not coordinated and may interleave.
#[derive(Debug, Default)]
pub struct FileSink {
    mode: FileMode,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(mode: FileMode) -> Self {
        Self {
            mode,
            lock: Mutex::new(()),
        }
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Append `line` plus a trailing newline to `path`, creating the file with
    /// this sink's mode if it does not exist. Existing files keep their permissions.
    pub fn append_line(&self, path: &Path, line: &str) -> Result<(), FileSinkError> {
        // A poisoned lock only means another writer panicked mid-write; the file is still usable.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut file = self
            .open_options()
            .open(path)
            .map_err(FileSinkError::Open)?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes()).map_err(FileSinkError::Write)?;
        Ok(())
    }

    fn open_options(&self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        opts.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(self.mode.bits());
        }
        opts
    }
}
