//! Configuration errors. Detected once at load/validate time and never per request.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `content` is empty or missing.
    #[error("content must be set")]
    MissingContent,

    /// Neither `file` nor `logger_suffix` is set, so there is nowhere to emit.
    #[error("either file or logger_suffix must be set")]
    MissingSink,

    /// `file_permissions` is not an octal mode such as `644` or `0o600`.
    #[error("invalid file_permissions {0:?}: expected an octal mode like \"644\"")]
    InvalidFileMode(String),

    /// `path` matcher must be absolute.
    #[error("invalid path matcher {0:?}: must start with '/'")]
    InvalidPathMatcher(String),

    /// A key in a `[[dump]]` entry that no option recognises.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid listen address {0:?}")]
    InvalidListen(String),

    #[error("invalid response status {0}")]
    InvalidStatus(u16),

    /// A `[[dump]]` entry failed validation; `index` is its position in the file.
    #[error("dump #{index}: {cause}")]
    Dump {
        index: usize,
        cause: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_dump(self, index: usize) -> Self {
        ConfigError::Dump {
            index,
            cause: Box::new(self),
        }
    }
}
