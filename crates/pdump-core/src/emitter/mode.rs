//! Permission bits for files created by the file sink.

use std::fmt;

use crate::error::ConfigError;

/// Unix permission bits applied only when a dump file is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(u32);

impl FileMode {
    const MAX: u32 = 0o7777;

    /// Parses an octal mode such as `644`, `0644` or `0o600`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidFileMode(raw.to_string());
        let digits = raw.trim();
        let digits = digits
            .strip_prefix("0o")
            .or_else(|| digits.strip_prefix("0O"))
            .unwrap_or(digits);
        if digits.is_empty()
            || digits.len() > 4
            || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
        {
            return Err(invalid());
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| invalid())?;
        if bits > Self::MAX {
            return Err(invalid());
        }
        Ok(FileMode(bits))
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for FileMode {
    fn default() -> Self {
        FileMode(0o644)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(FileMode::parse("644").unwrap().bits(), 0o644);
        assert_eq!(FileMode::parse("0600").unwrap().bits(), 0o600);
        assert_eq!(FileMode::parse("0o640").unwrap().bits(), 0o640);
        assert_eq!(FileMode::parse(" 755 ").unwrap().bits(), 0o755);
        assert_eq!(FileMode::parse("1777").unwrap().bits(), 0o1777);
    }

    #[test]
    fn rejects_non_octal() {
        for raw in ["", "0o", "648", "rw-r--r--", "12345", "-644", "+644", "0o+7"] {
            assert!(FileMode::parse(raw).is_err(), "{:?} should be rejected", raw);
        }
    }

    #[test]
    fn default_and_display() {
        assert_eq!(FileMode::default().bits(), 0o644);
        assert_eq!(FileMode::default().to_string(), "0644");
    }
}
