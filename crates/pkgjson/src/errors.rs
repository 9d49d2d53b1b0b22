use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating, or editing a package.json
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("package.json path does not exist: \"{}\"", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse package.json: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Failed to decode package.json: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot set path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ManifestError>;

/// A single field that did not satisfy the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Dot-joined location of the field, e.g. `repository.url`; empty for the document root
    pub path: String,
    pub expected: String,
    pub found: &'static str,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<document>"
        } else {
            self.path.as_str()
        };
        write!(f, "{}: expected {}, found {}", path, self.expected, self.found)
    }
}

/// Every schema failure found in one pass over the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    failures: Vec<FieldFailure>,
}

impl ValidationError {
    pub fn new(failures: Vec<FieldFailure>) -> Self {
        ValidationError { failures }
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    /// The dot-joined paths of all failing fields, in document order
    pub fn paths(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.failures.len())?;
        for (idx, failure) in self.failures.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
