//! Upstream document extraction boundary.
//!
//! # Responsibility
//! - Define the contract for turning one document into an
//!   `ExtractionPayload`.
//! - Validate upstream output before it reaches reconciliation.
//!
//! # Invariants
//! - Extraction is a blocking call; no timeout or retry is applied.
//! - Any upstream failure surfaces as `ExtractionError`, never a panic.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub mod json;
pub mod payload;

use payload::{ExtractionPayload, PayloadError};

/// Raw input document handed to an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Display name used in logs and import results.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a document from disk, naming it after the file name.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Failure of the upstream extraction step for one document.
#[derive(Debug)]
pub enum ExtractionError {
    /// Document exceeds the configured size limit.
    TooLarge { size: usize, limit: usize },
    /// Upstream content is not valid UTF-8 text.
    NotUtf8,
    /// Upstream content could not be validated as a payload.
    Payload(PayloadError),
    /// Upstream service reported a failure.
    Upstream(String),
}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size, limit } => {
                write!(f, "document is {size} bytes; limit is {limit} bytes")
            }
            Self::NotUtf8 => write!(f, "extraction output is not valid UTF-8"),
            Self::Payload(err) => write!(f, "{err}"),
            Self::Upstream(message) => write!(f, "extraction service failed: {message}"),
        }
    }
}

impl Error for ExtractionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Payload(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PayloadError> for ExtractionError {
    fn from(value: PayloadError) -> Self {
        Self::Payload(value)
    }
}

/// Turns one document into a validated payload.
pub trait DocumentExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<ExtractionPayload, ExtractionError>;
}
