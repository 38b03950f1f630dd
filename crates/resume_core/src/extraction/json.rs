//! Extractor for documents that already hold upstream JSON output.
//!
//! Used when extraction ran out of process and its responses were saved to
//! disk, and by the CLI import command.

use crate::config::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::extraction::payload::ExtractionPayload;
use crate::extraction::{DocumentExtractor, ExtractionError, SourceDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPayloadExtractor {
    max_document_bytes: usize,
}

impl JsonPayloadExtractor {
    pub fn new(max_document_bytes: usize) -> Self {
        Self { max_document_bytes }
    }
}

impl Default for JsonPayloadExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DOCUMENT_BYTES)
    }
}

impl DocumentExtractor for JsonPayloadExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<ExtractionPayload, ExtractionError> {
        if document.bytes.len() > self.max_document_bytes {
            return Err(ExtractionError::TooLarge {
                size: document.bytes.len(),
                limit: self.max_document_bytes,
            });
        }
        let text = std::str::from_utf8(&document.bytes).map_err(|_| ExtractionError::NotUtf8)?;
        Ok(ExtractionPayload::from_json(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonPayloadExtractor;
    use crate::extraction::{DocumentExtractor, ExtractionError, SourceDocument};

    #[test]
    fn rejects_documents_over_limit() {
        let extractor = JsonPayloadExtractor::new(4);
        let err = extractor
            .extract(&SourceDocument::new("big.json", b"{}    ".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::TooLarge { size: 6, limit: 4 }));
    }

    #[test]
    fn rejects_non_utf8_bytes() {
        let err = JsonPayloadExtractor::default()
            .extract(&SourceDocument::new("bin", vec![0xff, 0xfe]))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotUtf8));
    }

    #[test]
    fn unparsable_json_is_payload_error() {
        let err = JsonPayloadExtractor::default()
            .extract(&SourceDocument::new("broken.json", b"{ not json".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Payload(_)));
    }
}
