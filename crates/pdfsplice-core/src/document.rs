//! Loaded source documents.

use lopdf::Document;

use crate::error::SpliceError;

/// A source PDF loaded for the duration of one request.
///
/// Wraps the parsed object model so a document uploaded once can back several
/// extractions without re-parsing. The source itself is never mutated;
/// transformations clone what they need.
pub struct SourceDocument {
    pub(crate) doc: Document,
}

impl SourceDocument {
    /// Parse raw uploaded bytes. Corrupted or otherwise unparseable input
    /// surfaces as [`SpliceError::SourceRead`]; nothing is retried.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SpliceError> {
        let doc =
            Document::load_mem(bytes).map_err(|e| SpliceError::SourceRead(e.to_string()))?;
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }
}
