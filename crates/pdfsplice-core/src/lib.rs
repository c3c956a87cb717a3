//! PDF page-range parsing and page-set transformation.
//!
//! Everything operates on in-memory byte buffers: callers hand in uploaded
//! PDF bytes and get serialized PDF bytes back. Two operations are provided:
//!
//! - [`concatenate`]: append the pages of several documents into one.
//! - [`extract`]: produce one output document per requested page range.
//!
//! Range text such as `"1-3, 5, 8-10"` is parsed by [`parse_ranges`], which
//! keeps ranges in the order they were written and never merges or
//! deduplicates them; each range maps to exactly one output document.
//!
//! Both operations are pure, synchronous and request-scoped: no retained
//! state, no filesystem or network side effects.

pub mod command;
pub mod concat;
pub mod document;
pub mod error;
pub mod extract;
pub mod ranges;

#[cfg(test)]
pub(crate) mod testpdf;

pub use command::{SpliceCommand, SpliceMetrics, SpliceOutcome};
pub use concat::concatenate;
pub use document::SourceDocument;
pub use error::SpliceError;
pub use extract::{extract, extract_bytes, OutputDocument};
pub use ranges::{parse_ranges, OutOfRangePolicy, PageRange};

/// Parse PDF bytes and return the page count.
pub fn page_count(bytes: &[u8]) -> Result<u32, SpliceError> {
    Ok(SourceDocument::from_bytes(bytes)?.page_count())
}
