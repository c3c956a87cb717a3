use thiserror::Error;

/// Errors produced by range parsing and page-set transformations.
///
/// All failures are terminal for the current call; nothing is retried and no
/// partial result is returned alongside an error.
#[derive(Error, Debug)]
pub enum SpliceError {
    /// A range token was not an integer or integer-hyphen-integer.
    #[error("malformed range token '{token}'")]
    MalformedToken { token: String },

    /// A range fell outside `1..=total_pages`, or had start after end.
    #[error("range '{token}' out of bounds: {reason} (document has {total_pages} pages)")]
    OutOfBounds {
        token: String,
        total_pages: u32,
        reason: String,
    },

    /// Input bytes could not be parsed as a PDF document.
    #[error("failed to read source document: {0}")]
    SourceRead(String),

    /// The PDF layer failed to serialize an output document.
    #[error("failed to save output document: {0}")]
    Save(String),
}
