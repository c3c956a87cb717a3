//! Wire-level commands for callers that ship work as JSON.

use serde::{Deserialize, Serialize};

use crate::concat::concatenate;
use crate::error::SpliceError;
use crate::extract::{extract_bytes, OutputDocument};
use crate::ranges::{OutOfRangePolicy, PageRange};

/// A merge or split request in serialized form.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SpliceCommand {
    Merge {
        files: Vec<Vec<u8>>,
    },
    Split {
        file: Vec<u8>,
        ranges: Vec<PageRange>,
        #[serde(default)]
        on_out_of_range: OutOfRangePolicy,
    },
}

/// Result of executing a [`SpliceCommand`].
#[derive(Debug, Clone)]
pub struct SpliceOutcome {
    /// One document for a merge, one per range for a split.
    pub documents: Vec<OutputDocument>,
    pub metrics: SpliceMetrics,
}

/// Size and page accounting reported alongside a successful operation.
#[derive(Debug, Clone, Serialize)]
pub struct SpliceMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
}

impl SpliceCommand {
    /// Run the command against the in-memory transformations.
    pub fn execute(self) -> Result<SpliceOutcome, SpliceError> {
        match self {
            SpliceCommand::Merge { files } => {
                let input_size = files.iter().map(Vec::len).sum();
                let data = concatenate(&files)?;
                let page_count = crate::page_count(&data)?;
                let metrics = SpliceMetrics {
                    input_size_bytes: input_size,
                    output_size_bytes: data.len(),
                    page_count,
                };
                Ok(SpliceOutcome {
                    documents: vec![OutputDocument {
                        label: "merged".to_string(),
                        data,
                        page_count,
                    }],
                    metrics,
                })
            }
            SpliceCommand::Split {
                file,
                ranges,
                on_out_of_range,
            } => {
                let input_size = file.len();
                let documents = extract_bytes(&file, &ranges, on_out_of_range)?;
                let metrics = SpliceMetrics {
                    input_size_bytes: input_size,
                    output_size_bytes: documents.iter().map(|d| d.data.len()).sum(),
                    page_count: documents.iter().map(|d| d.page_count).sum(),
                };
                Ok(SpliceOutcome { documents, metrics })
            }
        }
    }
}
