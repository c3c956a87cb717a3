//! Page extraction: one output document per requested range.

use lopdf::Document;

use crate::document::SourceDocument;
use crate::error::SpliceError;
use crate::ranges::{OutOfRangePolicy, PageRange};

/// One extraction result, labelled after the range that produced it.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    /// Label of the originating range, e.g. `"2-4"`.
    pub label: String,
    /// Serialized PDF bytes.
    pub data: Vec<u8>,
    pub page_count: u32,
}

/// Produce one output document per range, in the order the ranges were given.
///
/// Ranges may overlap or repeat; each gets its own output and none are merged
/// or reordered. Within an output the selected pages keep their source order.
/// A range *ending* past the last page is clamped under
/// [`OutOfRangePolicy::Clamp`] and refused under [`OutOfRangePolicy::Reject`];
/// a range *starting* past the last page is an error under either policy.
///
/// Outputs already produced are not rolled back when a later range fails;
/// the whole call returns the error and the caller discards the batch.
pub fn extract(
    source: &SourceDocument,
    ranges: &[PageRange],
    policy: OutOfRangePolicy,
) -> Result<Vec<OutputDocument>, SpliceError> {
    let total = source.page_count();
    let mut outputs = Vec::with_capacity(ranges.len());

    for range in ranges {
        let effective = bound_range(*range, total, policy)?;
        let data = copy_page_span(&source.doc, effective)?;
        outputs.push(OutputDocument {
            label: range.label(),
            data,
            page_count: effective.page_count(),
        });
    }

    Ok(outputs)
}

/// Load `bytes` once and extract every range from it.
pub fn extract_bytes(
    bytes: &[u8],
    ranges: &[PageRange],
    policy: OutOfRangePolicy,
) -> Result<Vec<OutputDocument>, SpliceError> {
    let source = SourceDocument::from_bytes(bytes)?;
    extract(&source, ranges, policy)
}

fn bound_range(
    range: PageRange,
    total: u32,
    policy: OutOfRangePolicy,
) -> Result<PageRange, SpliceError> {
    let reject = |reason: String| SpliceError::OutOfBounds {
        token: range.label(),
        total_pages: total,
        reason,
    };

    if range.start < 1 {
        return Err(reject("page numbers start at 1".into()));
    }
    if range.start > range.end {
        return Err(reject(format!(
            "start {} is after end {}",
            range.start, range.end
        )));
    }
    if range.start > total {
        return Err(reject(format!("start {} is past the last page", range.start)));
    }
    if range.end > total {
        return match policy {
            OutOfRangePolicy::Clamp => Ok(PageRange::new(range.start, total)),
            OutOfRangePolicy::Reject => {
                Err(reject(format!("end {} is past the last page", range.end)))
            }
        };
    }
    Ok(range)
}

/// Serialize a copy of `doc` containing only pages `range.start..=range.end`.
fn copy_page_span(doc: &Document, range: PageRange) -> Result<Vec<u8>, SpliceError> {
    let total = doc.get_pages().len() as u32;
    let mut out = doc.clone();

    // Deleting from the back keeps earlier page numbers stable.
    let discard: Vec<u32> = (1..=total)
        .rev()
        .filter(|page| *page < range.start || *page > range.end)
        .collect();
    for page in discard {
        out.delete_pages(&[page]);
    }

    out.prune_objects();
    out.compress();

    let mut buffer = Vec::new();
    out.save_to(&mut buffer)
        .map_err(|e| SpliceError::Save(e.to_string()))?;
    Ok(buffer)
}
