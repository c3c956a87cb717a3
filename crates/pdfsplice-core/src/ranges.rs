//! Page-range expression parsing.
//!
//! A range expression is a comma-separated list of tokens, each either a
//! single page number (`"5"`) or an inclusive span (`"2-4"`). Parsing keeps
//! ranges in the order they were written: extraction emits one output
//! document per range, so order, overlap, and duplicates are all significant
//! and preserved.

use serde::{Deserialize, Serialize};

use crate::error::SpliceError;

/// An inclusive, 1-based page interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Label used for output naming, e.g. `"2-4"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// What to do with a range whose end lies past the last page.
///
/// Source tools disagree here: some clamp the end to the last page, some
/// refuse the whole request. Both behaviors are reachable; the permissive
/// clamp is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    #[default]
    Clamp,
    Reject,
}

/// Parse a range expression like `"1-3, 5, 8-10"` against a document of
/// `total_pages` pages.
///
/// Validation is fail-fast: the first invalid token aborts the call with an
/// error naming that token. Empty tokens (doubled or trailing commas) are
/// skipped without error. Whitespace around tokens and around the hyphen is
/// ignored. The result preserves input order and is never sorted, merged, or
/// deduplicated.
pub fn parse_ranges(
    text: &str,
    total_pages: u32,
    policy: OutOfRangePolicy,
) -> Result<Vec<PageRange>, SpliceError> {
    let mut ranges = Vec::new();

    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (start, end) = if let Some((lhs, rhs)) = token.split_once('-') {
            (parse_page(lhs, token)?, parse_page(rhs, token)?)
        } else {
            let page = parse_page(token, token)?;
            (page, page)
        };

        if start < 1 {
            return Err(out_of_bounds(token, total_pages, "page numbers start at 1"));
        }
        if start > end {
            return Err(out_of_bounds(
                token,
                total_pages,
                &format!("start {} is after end {}", start, end),
            ));
        }
        if start > total_pages {
            return Err(out_of_bounds(
                token,
                total_pages,
                &format!("start {} is past the last page", start),
            ));
        }

        let end = if end <= total_pages {
            end
        } else {
            match policy {
                OutOfRangePolicy::Clamp => total_pages,
                OutOfRangePolicy::Reject => {
                    return Err(out_of_bounds(
                        token,
                        total_pages,
                        &format!("end {} is past the last page", end),
                    ));
                }
            }
        };

        ranges.push(PageRange::new(start, end));
    }

    Ok(ranges)
}

fn parse_page(text: &str, token: &str) -> Result<u32, SpliceError> {
    text.trim().parse().map_err(|_| SpliceError::MalformedToken {
        token: token.to_string(),
    })
}

fn out_of_bounds(token: &str, total_pages: u32, reason: &str) -> SpliceError {
    SpliceError::OutOfBounds {
        token: token.to_string(),
        total_pages,
        reason: reason.to_string(),
    }
}
