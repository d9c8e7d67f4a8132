//! Back-reference parsing
//!
//! Batch results only carry drafts, so the source issue number is recovered
//! from the URL stored in the draft's back-reference field: the last path
//! segment of `https://github.com/<owner>/<repo>/issues/<number>`.

use crate::{IssueMirrorError, Result};

/// Recover an issue number from an issue URL.
///
/// Query strings, fragments and a trailing slash are ignored. Failure is a
/// [`IssueMirrorError::LabelWrite`]: the ticket exists, only the label
/// cannot be placed.
pub fn parse_issue_number(url: &str) -> Result<u64> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segment = path.rsplit('/').next().unwrap_or_default();

    match segment.parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(IssueMirrorError::LabelWrite(format!(
            "cannot recover issue number from back-reference '{}'",
            url
        ))),
    }
}
