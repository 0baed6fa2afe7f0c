//! Scan driver plus the single-rule extractor and occurrence counter.
//!
//! The driver walks the catalog in priority order. The first rule whose
//! signature occurs decides the outcome: its program either yields a record
//! or fails, and a failure ends the scan without trying later rules.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::decode::{self, Field, Step, VersionRecord};
use crate::error::{FwverError, Result};
use crate::search::Finder;

/// Scan `buffer` against `catalog`.
///
/// Returns `Ok(None)` when no signature occurs anywhere, and an error when
/// a signature matched but its program could not produce a version.
pub fn scan(buffer: &[u8], catalog: &Catalog<'_>) -> Result<Option<VersionRecord>> {
    for compiled in catalog.iter() {
        let Some(offset) = compiled.finder.find(buffer) else {
            continue;
        };
        let family = compiled.rule.name;
        debug!(family, offset, "signature matched");
        return match decode::decode(buffer, offset, compiled.rule.program) {
            Ok(record) => Ok(Some(record)),
            Err(source) => {
                warn!(family, offset, error = %source, "signature matched but decoding failed");
                Err(FwverError::decode(family, source))
            }
        };
    }
    debug!(size = buffer.len(), "no catalog signature found");
    Ok(None)
}

/// Scan independent buffers in parallel. Results keep the input order and
/// equal what [`scan`] returns for each buffer.
pub fn scan_many<B>(buffers: &[B], catalog: &Catalog<'_>) -> Vec<Result<Option<VersionRecord>>>
where
    B: AsRef<[u8]> + Sync,
{
    buffers
        .par_iter()
        .map(|buffer| scan(buffer.as_ref(), catalog))
        .collect()
}

/// A caller-supplied rule: text found at a fixed offset from a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    /// Printed before the extracted text.
    pub prefix: String,
    pub pattern: Vec<u8>,
    /// Signed distance from the match to the first text byte.
    pub offset: isize,
    /// Byte that ends the text; NUL always does.
    pub end_marker: u8,
    /// Upper bound on the text length in bytes.
    pub max_length: usize,
}

impl TextRule {
    /// Locate the first occurrence of the pattern and extract the text.
    ///
    /// `Ok(None)` means the pattern does not occur.
    pub fn extract(&self, buffer: &[u8]) -> Result<Option<VersionRecord>> {
        if self.pattern.is_empty() {
            return Err(FwverError::InvalidArgument(
                "pattern must not be empty".to_string(),
            ));
        }
        if self.max_length == 0 {
            return Err(FwverError::InvalidArgument(
                "maximum length must be non-zero".to_string(),
            ));
        }
        let Some(offset) = Finder::new(&self.pattern).find(buffer) else {
            return Ok(None);
        };
        let program = [
            Step::Seek(self.offset),
            Step::Field(Field::text(0, self.max_length, self.end_marker)),
            Step::Emit {
                label: &self.prefix,
                template: "{}",
            },
        ];
        debug!(offset, "pattern matched");
        decode::decode(buffer, offset, &program)
            .map(Some)
            .map_err(|source| FwverError::decode("text rule", source))
    }
}

/// Number of occurrences of `pattern`, overlapping ones included.
pub fn count(buffer: &[u8], pattern: &[u8]) -> usize {
    Finder::new(pattern).count(buffer)
}
