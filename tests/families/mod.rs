//! Per-family decoding through the built-in catalog.

mod gop;

use fwver::{Catalog, FwverError, VersionRecord};

/// Scan with the built-in catalog and expect a record.
pub(crate) fn expect_record(image: &[u8]) -> VersionRecord {
    match fwver::scan(image, Catalog::builtin()) {
        Ok(Some(record)) => record,
        Ok(None) => panic!("no signature found"),
        Err(e) => panic!("scan failed: {e}"),
    }
}

/// Scan with the built-in catalog and expect a decode failure.
pub(crate) fn expect_error(image: &[u8]) -> FwverError {
    match fwver::scan(image, Catalog::builtin()) {
        Ok(found) => panic!("expected a failure, got {found:?}"),
        Err(e) => e,
    }
}
