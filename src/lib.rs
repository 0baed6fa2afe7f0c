//! Version extraction for EFI driver and option ROM images.
//!
//! Images are searched for known byte signatures; each signature carries a
//! small decode program that reads version fields at fixed distances from
//! the match and formats them.

/// Signature catalog and built-in rules
pub mod catalog;
pub mod config;
/// Decode program interpreter
pub mod decode;
pub mod error;
/// Image loading
pub mod io;
pub mod logging;
pub mod scan;
/// Byte pattern search
pub mod search;

pub use catalog::{Catalog, Rule};
pub use config::ScanConfig;
pub use decode::{decode, DecodeError, VersionRecord};
pub use error::{ExitStatus, FwverError, Result};
pub use scan::{count, scan, scan_many, TextRule};
