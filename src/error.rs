//! Error types for fwver.
//!
//! Every failure maps onto a small process exit status, so callers can
//! tell "nothing recognised" apart from "recognised but undecodable".

use thiserror::Error;

use crate::decode::DecodeError;
use crate::io::error::IoError;
use crate::search::PatternError;

/// Process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    NotFound = 1,
    FileOpen = 2,
    FileRead = 3,
    InvalidArgument = 4,
    OutOfMemory = 5,
    UnknownVersion = 6,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Main error type for fwver operations.
#[derive(Debug, Error)]
pub enum FwverError {
    /// Malformed command line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Hex pattern parsing errors
    #[error("Pattern can't be parsed as hex: {0}")]
    Pattern(#[from] PatternError),

    /// File loading errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// No catalog signature occurs in the buffer
    #[error("No known signature found")]
    NotFound,

    /// A signature matched but its program failed
    #[error("{family}: {source}")]
    Decode {
        family: String,
        #[source]
        source: DecodeError,
    },
}

impl FwverError {
    pub fn decode(family: &str, source: DecodeError) -> Self {
        Self::Decode {
            family: family.to_string(),
            source,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::InvalidArgument(_) | Self::Pattern(_) => ExitStatus::InvalidArgument,
            Self::Io(IoError::Open { .. }) => ExitStatus::FileOpen,
            Self::Io(IoError::Read { .. } | IoError::ShortRead { .. }) => ExitStatus::FileRead,
            Self::Io(IoError::FileTooLarge { .. } | IoError::Map { .. } | IoError::Empty { .. }) => {
                ExitStatus::OutOfMemory
            }
            Self::NotFound => ExitStatus::NotFound,
            Self::Decode { source, .. } => match source {
                DecodeError::UnsupportedVariant { .. } => ExitStatus::NotFound,
                _ => ExitStatus::UnknownVersion,
            },
        }
    }
}

/// Result type alias for fwver operations
pub type Result<T> = std::result::Result<T, FwverError>;
