//! Configuration for loading images and presenting results.

use serde::{Deserialize, Serialize};

use crate::io::IoLimits;

/// How a version record is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The padded `label - version` line.
    #[default]
    Line,
    /// One JSON object per record.
    Json,
}

/// How diagnostics are logged to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Master configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Limits applied when loading the image.
    pub io: IoLimits,
    pub output: OutputFormat,
    pub log: LogFormat,
}

impl ScanConfig {
    /// Override the maximum file size, keeping other limits.
    pub fn with_max_file_size(mut self, max_file_size: Option<u64>) -> Self {
        if let Some(limit) = max_file_size {
            self.io.max_file_size = limit;
        }
        self
    }
}
