use serde::{Deserialize, Serialize};

pub use crate::source::TimestampZone;

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Root of the mail profile to export from. May be left out of a file
    /// and supplied on the command line; validation rejects it empty.
    #[serde(default)]
    pub source_directory: String,
    /// Base directory of the export tree.
    #[serde(default)]
    pub output_directory: String,
    /// Regex patterns selecting stores by name. Empty selects every store.
    #[serde(default)]
    pub stores: Vec<String>,
    /// Regex patterns selecting folders by display path (`Parent/Child`).
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub timestamps: TimestampZone,
    #[serde(default)]
    pub report_directory_failures: bool,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl ExportConfig {
    pub fn new(source_directory: impl Into<String>, output_directory: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            source_directory: source_directory.into(),
            output_directory: output_directory.into(),
            stores: Vec::new(),
            folders: Vec::new(),
            recursive: false,
            timestamps: TimestampZone::default(),
            report_directory_failures: false,
        }
    }
}
