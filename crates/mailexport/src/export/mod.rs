//! Export of mail folders into a timestamp-organized directory tree.

pub mod driver;
pub mod folder;

pub use driver::{ExportOptions, ExportSummary, Exporter, FolderSummary};
pub use folder::{export_folder, FolderExporter, FolderReport, CONTENT_FILE};
