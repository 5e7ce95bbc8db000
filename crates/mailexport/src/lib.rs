pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod sanitize;
pub mod source;
pub mod storage;

pub use config::{load_config, ExportConfig};
pub use error::{AttachmentError, ConfigError, ExportError, Result, SourceError, StorageError};
pub use export::{
    export_folder, ExportOptions, ExportSummary, Exporter, FolderExporter, FolderReport,
};
pub use source::{
    AccountStore, Attachment, ItemCollection, ItemKind, ItemType, LocalSession, MailFolder,
    MailItem, MailMessage, MailSession, TimestampZone,
};
pub use storage::{ensure_directory, save_attachments};
