use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::error::{AttachmentError, StorageError};
use crate::sanitize::{directory_timestamp, display_timestamp};
use crate::source::{
    Attachment, ItemCollection, ItemKind, ItemType, MailFolder, MailItem, MailMessage,
};
use crate::storage::{ensure_directory, save_attachments, write_text_file};

/// Name of the file holding a message's subject and body.
pub const CONTENT_FILE: &str = "email_body.txt";

const PROGRESS_INTERVAL: usize = 100;

/// Outcome of exporting one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    /// Messages counted as exported.
    pub processed: usize,
    /// Skips and errors, in the order they were encountered.
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FolderExporter {
    report_directory_failures: bool,
}

impl FolderExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, a message whose directory cannot be created is recorded as
    /// an issue instead of being counted as processed.
    pub fn report_directory_failures(mut self, enabled: bool) -> Self {
        self.report_directory_failures = enabled;
        self
    }

    /// Exports every mail message of `folder` into `output_dir`.
    ///
    /// Never fails: every problem ends up in [`FolderReport::issues`].
    pub fn export<F: MailFolder>(&self, folder: &F, output_dir: &Path) -> FolderReport {
        let _span = info_span!("export_folder", folder = %folder.name()).entered();
        let mut report = FolderReport::default();

        let mut items = match folder.items() {
            Ok(items) => items,
            Err(e) => {
                warn!("Could not retrieve items from folder '{}': {}", folder.name(), e);
                report.issues.push(format!(
                    "could not retrieve items from folder '{}': {}",
                    folder.name(),
                    e
                ));
                return report;
            }
        };

        if folder.default_item_type() == ItemType::Mail {
            if let Err(e) = items.sort_by_received(true) {
                warn!("Could not sort folder '{}' by received time: {}", folder.name(), e);
                report.issues.push(format!(
                    "could not sort folder '{}' by received time: {}",
                    folder.name(),
                    e
                ));
            }
        } else {
            debug!(
                "Folder '{}' holds {:?} items, keeping native order",
                folder.name(),
                folder.default_item_type()
            );
        }

        let total = items.len();
        info!("Found {} items in '{}'", total, folder.name());

        for (index, item) in items.into_iter().enumerate() {
            if (index + 1) % PROGRESS_INTERVAL == 0 {
                info!("Processed {}/{} items...", index + 1, total);
            }

            match item {
                Ok(item) => self.export_item(item, output_dir, &mut report),
                Err(e) => {
                    warn!("Error loading item {} of '{}': {}", index, folder.name(), e);
                    report
                        .issues
                        .push(format!("error processing item (time unknown): {}", e));
                }
            }
        }

        info!(
            "Finished folder '{}'. Exported: {}, Issues: {}",
            folder.name(),
            report.processed,
            report.issues.len()
        );
        report
    }

    fn export_item<A: Attachment>(
        &self,
        item: MailItem<A>,
        output_dir: &Path,
        report: &mut FolderReport,
    ) {
        let Some(received) = item.received else {
            report.issues.push("skipped: non-mail item, unknown time".to_string());
            return;
        };

        let message = match item.kind {
            ItemKind::Message(message) => message,
            ItemKind::Other(label) => {
                debug!("Skipping {} item at {}", label, display_timestamp(&received));
                report.issues.push(format!(
                    "skipped: non-mail item at {}",
                    display_timestamp(&received)
                ));
                return;
            }
        };

        let message_dir = match ensure_directory(output_dir, &directory_timestamp(&received)) {
            Ok(dir) => dir,
            Err(e) if self.report_directory_failures => {
                report.issues.push(format!(
                    "error processing email at {}: {}",
                    display_timestamp(&received),
                    e
                ));
                return;
            }
            Err(_) => {
                // Counted without any content written.
                report.processed += 1;
                return;
            }
        };

        match write_message(&message, &message_dir) {
            Ok(failures) => {
                report
                    .issues
                    .extend(failures.into_iter().map(|failure| failure.to_string()));
                report.processed += 1;
            }
            Err(e) => {
                warn!("Error processing email at {}: {}", display_timestamp(&received), e);
                report.issues.push(format!(
                    "error processing email at {}: {}",
                    display_timestamp(&received),
                    e
                ));
            }
        }
    }
}

/// Writes the content file then the attachments. Attachment failures are
/// returned, a content write failure aborts the message.
fn write_message<A: Attachment>(
    message: &MailMessage<A>,
    message_dir: &Path,
) -> Result<Vec<AttachmentError>, StorageError> {
    write_text_file(&message_dir.join(CONTENT_FILE), &message.content())?;

    if message.attachments().is_empty() {
        return Ok(Vec::new());
    }
    Ok(save_attachments(message.attachments(), message_dir))
}

/// Exports `folder` into `output_dir` with default settings.
pub fn export_folder<F: MailFolder>(folder: &F, output_dir: &Path) -> FolderReport {
    FolderExporter::new().export(folder, output_dir)
}
