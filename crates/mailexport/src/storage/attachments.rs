use std::path::Path;

use log::{debug, warn};

use crate::error::AttachmentError;
use crate::sanitize::sanitize_filename;
use crate::source::Attachment;

/// Saves each attachment into `target_dir` under its sanitized file name.
///
/// Attachments are handled independently: a failure is recorded and the
/// remaining attachments are still saved. Two attachments that sanitize to the
/// same name overwrite each other, last one wins.
pub fn save_attachments<A: Attachment>(
    attachments: &[A],
    target_dir: &Path,
) -> Vec<AttachmentError> {
    let mut failures = Vec::new();

    for attachment in attachments {
        let original = attachment.file_name();
        let path = target_dir.join(sanitize_filename(original));

        match attachment.save_to(&path) {
            Ok(()) => debug!("Saved attachment to {}", path.display()),
            Err(e) => {
                warn!("Error saving attachment '{}': {}", original, e);
                failures.push(AttachmentError {
                    file_name: original.to_string(),
                    source: e,
                });
            }
        }
    }

    failures
}
