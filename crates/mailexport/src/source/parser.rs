//! RFC 5322 message parsing for the local profile source.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use mail_parser::{MessageParser, MessagePart, MimeHeaders};

use crate::error::SourceError;

use super::local::LocalAttachment;
use super::{MailItem, MailMessage, TimestampZone};

/// Turns raw `.eml` bytes into mail items.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailParser {
    zone: TimestampZone,
}

impl EmailParser {
    pub fn new(zone: TimestampZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> TimestampZone {
        self.zone
    }

    /// Parses a raw message. `path` is only used for error reporting.
    ///
    /// The received time comes from the `Date` header; a message without one
    /// yields an item with no timestamp.
    pub fn parse(&self, raw: &[u8], path: &Path) -> Result<MailItem<LocalAttachment>, SourceError> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| SourceError::Parse {
                path: path.to_path_buf(),
                reason: "not a valid RFC 5322 message".to_string(),
            })?;

        let received = message
            .date()
            .and_then(|date| DateTime::<Utc>::from_timestamp(date.to_timestamp(), 0))
            .map(|utc| self.zone.wall_clock(utc));

        let subject = message.subject().map(|s| s.to_string());
        let body = message.body_text(0).map(|text| text.into_owned());

        let attachments: Vec<LocalAttachment> = message
            .attachments()
            .map(|part| LocalAttachment::new(attachment_name(part), part.contents().to_vec()))
            .collect();

        debug!(
            "Parsed {} subject={:?} attachments={}",
            path.display(),
            subject.as_deref().unwrap_or("(no subject)"),
            attachments.len()
        );

        Ok(MailItem::message(
            received,
            MailMessage::new(subject, body, attachments),
        ))
    }
}

/// Name reported by the MIME part, or `attachment.<ext>` derived from its
/// content type.
fn attachment_name(part: &MessagePart) -> String {
    if let Some(name) = part
        .attachment_name()
        .or_else(|| part.content_type().and_then(|ct| ct.attribute("name")))
        .filter(|name| !name.is_empty())
    {
        return name.to_string();
    }

    let mime_type = part
        .content_type()
        .map(|ct| match ct.subtype() {
            Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
            None => ct.ctype().to_string(),
        })
        .unwrap_or_else(|| "application/octet-stream".to_string());

    format!("attachment.{}", mime_to_extension(&mime_type))
}

fn mime_to_extension(mime_type: &str) -> &'static str {
    match mime_type.to_lowercase().as_str() {
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/zip" => "zip",
        "application/json" => "json",
        "message/rfc822" => "eml",
        "text/calendar" => "ics",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "text/plain" => "txt",
        "text/html" => "html",
        "text/csv" => "csv",
        _ => "bin",
    }
}
