//! Mail source capability surface.
//!
//! The exporter never talks to a mail client directly. It is handed a
//! [`MailSession`] and walks stores, folders and items through the traits in
//! this module, which keeps the export logic testable against in-memory fakes.

pub mod local;
pub mod parser;

use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

pub use local::{LocalAttachment, LocalFolder, LocalItems, LocalSession, LocalStore};

/// Placeholder written when a message carries no subject.
pub const NO_SUBJECT: &str = "No Subject";
/// Placeholder written when a message carries no body text.
pub const NO_CONTENT: &str = "No content available";

/// The kind of item a folder is declared to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Mail,
    Calendar,
    Contacts,
    Tasks,
    Notes,
}

/// Time zone used when rendering received timestamps as local wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl TimestampZone {
    /// Converts an instant into the wall-clock time used for directory names.
    pub fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            TimestampZone::Local => instant.with_timezone(&Local).naive_local(),
            TimestampZone::Utc => instant.naive_utc(),
        }
    }
}

/// One entry of a folder.
#[derive(Debug, Clone)]
pub struct MailItem<A> {
    pub received: Option<NaiveDateTime>,
    pub kind: ItemKind<A>,
}

#[derive(Debug, Clone)]
pub enum ItemKind<A> {
    Message(MailMessage<A>),
    /// Anything that is not a mail message (meeting requests, contacts, ...),
    /// labelled with a short description of what it is.
    Other(String),
}

impl<A> MailItem<A> {
    pub fn message(received: Option<NaiveDateTime>, message: MailMessage<A>) -> Self {
        Self {
            received,
            kind: ItemKind::Message(message),
        }
    }

    pub fn other(received: Option<NaiveDateTime>, label: impl Into<String>) -> Self {
        Self {
            received,
            kind: ItemKind::Other(label.into()),
        }
    }
}

/// The mail-message variant of an item.
#[derive(Debug, Clone)]
pub struct MailMessage<A> {
    subject: Option<String>,
    body: Option<String>,
    attachments: Vec<A>,
}

impl<A> MailMessage<A> {
    pub fn new(subject: Option<String>, body: Option<String>, attachments: Vec<A>) -> Self {
        Self {
            subject,
            body,
            attachments,
        }
    }

    /// Subject line, or [`NO_SUBJECT`] when the message has none.
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(NO_SUBJECT)
    }

    /// Body text, or [`NO_CONTENT`] when the message has none.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or(NO_CONTENT)
    }

    pub fn attachments(&self) -> &[A] {
        &self.attachments
    }

    /// The text persisted as `email_body.txt`.
    pub fn content(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject(), self.body())
    }
}

/// A message attachment that can persist its own bytes.
pub trait Attachment {
    /// File name as reported by the source. Untrusted.
    fn file_name(&self) -> &str;

    fn save_to(&self, path: &Path) -> Result<(), SourceError>;
}

/// The items of one folder, in the source's native enumeration order until
/// sorted.
pub trait ItemCollection<A: Attachment>:
    IntoIterator<Item = Result<MailItem<A>, SourceError>>
{
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reorders the collection by received time. On error the collection must
    /// keep its previous order.
    fn sort_by_received(&mut self, descending: bool) -> Result<(), SourceError>;
}

pub trait MailFolder: Sized {
    type Attachment: Attachment;
    type Items: ItemCollection<Self::Attachment>;

    fn name(&self) -> &str;

    fn default_item_type(&self) -> ItemType;

    fn items(&self) -> Result<Self::Items, SourceError>;

    fn subfolders(&self) -> Result<Vec<Self>, SourceError>;
}

pub trait AccountStore {
    type Folder: MailFolder;

    fn name(&self) -> &str;

    /// Top-level folders of the store. Nested folders are reached through
    /// [`MailFolder::subfolders`].
    fn folders(&self) -> Result<Vec<Self::Folder>, SourceError>;
}

/// An open connection to a mail client.
pub trait MailSession {
    type Store: AccountStore;

    fn stores(&self) -> Result<Vec<Self::Store>, SourceError>;
}
