//! A mail source backed by an on-disk mail profile.
//!
//! Layout:
//!
//! ```text
//! <root>/<Store>/<Folder>/folder.yaml        optional, declares default_item_type
//! <root>/<Store>/<Folder>/<anything>.eml     mail messages
//! <root>/<Store>/<Folder>/<anything>.ics     calendar items
//! <root>/<Store>/<Folder>/<Subfolder>/...    nested folders
//! ```
//!
//! Items are enumerated in file name order.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::SourceError;

use super::parser::EmailParser;
use super::{
    AccountStore, Attachment, ItemCollection, ItemType, MailFolder, MailItem, MailSession,
    TimestampZone,
};

/// Per-folder metadata file.
pub const MANIFEST_FILE: &str = "folder.yaml";

#[derive(Debug, Default, Deserialize)]
struct FolderManifest {
    #[serde(default)]
    default_item_type: ItemType,
}

/// Session over a mail profile directory.
#[derive(Debug, Clone)]
pub struct LocalSession {
    root: PathBuf,
    parser: EmailParser,
}

impl LocalSession {
    /// Opens the profile rooted at `root`. Fails if it is not a directory.
    pub fn open<P: AsRef<Path>>(root: P, zone: TimestampZone) -> Result<Self, SourceError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SourceError::NotFound(root.to_path_buf()));
        }

        Ok(Self {
            root: root.to_path_buf(),
            parser: EmailParser::new(zone),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MailSession for LocalSession {
    type Store = LocalStore;

    fn stores(&self) -> Result<Vec<LocalStore>, SourceError> {
        Ok(list_subdirectories(&self.root)?
            .into_iter()
            .map(|(name, path)| LocalStore {
                name,
                path,
                parser: self.parser,
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    name: String,
    path: PathBuf,
    parser: EmailParser,
}

impl AccountStore for LocalStore {
    type Folder = LocalFolder;

    fn name(&self) -> &str {
        &self.name
    }

    fn folders(&self) -> Result<Vec<LocalFolder>, SourceError> {
        Ok(list_subdirectories(&self.path)?
            .into_iter()
            .map(|(name, path)| LocalFolder::load(name, path, self.parser))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct LocalFolder {
    name: String,
    path: PathBuf,
    parser: EmailParser,
    default_item_type: ItemType,
}

impl LocalFolder {
    fn load(name: String, path: PathBuf, parser: EmailParser) -> Self {
        let default_item_type = read_manifest(&path);
        Self {
            name,
            path,
            parser,
            default_item_type,
        }
    }
}

impl MailFolder for LocalFolder {
    type Attachment = LocalAttachment;
    type Items = LocalItems;

    fn name(&self) -> &str {
        &self.name
    }

    fn default_item_type(&self) -> ItemType {
        self.default_item_type
    }

    fn items(&self) -> Result<LocalItems, SourceError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| SourceError::Walk {
                path: self.path.clone(),
                source: e,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if file_name.starts_with('.') || file_name == MANIFEST_FILE {
                continue;
            }

            paths.push(entry.into_path());
        }

        debug!("Found {} items in {}", paths.len(), self.path.display());
        Ok(LocalItems {
            paths,
            parser: self.parser,
        })
    }

    fn subfolders(&self) -> Result<Vec<LocalFolder>, SourceError> {
        Ok(list_subdirectories(&self.path)?
            .into_iter()
            .map(|(name, path)| LocalFolder::load(name, path, self.parser))
            .collect())
    }
}

/// Item files of one folder, loaded lazily during iteration.
#[derive(Debug, Clone)]
pub struct LocalItems {
    paths: Vec<PathBuf>,
    parser: EmailParser,
}

impl LocalItems {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ItemCollection<LocalAttachment> for LocalItems {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn sort_by_received(&mut self, descending: bool) -> Result<(), SourceError> {
        let mut keyed = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let received = load_item(&self.parser, path)?.received;
            keyed.push((received, path.clone()));
        }

        keyed.sort_by(|a, b| compare_received(a.0, b.0, descending));
        self.paths = keyed.into_iter().map(|(_, path)| path).collect();
        Ok(())
    }
}

impl IntoIterator for LocalItems {
    type Item = Result<MailItem<LocalAttachment>, SourceError>;
    type IntoIter = LocalItemsIter;

    fn into_iter(self) -> Self::IntoIter {
        LocalItemsIter {
            paths: self.paths.into_iter(),
            parser: self.parser,
        }
    }
}

pub struct LocalItemsIter {
    paths: std::vec::IntoIter<PathBuf>,
    parser: EmailParser,
}

impl Iterator for LocalItemsIter {
    type Item = Result<MailItem<LocalAttachment>, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.paths.next().map(|path| load_item(&self.parser, &path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// An attachment held in memory after parsing its message.
#[derive(Debug, Clone)]
pub struct LocalAttachment {
    file_name: String,
    content: Vec<u8>,
}

impl LocalAttachment {
    pub fn new(file_name: String, content: Vec<u8>) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl Attachment for LocalAttachment {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn save_to(&self, path: &Path) -> Result<(), SourceError> {
        std::fs::write(path, &self.content).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Undated items sort after dated ones in either direction.
fn compare_received(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    descending: bool,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn load_item(parser: &EmailParser, path: &Path) -> Result<MailItem<LocalAttachment>, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "eml" => {
            let raw = std::fs::read(path).map_err(|e| SourceError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            parser.parse(&raw, path)
        }
        "ics" => other_item(parser, path, "calendar"),
        "vcf" => other_item(parser, path, "contact"),
        "" => other_item(parser, path, "unknown"),
        ext => other_item(parser, path, ext),
    }
}

/// Non-message files carry their modification time as received time.
fn other_item(
    parser: &EmailParser,
    path: &Path,
    label: &str,
) -> Result<MailItem<LocalAttachment>, SourceError> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let received = parser.zone().wall_clock(DateTime::<Utc>::from(modified));
    Ok(MailItem::other(Some(received), label))
}

fn read_manifest(folder: &Path) -> ItemType {
    let manifest_path = folder.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return ItemType::default();
    }

    let parsed = std::fs::read_to_string(&manifest_path)
        .map_err(|e| e.to_string())
        .and_then(|content| {
            serde_yaml::from_str::<FolderManifest>(&content).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(manifest) => manifest.default_item_type,
        Err(e) => {
            warn!(
                "Ignoring invalid folder manifest '{}': {}",
                manifest_path.display(),
                e
            );
            ItemType::default()
        }
    }
}

/// Visible child directories of `path`, sorted by name.
fn list_subdirectories(path: &Path) -> Result<Vec<(String, PathBuf)>, SourceError> {
    let mut directories = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SourceError::Walk {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        directories.push((name, entry.into_path()));
    }

    Ok(directories)
}
