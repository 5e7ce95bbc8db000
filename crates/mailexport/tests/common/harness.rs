//! Test harness for isolated export runs.
//!
//! The `TestHarness` struct owns a temporary directory holding:
//! - a mail profile laid out as `<profile>/<Store>/<Folder>/<items>`
//! - the base directory the export writes into

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use mailexport::{ExportError, ExportOptions, ExportSummary, Exporter, LocalSession, TimestampZone};

use super::builders::EmlBuilder;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Root of the mail profile.
    pub profile_dir: PathBuf,
    /// Base directory of the export tree.
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let profile_dir = temp_dir.path().join("profile");
        let output_dir = temp_dir.path().join("export");
        std::fs::create_dir_all(&profile_dir).expect("Failed to create profile directory");

        Self {
            temp_dir,
            profile_dir,
            output_dir,
        }
    }

    /// Creates a folder (nested folders use `Parent/Child`) and returns its path.
    pub fn folder(&self, store: &str, folder: &str) -> PathBuf {
        let path = self.profile_dir.join(store).join(folder);
        std::fs::create_dir_all(&path).expect("Failed to create folder");
        path
    }

    /// Marks a folder as holding a non-mail item type, e.g. `calendar`.
    pub fn set_folder_type(&self, store: &str, folder: &str, item_type: &str) {
        let path = self.folder(store, folder).join("folder.yaml");
        std::fs::write(path, format!("default_item_type: {}\n", item_type))
            .expect("Failed to write folder manifest");
    }

    pub fn add_message(&self, store: &str, folder: &str, file_name: &str, message: EmlBuilder) {
        self.add_file(store, folder, file_name, &message.build());
    }

    pub fn add_file(&self, store: &str, folder: &str, file_name: &str, content: &str) {
        let path = self.folder(store, folder).join(file_name);
        std::fs::write(path, content).expect("Failed to write item");
    }

    pub fn session(&self) -> LocalSession {
        LocalSession::open(&self.profile_dir, TimestampZone::Utc).expect("Failed to open profile")
    }

    /// Runs a full export with the given options.
    pub fn export(&self, options: ExportOptions) -> Result<ExportSummary, ExportError> {
        Exporter::new(self.session(), options).run(&self.output_dir)
    }

    /// Runs a full export of every store and top-level folder.
    pub fn export_all(&self) -> ExportSummary {
        self.export(ExportOptions::default())
            .expect("Export should succeed")
    }

    /// Path of a message directory inside the export tree.
    pub fn message_dir(&self, store: &str, folder: &str, timestamp: &str) -> PathBuf {
        self.output_dir.join(store).join(folder).join(timestamp)
    }

    pub fn read_output(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.output_dir.join(relative)).expect("Failed to read output")
    }

    /// Sorted names of the entries directly inside `dir`.
    pub fn list(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read directory")
            .map(|entry| {
                entry
                    .expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
