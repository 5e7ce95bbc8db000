//! Walks a mail session and exports every selected folder.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::error::ExportError;
use crate::source::{AccountStore, MailFolder, MailSession};
use crate::storage::{create_directory, ensure_directory};

use super::folder::{FolderExporter, FolderReport};

/// Which folders to export and how.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Store names to include. Empty means every store.
    pub store_patterns: Vec<Regex>,
    /// Folder display paths (`Parent/Child`) to include. Empty means every
    /// folder.
    pub folder_patterns: Vec<Regex>,
    /// Descend into nested folders instead of stopping at the top level.
    pub recursive: bool,
    pub report_directory_failures: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderSummary {
    pub store: String,
    pub folder: String,
    pub output_dir: PathBuf,
    pub processed: usize,
    pub issues: usize,
}

/// Aggregated result of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSummary {
    pub base_dir: PathBuf,
    pub processed: usize,
    pub folders: Vec<FolderSummary>,
    /// Every skip and error of the run, in encounter order.
    pub issues: Vec<String>,
}

impl ExportSummary {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            ..Self::default()
        }
    }

    fn record(&mut self, store: &str, folder: String, output_dir: PathBuf, report: FolderReport) {
        self.processed += report.processed;
        self.folders.push(FolderSummary {
            store: store.to_string(),
            folder,
            output_dir,
            processed: report.processed,
            issues: report.issues.len(),
        });
        self.issues.extend(report.issues);
    }
}

pub struct Exporter<S> {
    session: S,
    options: ExportOptions,
    folder_exporter: FolderExporter,
}

impl<S: MailSession> Exporter<S> {
    pub fn new(session: S, options: ExportOptions) -> Self {
        let folder_exporter =
            FolderExporter::new().report_directory_failures(options.report_directory_failures);
        Self {
            session,
            options,
            folder_exporter,
        }
    }

    /// Exports into `<base_dir>/<Store>/<Folder>/...`.
    ///
    /// Only fails when the base directory cannot be created or the store list
    /// cannot be read. Everything below that is recorded in the summary.
    pub fn run(&self, base_dir: &Path) -> Result<ExportSummary, ExportError> {
        let base_dir = create_directory(base_dir.to_path_buf())?;
        info!("Using base export directory: {}", base_dir.display());

        let mut summary = ExportSummary::new(base_dir.clone());

        for store in self.session.stores()? {
            if !matches_any(&self.options.store_patterns, store.name()) {
                debug!("Store '{}' not selected", store.name());
                continue;
            }
            self.export_store(&store, &base_dir, &mut summary);
        }

        info!(
            "Export complete: {} messages from {} folders, {} issues",
            summary.processed,
            summary.folders.len(),
            summary.issues.len()
        );
        Ok(summary)
    }

    fn export_store(&self, store: &S::Store, base_dir: &Path, summary: &mut ExportSummary) {
        let _span = info_span!("export_store", store = %store.name()).entered();

        let store_dir = match ensure_directory(base_dir, store.name()) {
            Ok(dir) => dir,
            Err(e) => {
                summary
                    .issues
                    .push(format!("skipped store '{}': {}", store.name(), e));
                return;
            }
        };

        let folders = match store.folders() {
            Ok(folders) => folders,
            Err(e) => {
                warn!("Could not list folders of '{}': {}", store.name(), e);
                summary.issues.push(format!(
                    "could not list folders of store '{}': {}",
                    store.name(),
                    e
                ));
                return;
            }
        };

        for folder in &folders {
            let display_name = folder.name().to_string();
            self.visit_folder(store.name(), folder, display_name, &store_dir, summary);
        }
    }

    fn visit_folder<F: MailFolder>(
        &self,
        store: &str,
        folder: &F,
        display_name: String,
        store_dir: &Path,
        summary: &mut ExportSummary,
    ) {
        if matches_any(&self.options.folder_patterns, &display_name) {
            match ensure_directory(store_dir, &display_name) {
                Ok(output_dir) => {
                    info!("Processing folder: {}/{}", store, display_name);
                    let report = self.folder_exporter.export(folder, &output_dir);
                    summary.record(store, display_name.clone(), output_dir, report);
                }
                Err(e) => {
                    summary
                        .issues
                        .push(format!("skipped folder '{}': {}", display_name, e));
                }
            }
        } else {
            debug!("Folder '{}' not selected", display_name);
        }

        if !self.options.recursive {
            return;
        }

        match folder.subfolders() {
            Ok(subfolders) => {
                for subfolder in &subfolders {
                    let nested = format!("{}/{}", display_name, subfolder.name());
                    self.visit_folder(store, subfolder, nested, store_dir, summary);
                }
            }
            Err(e) => {
                warn!("Could not access subfolders of '{}': {}", display_name, e);
                summary.issues.push(format!(
                    "could not access subfolders of '{}': {}",
                    display_name, e
                ));
            }
        }
    }
}

fn matches_any(patterns: &[Regex], name: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.is_match(name))
}
