//! mailexport - export a mail profile into a timestamp-organized directory tree.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use mailexport::config::{self, ExportConfig, TimestampZone};
use mailexport::logging::{init_logging, LogSettings};
use mailexport::{ExportError, ExportSummary, Exporter, LocalSession};

#[derive(Debug, Parser)]
#[command(
    name = "mailexport",
    version,
    about = "Export mail messages and attachments into a directory tree"
)]
struct Args {
    /// JSON config file. Command line flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mail profile directory: one subdirectory per store, one per folder.
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Base directory of the export tree.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Regex selecting stores by name. Repeatable.
    #[arg(long = "store")]
    stores: Vec<String>,

    /// Regex selecting folders by display path, e.g. `Inbox/Receipts`. Repeatable.
    #[arg(long = "folder")]
    folders: Vec<String>,

    /// Also export nested folders.
    #[arg(short, long)]
    recursive: bool,

    /// Name message directories after UTC instead of local time.
    #[arg(long)]
    utc: bool,

    /// Record messages whose directory cannot be created as issues instead of
    /// counting them as exported.
    #[arg(long)]
    report_directory_failures: bool,

    /// Write the full summary as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Number of issues listed in the final summary.
    #[arg(long, default_value_t = 20)]
    max_issues: usize,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(LogSettings {
        verbose: args.verbose,
        json: args.log_json,
    }) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(summary) => {
            print_summary(&summary, args.max_issues);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExportSummary, ExportError> {
    let config = resolve_config(args)?;
    let options = config::export_options(&config)?;

    let session = LocalSession::open(&config.source_directory, config.timestamps)?;
    info!("Opened mail profile at {}", session.root().display());

    let exporter = Exporter::new(session, options);
    let summary = exporter.run(Path::new(&config.output_directory))?;

    if let Some(path) = &args.report {
        write_report(&summary, path);
    }

    Ok(summary)
}

/// Merges the optional config file with command line flags, then validates
/// the result once.
fn resolve_config(args: &Args) -> Result<ExportConfig, ExportError> {
    let mut config = match &args.config {
        Some(path) => config::parse_config(path)?,
        None => ExportConfig::new(String::new(), String::new()),
    };

    if let Some(source) = &args.source {
        config.source_directory = source.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        config.output_directory = output.to_string_lossy().into_owned();
    }
    if !args.stores.is_empty() {
        config.stores = args.stores.clone();
    }
    if !args.folders.is_empty() {
        config.folders = args.folders.clone();
    }
    config.recursive |= args.recursive;
    config.report_directory_failures |= args.report_directory_failures;
    if args.utc {
        config.timestamps = TimestampZone::Utc;
    }

    config::validate_config(&config)?;
    Ok(config)
}

fn write_report(summary: &ExportSummary, path: &Path) {
    let written = serde_json::to_string_pretty(summary)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));

    match written {
        Ok(()) => info!("Wrote report to {}", path.display()),
        Err(e) => error!("Failed to write report '{}': {}", path.display(), e),
    }
}

fn print_summary(summary: &ExportSummary, max_issues: usize) {
    println!("{}", render_summary(summary, max_issues));
}

/// The end-of-run report, listing at most `max_issues` issues.
fn render_summary(summary: &ExportSummary, max_issues: usize) -> String {
    let mut lines = vec!["--- Export Complete ---".to_string()];
    for folder in &summary.folders {
        lines.push(format!(
            "{}/{}: {} exported, {} issues",
            folder.store, folder.folder, folder.processed, folder.issues
        ));
    }
    lines.push(format!("Total emails exported: {}", summary.processed));

    if summary.issues.is_empty() {
        lines.push("No issues encountered during export.".to_string());
    } else {
        lines.push(String::new());
        lines.push(format!(
            "Encountered {} issues during export:",
            summary.issues.len()
        ));
        for issue in summary.issues.iter().take(max_issues) {
            lines.push(format!("- {}", issue));
        }
        if summary.issues.len() > max_issues {
            lines.push(format!(
                "... (and {} more)",
                summary.issues.len() - max_issues
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("Export location: {}", summary.base_dir.display()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailexport::export::FolderSummary;
    use mailexport::ConfigError;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["mailexport"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn write_config(dir: &TempDir, json: &str) -> String {
        let path = dir.path().join("mailexport.json");
        std::fs::write(&path, json).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn summary_with_issues(count: usize) -> ExportSummary {
        ExportSummary {
            base_dir: PathBuf::from("/export"),
            processed: 4,
            folders: vec![FolderSummary {
                store: "Personal".to_string(),
                folder: "Inbox".to_string(),
                output_dir: PathBuf::from("/export/Personal/Inbox"),
                processed: 4,
                issues: count,
            }],
            issues: (1..=count).map(|i| format!("issue {}", i)).collect(),
        }
    }

    #[test]
    fn test_flags_without_config_file() {
        let config = resolve_config(&args(&["-s", "/profile", "-o", "/export"])).unwrap();

        assert_eq!(config.source_directory, "/profile");
        assert_eq!(config.output_directory, "/export");
        assert!(!config.recursive);
        assert_eq!(config.timestamps, TimestampZone::Local);
    }

    #[test]
    fn test_missing_directories_fail_validation() {
        let result = resolve_config(&args(&["-s", "/profile"]));

        assert!(matches!(
            result,
            Err(ExportError::Config(ConfigError::Validation { .. }))
        ));
    }

    #[test]
    fn test_flag_replaces_invalid_file_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{
                "source_directory": "/profile",
                "output_directory": "/export",
                "folders": ["[bad"]
            }"#,
        );

        let config =
            resolve_config(&args(&["--config", path.as_str(), "--folder", "Inbox"])).unwrap();

        assert_eq!(config.folders, vec!["Inbox"]);
    }

    #[test]
    fn test_flags_supply_directories_missing_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, r#"{ "stores": ["^Work$"] }"#);

        let argv = ["-c", path.as_str(), "-s", "/profile", "-o", "/out"];
        let config = resolve_config(&args(&argv)).unwrap();

        assert_eq!(config.source_directory, "/profile");
        assert_eq!(config.output_directory, "/out");
        assert_eq!(config.stores, vec!["^Work$"]);
    }

    #[test]
    fn test_invalid_file_value_without_override_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{
                "source_directory": "/profile",
                "output_directory": "/export",
                "folders": ["[bad"]
            }"#,
        );

        let result = resolve_config(&args(&["--config", path.as_str()]));

        assert!(matches!(
            result,
            Err(ExportError::Config(ConfigError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_flag_precedence_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{
                "source_directory": "/file-profile",
                "output_directory": "/file-export",
                "stores": ["Personal"],
                "recursive": true,
                "timestamps": "local"
            }"#,
        );

        let config = resolve_config(&args(&[
            "--config",
            path.as_str(),
            "--output",
            "/flag-export",
            "--store",
            "Work",
            "--utc",
            "--report-directory-failures",
        ]))
        .unwrap();

        assert_eq!(config.source_directory, "/file-profile");
        assert_eq!(config.output_directory, "/flag-export");
        assert_eq!(config.stores, vec!["Work"]);
        // Boolean flags can only switch options on.
        assert!(config.recursive);
        assert!(config.report_directory_failures);
        assert_eq!(config.timestamps, TimestampZone::Utc);
    }

    #[test]
    fn test_summary_without_issues() {
        let output = render_summary(&summary_with_issues(0), 20);

        assert!(output.starts_with("--- Export Complete ---\n"));
        assert!(output.contains("Personal/Inbox: 4 exported, 0 issues"));
        assert!(output.contains("Total emails exported: 4"));
        assert!(output.contains("No issues encountered during export."));
        assert!(output.ends_with("Export location: /export"));
    }

    #[test]
    fn test_summary_issue_cap() {
        struct Case {
            issues: usize,
            max_issues: usize,
            listed: usize,
            trailer: Option<&'static str>,
        }

        let cases = [
            Case {
                issues: 3,
                max_issues: 0,
                listed: 0,
                trailer: Some("... (and 3 more)"),
            },
            Case {
                issues: 3,
                max_issues: 3,
                listed: 3,
                trailer: None,
            },
            Case {
                issues: 25,
                max_issues: 20,
                listed: 20,
                trailer: Some("... (and 5 more)"),
            },
            Case {
                issues: 2,
                max_issues: 20,
                listed: 2,
                trailer: None,
            },
        ];

        for case in cases {
            let output = render_summary(&summary_with_issues(case.issues), case.max_issues);
            let listed = output.lines().filter(|line| line.starts_with("- ")).count();

            assert!(output.contains(&format!(
                "Encountered {} issues during export:",
                case.issues
            )));
            assert_eq!(listed, case.listed, "max_issues = {}", case.max_issues);
            match case.trailer {
                Some(trailer) => assert!(output.contains(trailer), "{}", output),
                None => assert!(!output.contains("more)"), "{}", output),
            }
        }
    }

    #[test]
    fn test_write_report_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");

        write_report(&summary_with_issues(2), &path);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["processed"], 4);
        assert_eq!(json["folders"][0]["folder"], "Inbox");
        assert_eq!(json["issues"][1], "issue 2");
    }

    #[test]
    fn test_max_issues_default() {
        assert_eq!(args(&[]).max_issues, 20);
        assert_eq!(args(&["--max-issues", "0"]).max_issues, 0);
    }
}
