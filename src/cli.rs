use clap::{Parser, Subcommand};
use log::{debug, warn};
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;

use crate::config::ConfigManager;
use crate::error::Error;
use crate::provider::ProviderRegistry;
use crate::upload::batch::{self, FileReport, UploadBatch, UploadSession};
use crate::upload::{UploadOutcome, Uploader};
use crate::utils::{collect_files, display_name, format_size};

#[derive(Parser)]
#[command(name = "multiup")]
#[command(about = "Upload files to file-hosting services and collect the URLs")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload files and print their public URLs
    Upload {
        /// Provider to upload to (defaults to `default_provider` from the config)
        #[arg(short, long)]
        provider: Option<String>,

        /// Refuse to upload anything if one file is over the size limit
        #[arg(long)]
        all_or_nothing: bool,

        /// Print one JSON object per file instead of plain text
        #[arg(long)]
        json: bool,

        /// Descend into subdirectories of directory arguments
        #[arg(short, long)]
        recursive: bool,

        /// Files or directories to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Inspect configured providers
    Providers {
        #[command(subcommand)]
        command: ProvidersCommand,
    },
    /// Show the configuration in use
    Config {
        /// Print the effective configuration as TOML
        #[arg(long)]
        dump: bool,
    },
}

#[derive(Subcommand)]
pub enum ProvidersCommand {
    /// List configured providers
    List {
        /// Show endpoint, field names and size limit
        #[arg(short, long)]
        detailed: bool,
    },
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: Cow<'a, str>,
    #[serde(flatten)]
    outcome: &'a UploadOutcome,
}

impl Command {
    pub async fn execute(self, config: &ConfigManager) -> Result<(), Error> {
        match self {
            Command::Upload {
                provider,
                all_or_nothing,
                json,
                recursive,
                paths,
            } => {
                let registry = config.registry()?;
                let provider = match provider {
                    Some(name) => name,
                    None if !config.config().default_provider.is_empty() => {
                        config.config().default_provider.clone()
                    }
                    None => return Err(Error::NoProvider),
                };
                let provider_config = registry.get(&provider)?.clone();

                let files = collect_files(&paths, recursive);
                if files.is_empty() {
                    return Err(Error::NoFiles);
                }

                if all_or_nothing {
                    let oversized = batch::preflight(&files, &provider_config);
                    for item in &oversized {
                        warn!(
                            "{} is {} and exceeds the {} limit of {}",
                            item.path.display(),
                            format_size(item.size),
                            format_size(item.limit_bytes),
                            provider
                        );
                    }
                    if !oversized.is_empty() {
                        return Err(Error::Oversized(oversized.len()));
                    }
                }

                let uploader = Uploader::with_timeout(config.config().timeout())?;
                let total = files.len();
                let (mut reports, handle) = batch::spawn(
                    uploader,
                    UploadBatch {
                        provider: provider.clone(),
                        config: provider_config,
                        files,
                    },
                );

                let mut session = UploadSession::new();
                let mut failed = 0;
                while let Some(report) = reports.recv().await {
                    let printed = if json {
                        print_json_report(&report)
                    } else {
                        print_report(&report);
                        Ok(())
                    };
                    if let Err(e) = &printed {
                        warn!("Could not report {}: {}", report.path.display(), e);
                    }
                    if printed.is_err() || !report.outcome.is_success() {
                        failed += 1;
                    }
                    session.record(&report);
                }
                handle.await?;

                if !json && !session.is_empty() {
                    println!("\nUploaded file URLs:");
                    for line in session.display_lines() {
                        println!("  {}", line);
                    }
                }

                if failed > 0 {
                    return Err(Error::UploadsFailed { failed, total });
                }
            }
            Command::Providers { command } => match command {
                ProvidersCommand::List { detailed } => {
                    let registry = config.registry()?;
                    print_providers(&registry, &config.config().default_provider, detailed);
                }
            },
            Command::Config { dump } => {
                if dump {
                    print!("{}", config.to_toml_string()?);
                    return Ok(());
                }

                println!("\nGeneral Settings:");
                for line in config_summary(config)? {
                    println!("  {}", line);
                }
            }
        }

        Ok(())
    }
}

fn print_report(report: &FileReport) {
    let name = display_name(&report.path);
    match &report.outcome {
        UploadOutcome::Success { url } => println!("{} - {}", name, url),
        outcome => {
            debug!("{} failed: {:?}", report.path.display(), outcome);
            eprintln!("{}: {}", report.path.display(), outcome);
        }
    }
}

fn config_summary(config: &ConfigManager) -> Result<Vec<String>, Error> {
    let cfg = config.config();
    let registry = config.registry()?;

    Ok(vec![
        format!("Config Path: {}", config.config_path().display()),
        format!(
            "User Config Loaded: {}",
            if config.user_file_loaded() { "yes" } else { "no" }
        ),
        format!("Default Provider: {}", cfg.default_provider),
        match cfg.timeout_secs {
            Some(secs) => format!("Timeout: {}s", secs),
            None => "Timeout: client default".to_string(),
        },
        format!("Providers: {}", registry.len()),
    ])
}

fn json_report(report: &FileReport) -> JsonReport<'_> {
    JsonReport {
        file: report.path.to_string_lossy(),
        outcome: &report.outcome,
    }
}

fn print_json_report(report: &FileReport) -> Result<(), Error> {
    let line = serde_json::to_string(&json_report(report))?;
    println!("{}", line);
    Ok(())
}

fn print_providers(registry: &ProviderRegistry, default_provider: &str, detailed: bool) {
    if registry.is_empty() {
        println!("No providers configured");
        return;
    }

    println!("Found {} provider(s):", registry.len());
    for (name, provider) in registry.iter() {
        let marker = if name == default_provider { " (default)" } else { "" };
        println!("\n{}{}", name, marker);

        if detailed {
            println!("  Endpoint: {}", provider.endpoint);
            println!("  File Field: {}", provider.file_field);
            match provider.size_limit_bytes {
                Some(limit) => println!("  Size Limit: {}", format_size(limit)),
                None => println!("  Size Limit: unlimited"),
            }
            println!("  Response Field: {}", provider.response_field);
            println!("  URL Field: {}", provider.url_field_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upload_arguments() {
        let cli = Cli::try_parse_from([
            "multiup",
            "-v",
            "upload",
            "--provider",
            "GoFile",
            "--all-or-nothing",
            "a.png",
            "dir",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Upload {
                provider,
                all_or_nothing,
                json,
                recursive,
                paths,
            } => {
                assert_eq!(provider.as_deref(), Some("GoFile"));
                assert!(all_or_nothing);
                assert!(!json);
                assert!(!recursive);
                assert_eq!(paths, vec![PathBuf::from("a.png"), PathBuf::from("dir")]);
            }
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn upload_requires_a_path() {
        assert!(Cli::try_parse_from(["multiup", "upload"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["multiup", "providers", "list", "--config", "/tmp/c.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            cli.command,
            Command::Providers {
                command: ProvidersCommand::List { detailed: false }
            }
        ));
    }

    #[test]
    fn json_report_flattens_outcome() {
        let report = FileReport {
            path: PathBuf::from("/tmp/a.png"),
            outcome: UploadOutcome::Success {
                url: "http://h/f/a".to_string(),
            },
        };
        let value = serde_json::to_value(json_report(&report)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "file": "/tmp/a.png", "status": "success", "url": "http://h/f/a" })
        );
    }

    #[cfg(unix)]
    #[test]
    fn json_report_tolerates_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let report = FileReport {
            path: PathBuf::from(OsStr::from_bytes(b"/tmp/bad\xff.bin")),
            outcome: UploadOutcome::MissingResponseField,
        };
        let value = serde_json::to_value(json_report(&report)).unwrap();
        assert_eq!(value["file"], "/tmp/bad\u{fffd}.bin");
        assert_eq!(value["status"], "missing_response_field");
    }

    #[test]
    fn config_summary_counts_registered_providers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[[provider]]
name = "TmpFiles"
endpoint = "https://mirror.example/api/v1/upload"
file_field = "file"
response_field = "data"
url_field = "url"
"#,
        )
        .unwrap();

        let manager = ConfigManager::load(Some(path)).unwrap();
        assert_eq!(manager.config().provider.len(), 6);

        let summary = config_summary(&manager).unwrap();
        assert!(summary.contains(&"Providers: 5".to_string()));
        assert!(summary.contains(&"User Config Loaded: yes".to_string()));
        assert!(summary.contains(&"Default Provider: Uguu".to_string()));
    }
}
