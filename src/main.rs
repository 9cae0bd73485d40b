mod batch;
mod enrich;
mod error;
mod export;
mod parser;
mod pdf;
mod settings;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use enrich::{EmailDomainEnricher, EnrichmentSession};
use export::ExportFormat;
use settings::Settings;

#[derive(Parser)]
#[command(name = "pdf_contacts", about = "Extract contact records from PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the input, output and log directories
    Init,
    /// Extract contacts from every document in the input directory and export them
    Run {
        /// Directory holding *.pdf / *.txt documents (default: settings input_dir)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory for the export file (default: settings output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export format
        #[arg(short, long, value_enum, default_value = "xlsx")]
        format: ExportFormat,
        /// Max documents to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Fill empty fields from the offline enricher before export
        #[arg(long)]
        enrich: bool,
    },
    /// Print the records found in a single document as JSON
    Extract {
        /// PDF or text file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let _log_guard = init_tracing(&settings.log_dir)?;

    let t0 = Instant::now();

    let result = match cli.command {
        Commands::Init => {
            for dir in [&settings.input_dir, &settings.output_dir, &settings.log_dir] {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory {:?}", dir))?;
                info!("Created directory: {}", dir.display());
            }
            Ok(())
        }
        Commands::Run {
            input,
            output,
            format,
            limit,
            enrich,
        } => {
            let input_dir = input.unwrap_or_else(|| settings.input_dir.clone());
            let output_dir = output.unwrap_or_else(|| settings.output_dir.clone());

            let mut paths = pdf::discover_documents(&input_dir)?;
            if let Some(n) = limit {
                paths.truncate(n);
            }
            if paths.is_empty() {
                tracing::error!("No documents found in {}", input_dir.display());
                return Ok(());
            }
            info!("Found {} documents to process", paths.len());

            let report = batch::process_batch(&paths, true)?;
            let mut contacts = report.contacts;

            if enrich {
                let mut session = EnrichmentSession::open(EmailDomainEnricher);
                contacts = session.enrich_all(contacts);
                session.close();
            }

            if contacts.is_empty() {
                tracing::error!("No contacts were extracted from the documents");
                return Ok(());
            }

            let out = output_dir.join(format!("{}.{}", settings.output_name, format.extension()));
            export::export(&contacts, &out, format)?;
            println!(
                "Exported {} contacts from {} documents ({} failed) to {}",
                contacts.len(),
                report.documents,
                report.failures.len(),
                out.display()
            );
            Ok(())
        }
        Commands::Extract { file } => {
            let text = pdf::read_document_text(&file)?;
            let records = parser::extract(&text);
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    result
}

/// Console output plus a plain-text copy in `<log_dir>/app.log`. The returned
/// guard flushes the file writer when dropped.
fn init_tracing(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let (file_writer, guard) = tracing_appender::non_blocking(log_file(log_dir)?);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    Ok(guard)
}

fn log_file(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app.log")
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {:?}", log_dir))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn log_file_lands_in_log_dir() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let mut appender = log_file(&log_dir).unwrap();
        appender.write_all(b"run started\n").unwrap();
        appender.flush().unwrap();
        let body = std::fs::read_to_string(log_dir.join("app.log")).unwrap();
        assert_eq!(body, "run started\n");
    }

    #[test]
    fn run_defaults_to_xlsx() {
        let cli = Cli::try_parse_from(["pdf_contacts", "run"]).unwrap();
        match cli.command {
            Commands::Run { format, .. } => assert_eq!(format, ExportFormat::Xlsx),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from(["pdf_contacts", "run", "-i", "scans", "-f", "json", "--enrich"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                format,
                enrich,
                limit,
                ..
            } => {
                assert_eq!(input, Some(PathBuf::from("scans")));
                assert_eq!(format, ExportFormat::Json);
                assert!(enrich);
                assert_eq!(limit, None);
            }
            _ => panic!("expected run"),
        }
    }
}
