#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for exporting saved emails to spreadsheets

use clap::{Parser, Subcommand, ValueEnum};
use email_sheet::{
    ExportConfig, Exporter, FetchRequest, FileSource, Message, Table, fetch_messages,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "email-sheet")]
#[command(about = "Export .eml files and API message dumps to xlsx or csv")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding .eml and .json messages
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Sub-directory to read, if present
    #[arg(long, global = true, default_value = "INBOX")]
    folder: String,

    /// Keep only the most recent N messages
    #[arg(long, global = true)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Print normalized messages
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write an export file
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "xlsx")]
        format: Format,

        /// Add a summary sheet (xlsx only)
        #[arg(long)]
        summary: bool,

        /// Output file name; generated when omitted
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut source = FileSource::new(&args.dir);
    let mut request = FetchRequest::new().folder(&args.folder);
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }

    let messages = fetch_messages(&mut source, &request)?;

    match &args.command {
        Command::List { json } => cmd_list(&messages, *json)?,
        Command::Export {
            format,
            summary,
            output,
        } => cmd_export(&messages, *format, *summary, output.as_deref())?,
    }

    Ok(())
}

fn cmd_list(messages: &[Message], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("No emails found.");
        return Ok(());
    }

    println!("{:<12} {:<20} {:<30} Subject", "ID", "Date", "From");
    println!("{}", "-".repeat(100));
    for message in messages {
        println!(
            "{:<12} {:<20} {:<30} {}",
            truncate(message.id(), 12),
            message.date().format("%Y-%m-%d %H:%M"),
            truncate(message.from(), 28),
            truncate(message.subject(), 40),
        );
    }
    println!("\n{} email(s)", messages.len());

    Ok(())
}

fn cmd_export(
    messages: &[Message],
    format: Format,
    summary: bool,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let exporter = Exporter::new(ExportConfig::from_env()?);
    let table = Table::from_messages(messages)?;

    let path = match format {
        Format::Xlsx if summary => exporter.write_spreadsheet_with_summary(&table, output)?,
        Format::Xlsx => exporter.write_spreadsheet(&table, output)?,
        Format::Csv => exporter.write_csv(&table, output)?,
    };

    println!("Exported {} email(s) to {}", table.len(), path.display());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
