//! Command-line front end over a board database file.
//!
//! # Responsibility
//! - Inspect, export, import and clear a persisted board without a UI host.
//! - Route every mutation through the core interaction controller.

use anyhow::{anyhow, bail, Context, Result};
use chiaroscuro_core::db::open_db;
use chiaroscuro_core::{
    default_log_level, init_logging, BlobStore, BoardConfig, BoardEvent, Column,
    InteractionController, SqliteBlobStore, CLEAR_CONFIRMATION,
};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chiaroscuro", about = "Plot and subtext annotation board", version)]
struct Cli {
    /// Board database file
    #[arg(long, global = true, default_value = "chiaroscuro.sqlite3")]
    db: PathBuf,
    /// Optional TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the board's notes and section markers
    Show,
    /// Write the board as an exchange document
    Export {
        /// Output path; defaults to the dated export file name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the board with an exchange document
    Import { file: PathBuf },
    /// Remove every note and section
    Clear {
        /// Confirm the irreversible wipe
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), log_dir).map_err(|err| anyhow!(err))?;
    }

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => BoardConfig::default(),
    };
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open board database `{}`", cli.db.display()))?;
    let blobs = SqliteBlobStore::try_new(&conn)?;
    let mut board = InteractionController::open(blobs, config);
    fail_on_reported_error(board.drain_events())?;

    match cli.command {
        Command::Show => show(&board),
        Command::Export { out } => {
            let export = board.export_document()?;
            let path = out.unwrap_or_else(|| PathBuf::from(&export.file_name));
            fs::write(&path, export.contents)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!("event=cli_export module=cli status=ok");
            println!("exported {}", path.display());
            Ok(())
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            board.import_document(&text)?;
            println!(
                "imported {} notes and {} sections",
                board.store().notes().len(),
                board.store().sections().len()
            );
            Ok(())
        }
        Command::Clear { yes } => {
            if !board.clear_all(|_| yes) {
                fail_on_reported_error(board.drain_events())?;
                bail!("{CLEAR_CONFIRMATION} Re-run with --yes to proceed.");
            }
            println!("board cleared");
            Ok(())
        }
    }
}

fn show<S: BlobStore>(board: &InteractionController<S>) -> Result<()> {
    let projection = board.projection();
    for column in [Column::Plot, Column::Subtext] {
        println!("[{}]", column.as_str());
        for view in projection
            .notes
            .iter()
            .filter(|view| view.note.column() == column)
        {
            let position = view.note.position();
            println!(
                "  ({:.0}, {:.0}) anchor={:.0} {}",
                position.x,
                position.y,
                view.note.anchor_offset(),
                first_line(view.note.text())
            );
        }
    }
    println!("[sections]");
    for section in projection.sections {
        println!("  {:.0} {}", section.offset(), section.label());
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn fail_on_reported_error(events: Vec<BoardEvent>) -> Result<()> {
    for event in events {
        if let BoardEvent::ErrorReported(message) = event {
            bail!(message);
        }
    }
    Ok(())
}
