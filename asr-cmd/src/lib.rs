//! Command implementations for the ASR CLI.
//!
//! Provides subcommands for importing inspection reports, browsing the
//! monthly dashboard and exporting reports.

use std::path::PathBuf;

use clap::Subcommand;

pub mod config;
pub mod export;
pub mod import;
pub mod view;

pub use config::{Backend, Config};

#[derive(Subcommand)]
pub enum Command {
    /// Import report files, one at a time
    Import {
        /// Report JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Import one report file into a specific airport's slot
    ImportAirport {
        /// Airport the file must belong to
        #[arg(short, long)]
        airport: String,

        /// Report JSON file
        file: PathBuf,
    },

    /// List stored reports, newest first
    List,

    /// Show the per-airport summary for one month
    Dashboard {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List months that have reports
    Months,

    /// Show one full report
    Show {
        id: i64,

        /// Print the stored JSON record
        #[arg(long)]
        json: bool,
    },

    /// Delete one report
    Delete { id: i64 },

    /// Delete every stored report, including legacy data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Export one report as HTML
    ExportReport {
        id: i64,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Export a month's dashboard as HTML (or CSV)
    ExportDashboard {
        #[arg(long)]
        year: i32,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Write CSV instead of HTML
        #[arg(long)]
        csv: bool,
    },
}

pub async fn run(config: &Config, command: Command) -> anyhow::Result<()> {
    // Refuse before opening, which would run the migration.
    if matches!(command, Command::Reset { yes: false }) {
        anyhow::bail!(view::RESET_UNCONFIRMED);
    }
    let mut library = config.open_library()?;
    match command {
        Command::Import { files } => import::run_import(&mut library, &files).await,
        Command::ImportAirport { airport, file } => {
            import::run_import_airport(&mut library, &file, &airport).await
        }
        Command::List => view::run_list(&library),
        Command::Dashboard { year, month, json } => {
            view::run_dashboard(&library, year, month, json)
        }
        Command::Months => view::run_months(&library),
        Command::Show { id, json } => view::run_show(&library, id, json),
        Command::Delete { id } => view::run_delete(&mut library, id),
        Command::Reset { yes } => view::run_reset(&mut library, yes),
        Command::ExportReport { id, out } => export::run_export_report(&library, id, &out),
        Command::ExportDashboard {
            year,
            month,
            out,
            csv,
        } => export::run_export_dashboard(&library, year, month, &out, csv),
    }
}
