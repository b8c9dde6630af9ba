use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::resolver::ResolverKind;

#[derive(Parser, Debug)]
#[command(name = "flight-mileage-map")]
#[command(version, about = "Deduplicate a flight log, fill in missing mileage, and map it")]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log events to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the flight log comes from and how gaps are filled
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Spreadsheet ID (overrides config)
    #[arg(long)]
    pub sheet_id: Option<String>,

    /// Sheet name within the spreadsheet
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// Service account key file
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Read the log from a local CSV file instead of the spreadsheet
    #[arg(long, conflicts_with = "sheet_id")]
    pub log_csv: Option<PathBuf>,

    /// Airport reference CSV
    #[arg(short, long)]
    pub airports: Option<PathBuf>,

    /// How missing mileage is resolved
    #[arg(short, long, value_enum)]
    pub resolver: Option<ResolverKind>,

    /// Don't read or write the mileage cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill missing mileage, write the log back, and render the map
    Sync {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory for map.html and map.png
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Map title
        #[arg(short, long)]
        title: Option<String>,

        /// Don't write the filled log back to its source
        #[arg(long)]
        no_write: bool,

        /// Skip the on-screen globe
        #[arg(long)]
        no_display: bool,

        /// Plain log output instead of the full-screen UI
        #[arg(long)]
        no_tui: bool,

        /// Also export the enriched data to this SQLite database
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },

    /// Look up the distance between two airports
    Resolve {
        /// Origin airport code
        origin: String,

        /// Destination airport code
        destination: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print flight statistics without writing anything
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Export the enriched log to a SQLite database
    Export {
        /// Output SQLite database path
        output_db: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
