//! Command-line interface for `GeoArchive`, the geodatabase to plain-text archiver.
//!
//! This binary is a thin façade over the [`geoarchive_core`] library: it parses
//! arguments with [`clap`], configures [`tracing`] output and delegates to command
//! handlers.
//!
//! # Available Commands
//!
//! - `export` - Archive every feature class of a geodatabase as delimited text and GeoJSON
//! - `info` - List the feature classes of a geodatabase
//! - `drivers` - List the source container drivers and their capabilities

mod display;

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, debug, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geoarchive_core::drivers::{self, get_available_drivers, get_drivers};
use geoarchive_core::{ArchiveError, ExportConfig, MarkupFormat, describe_workspace, run_archive};

#[derive(Parser)]
#[command(
    name = "geoarchive",
    version,
    about = "Archive geodatabase feature classes as plain text",
    long_about = "GeoArchive exports every feature class of a geodatabase to a delimited text file \
                  with a metadata preamble and to a GeoJSON file, written next to the geodatabase,\n\
                  for long-term preservation in non-proprietary formats."
)]
/// Command-line arguments and options for the `GeoArchive` CLI.
struct Cli {
    /// Only show warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `GeoArchive` CLI.
#[derive(Subcommand)]
enum Commands {
    /// Archives every feature class of a geodatabase.
    ///
    /// For each feature class `<name>`, writes `<name>.csv` and `<name>.json` into the
    /// directory containing the geodatabase, replacing files left by earlier runs.
    Export(ExportArgs),

    /// Lists the feature classes of a geodatabase with their fields and spatial reference.
    Info {
        /// Path to the geodatabase.
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// The driver used to open the geodatabase.
        #[arg(long, value_name = "DRIVER", default_value = "GeoJSON")]
        driver: String,
    },

    /// Lists all source container drivers and their capabilities.
    Drivers {
        /// Only list drivers with at least one implemented capability.
        #[arg(long)]
        available: bool,
    },
}

/// Options of the `export` subcommand.
#[derive(Args)]
struct ExportArgs {
    /// Path to the geodatabase.
    #[arg(short, long, value_name = "SOURCE")]
    source: PathBuf,

    /// Dataset title, first line of every delimited file.
    #[arg(long, default_value = "")]
    title: String,

    /// Attribution (citation) for the dataset.
    #[arg(long, default_value = "")]
    attribution: String,

    /// Dataset abstract.
    #[arg(long = "abstract", value_name = "ABSTRACT", default_value = "")]
    abstract_text: String,

    /// Terms of use.
    #[arg(long, default_value = "")]
    terms_of_use: String,

    /// Contact for the dataset.
    #[arg(long, default_value = "")]
    contact: String,

    /// Field delimiter of the delimited files.
    #[arg(long, default_value = "|")]
    delimiter: String,

    /// The driver used to open the geodatabase.
    #[arg(long, value_name = "DRIVER", default_value = "GeoJSON")]
    driver: String,

    /// Do not write a delimiter after the last value of each data row.
    #[arg(long)]
    no_trailing_delimiter: bool,

    /// Text written for missing values.
    #[arg(long, value_name = "TEXT", default_value = "None")]
    null_value: String,

    /// Write indented GeoJSON instead of compact GeoJSON.
    #[arg(long)]
    pretty_json: bool,
}

impl ExportArgs {
    fn to_config(&self) -> ExportConfig {
        let markup_format = if self.pretty_json {
            MarkupFormat::Pretty
        } else {
            MarkupFormat::Compact
        };

        ExportConfig::new(&self.source)
            .with_title(&self.title)
            .with_attribution(&self.attribution)
            .with_abstract(&self.abstract_text)
            .with_terms_of_use(&self.terms_of_use)
            .with_contact(&self.contact)
            .with_delimiter(&self.delimiter)
            .with_trailing_delimiter(!self.no_trailing_delimiter)
            .with_null_value(&self.null_value)
            .with_markup_format(markup_format)
    }
}

/// Entry point for the `GeoArchive` command-line interface.
///
/// # Errors
///
/// Returns an error if command execution fails, if any artifact of an export failed, or if
/// the logging system cannot be initialized.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // INFO shows per feature class progress; --quiet hides it
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(cli.debug)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Export(args) => {
            info!("Archiving {}", args.source.display());
            handle_export(&args)?;
        },
        Commands::Info { source, driver } => {
            handle_info(&source, &driver)?;
        },
        Commands::Drivers { available } => {
            handle_drivers(available);
        },
    }

    Ok(())
}

/// Logs the recovery hint of `err` and converts it for `main`.
fn report(err: ArchiveError) -> anyhow::Error {
    if let Some(suggestion) = err.recovery_suggestion() {
        warn!("{suggestion}");
    }
    anyhow::Error::new(err)
}

fn handle_export(args: &ExportArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().map_err(report)?;
    debug!("Delimiter: {:?}", config.delimited.delimiter);

    let workspace = drivers::open_workspace(&config.source, &args.driver).map_err(report)?;
    let summary = run_archive(&*workspace, &config).map_err(report)?;

    display::display_summary(&summary);

    if summary.is_successful() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} archive file(s) could not be written",
            summary.artifacts_failed(),
            summary.artifacts_written() + summary.artifacts_failed()
        ))
    }
}

fn handle_info(source: &Path, driver_name: &str) -> Result<()> {
    let driver = drivers::find_driver(driver_name)
        .ok_or_else(|| report(geoarchive_core::error::driver_not_found(driver_name).into()))?;
    let workspace = drivers::open_workspace(source, driver_name).map_err(report)?;
    let info = describe_workspace(&*workspace, &driver).map_err(report)?;

    display::display_workspace_info(&info);
    Ok(())
}

/// Handles the `drivers` subcommand by displaying the registered drivers.
fn handle_drivers(available: bool) {
    let drivers = if available {
        get_available_drivers()
    } else {
        get_drivers()
    };
    display::display_drivers(&drivers);
}
