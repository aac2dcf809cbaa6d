//! PDF workspace - Entry Point

use clap::Parser;
use pdfws::config::{self, CliOverrides, ResolvedConfig};
use pdfws::integration;
use pdfws::model::{AppError, DateClass, FilterCriteria, SizeClass, SortDir, SortKey};
use pdfws::source::ListingSource;
use pdfws::state::{Clock, Workspace};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// PDF workspace - filter, sort and preview a PDF listing
#[derive(Parser, Debug)]
#[command(name = "pdfws")]
#[command(version)]
#[command(about = "Browse a PDF listing with filters, sorting and a selection-synchronized preview")]
pub struct Args {
    /// Listing server base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Listing endpoint path on the server
    #[arg(long)]
    pub listing_path: Option<String>,

    /// List PDFs from a local directory instead of the server
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Initial name filter
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Initial size class
    #[arg(long, value_enum, default_value_t = SizeClass::All)]
    pub size: SizeClass,

    /// Initial date class
    #[arg(long, value_enum, default_value_t = DateClass::All)]
    pub date: DateClass,

    /// Sort column
    #[arg(long, value_enum, default_value_t = SortKey::ModTime)]
    pub sort: SortKey,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortDir::Desc)]
    pub order: SortDir,

    /// Start the interactive shell instead of printing once
    #[arg(short, long)]
    pub interactive: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listing request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

impl Args {
    /// Criteria the workspace starts with.
    pub fn initial_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search.clone(),
            size_class: self.size,
            date_class: self.date,
            sort_key: self.sort,
            sort_dir: self.order,
        }
    }

    /// Connection flags that were explicitly set.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_base: self.api_base.clone(),
            listing_path: self.listing_path.clone(),
            request_timeout_secs: self.timeout_secs,
            directory: self.dir.clone(),
        }
    }
}

/// Full precedence chain: Defaults → Config File → Env Vars → CLI Args.
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged);
    Ok(config::apply_cli_overrides(with_env, args.overrides()))
}

fn run(args: Args) -> Result<(), AppError> {
    let config = resolve_config(&args)?;

    pdfws::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let source = ListingSource::from_config(&config);
    let mut workspace = Workspace::new(Clock::System).with_criteria(args.initial_criteria());
    let mut stdout = io::stdout().lock();

    if args.interactive {
        integration::run_interactive(
            &mut workspace,
            &source,
            BufReader::new(io::stdin()),
            &mut stdout,
        )
    } else {
        integration::run_once(&mut workspace, &source, &mut stdout)
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pdfws: {err}");
            ExitCode::FAILURE
        }
    }
}
