//! Suitescope: test execution report viewer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use suitescope::config::{load_config, write_default_config, Config, FilterDefaults};
use suitescope::format::{RandomIds, TimeZoneMode};
use suitescope::loader::read_payload;
use suitescope::reporter::{ConsoleReporter, JsonReporter};
use suitescope::view::{ReportView, DEFAULT_TOP_SUITES};

/// Suitescope: browse a test execution report from the terminal
#[derive(Parser, Debug)]
#[command(name = "suitescope")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Report file: raw JSON data or the generated HTML page
    #[arg(required = true)]
    report: Option<PathBuf>,

    /// Case-insensitive search over suite and case names
    #[arg(long, short)]
    search: Option<String>,

    /// Status filter: All, Pass, Fail, Skip, Error
    #[arg(long)]
    status: Option<String>,

    /// Environment filter (default: All)
    #[arg(long)]
    environment: Option<String>,

    /// Platform filter (default: All)
    #[arg(long)]
    platform: Option<String>,

    /// Expand a suite by id (repeatable)
    #[arg(long, value_name = "SUITE_ID")]
    expand: Vec<String>,

    /// Expand a test case, and its suite, by id (repeatable)
    #[arg(long, value_name = "CASE_ID")]
    expand_case: Vec<String>,

    /// Expand every visible suite and test case
    #[arg(long)]
    expand_all: bool,

    /// Show the filter panel with its options
    #[arg(long)]
    show_filters: bool,

    /// Output the view as JSON
    #[arg(long, short)]
    json: bool,

    /// With --json: pretty-print
    #[arg(long)]
    pretty: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Render timestamps in UTC instead of local time
    #[arg(long)]
    utc: bool,

    /// Number of suites in the duration ranking
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Path to config file (default: search .suitescoperc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .suitescoperc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Time zone for timestamps: local or utc
        #[arg(long, default_value = "local")]
        time_zone: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(Commands::Init { dir, time_zone }) = &args.command {
        return run_init(dir.as_deref(), time_zone);
    }

    let path = args
        .report
        .as_deref()
        .context("A report file is required")?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let mut settings = cli_settings(&args);
    settings.merge_from(load_config(&cwd, args.config.as_deref())?);

    let payload = read_payload(path)?;
    let mut view = ReportView::new(settings.view_options());
    view.receive(payload, &mut RandomIds::from_entropy());

    settings.apply_filters(&mut view);
    if args.show_filters {
        view.toggle_filters_panel();
    }
    if view.is_ready() {
        if settings.expand_all() {
            view.expand_all();
        }
        for id in &args.expand {
            if !view.expand_suite(id) {
                tracing::warn!(id = %id, "no suite with this id");
            }
        }
        for id in &args.expand_case {
            if !view.expand_test_case(id) {
                tracing::warn!(id = %id, "no test case with this id");
            }
        }
    }

    let model = view.view_model();
    if args.json {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        println!("{}", reporter.report(&model));
    } else {
        let reporter = if settings.use_colors() {
            ConsoleReporter::new()
        } else {
            ConsoleReporter::new().without_colors()
        };
        reporter.report(&model);
    }

    Ok(ExitCode::SUCCESS)
}

/// Flags set on the command line, as a config layer that wins over the file
fn cli_settings(args: &Args) -> Config {
    Config {
        extends: None,
        filters: FilterDefaults {
            search: args.search.clone(),
            status: args.status.clone(),
            environment: args.environment.clone(),
            platform: args.platform.clone(),
        },
        time_zone: args.utc.then_some(TimeZoneMode::Utc),
        top_suites: args.top,
        colors: args.no_color.then_some(false),
        expand_all: args.expand_all.then_some(true),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("SUITESCOPE_LOG").unwrap_or_else(|_| default.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run_init(dir: Option<&Path>, time_zone: &str) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);

    let time_zone = match time_zone.to_lowercase().as_str() {
        "local" => TimeZoneMode::Local,
        "utc" => TimeZoneMode::Utc,
        other => anyhow::bail!("Unknown time zone '{}' (expected local or utc)", other),
    };

    let config = Config {
        extends: None,
        filters: FilterDefaults {
            search: None,
            status: Some("All".to_string()),
            environment: Some("All".to_string()),
            platform: Some("All".to_string()),
        },
        time_zone: Some(time_zone),
        top_suites: Some(DEFAULT_TOP_SUITES),
        colors: Some(true),
        expand_all: Some(false),
    };

    match write_default_config(dir, &config)? {
        Some(path) => {
            println!("{}: Created {}", "Done".green().bold(), path.display());
        }
        None => {
            eprintln!(
                "{}: {} already exists; use --dir to write elsewhere or remove it first",
                "Warning".yellow(),
                dir.join(suitescope::config::CONFIG_FILENAME).display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}
