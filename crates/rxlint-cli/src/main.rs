//! rxlint CLI - RxJS linter for JavaScript/TypeScript.

use anyhow::{Context, Result};
use clap::Parser;
use rxlint_cli::cli::rules::print_rule_list;
use rxlint_cli::commands::{handle_config_command, ConfigCommand};
use rxlint_cli::formatters::{Formatter, HumanFormatter, JsonFormatter};
use rxlint_cli::{run_lint, LintRunOptions};
use rxlint_config::ConfigManager;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rxlint")]
#[command(version, about = "Lint RxJS usage in JavaScript/TypeScript", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Files or directories to lint
    ///
    /// Examples:
    ///   rxlint .                   # Every source file under the current directory
    ///   rxlint src/app             # One directory
    ///   rxlint src/app.service.ts  # One file
    #[arg(value_name = "PATHS", default_values = ["."])]
    paths: Vec<PathBuf>,

    /// Configuration file path (defaults to the nearest .rxlint.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Apply fixes and write the files back
    #[arg(long)]
    fix: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Run only these rules (can be specified multiple times)
    #[arg(long = "rule", value_name = "NAME")]
    rules: Vec<String>,

    /// Disable type information; type-aware rules report nothing
    #[arg(long)]
    no_type_info: bool,

    /// Stop before the next file once this many seconds have passed
    #[arg(long, value_name = "SECS")]
    max_duration: Option<u64>,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Disable all ignore patterns (including defaults and .gitignore)
    #[arg(long)]
    no_ignore: bool,

    /// Disable .gitignore respect (still uses default patterns)
    #[arg(long)]
    no_gitignore: bool,

    /// Additional ignore patterns (can be specified multiple times)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore_patterns: Vec<String>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Manage .rxlint.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("RXLINT_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let working_dir =
        std::env::current_dir().context("Failed to get current working directory")?;

    if let Some(Command::Config { command }) = cli.command {
        handle_config_command(command, &working_dir)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list_rules {
        let manager = match &cli.config {
            Some(path) => ConfigManager::load_from(&working_dir.join(path))
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ConfigManager::discover(&working_dir).context("Failed to load config")?,
        };
        print_rule_list(manager.config());
        return Ok(ExitCode::SUCCESS);
    }

    let options = LintRunOptions {
        paths: cli.paths,
        config: cli.config,
        fix: cli.fix,
        rules: cli.rules,
        no_type_info: cli.no_type_info,
        max_duration: cli.max_duration.map(Duration::from_secs),
        no_ignore: cli.no_ignore,
        no_gitignore: cli.no_gitignore,
        ignore_patterns: cli.ignore_patterns,
    };
    let run = run_lint(&options, &working_dir)?;

    let formatter: Box<dyn Formatter> = match cli.format {
        OutputFormat::Human => Box::new(HumanFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };
    formatter.format(&run);

    if run.summary.is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
