//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use kbsync_core::pipeline::{
    ExportConfig, InputPaths, ProgressReporter, PushConfig, PushResult, Stage,
};
use kbsync_ingest::NormalizeOptions;
use kbsync_remote::{RemoteClient, SubjectFilter, SyncReport};
use kbsync_shared::{
    AppConfig, RemoteConfig, config_file_path, init_config_at, load_config, load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// kbsync: publish spreadsheet knowledge bases.
#[derive(Parser)]
#[command(
    name = "kbsync",
    version,
    about = "Turn Intents/Entities/Answers spreadsheets into knowledge-base documents or push them to the platform.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.kbsync/kbsync.toml.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Where to find the three sheets and how to read them.
#[derive(Args)]
pub(crate) struct InputArgs {
    /// Directory holding Intents.csv, Entities.csv and Answers.csv.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Intents sheet (overrides <dir>/Intents.csv).
    #[arg(long)]
    pub intents: Option<PathBuf>,

    /// Entities sheet (overrides <dir>/Entities.csv).
    #[arg(long)]
    pub entities: Option<PathBuf>,

    /// Answers sheet (overrides <dir>/Answers.csv).
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Derive input/output contexts from slash-delimited topics.
    #[arg(long)]
    pub derive_contexts: bool,

    /// Intents sheet carries the extended layout with inline answers.
    #[arg(long)]
    pub extended_intents: bool,
}

impl InputArgs {
    fn paths(&self) -> InputPaths {
        let mut paths = InputPaths::in_dir(&self.dir);
        if let Some(p) = &self.intents {
            paths.intents = p.clone();
        }
        if let Some(p) = &self.entities {
            paths.entities = p.clone();
        }
        if let Some(p) = &self.answers {
            paths.answers = p.clone();
        }
        paths
    }

    /// Config defaults with command-line switches layered on top.
    fn normalize(&self, config: &AppConfig) -> NormalizeOptions {
        let mut opts = NormalizeOptions::from(config);
        opts.derive_contexts |= self.derive_contexts;
        opts.extended_intents = self.extended_intents;
        opts
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write output-entities-<ts>.json and output-understandings-<ts>.json.
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Directory the two JSON documents are written to.
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Create the records on the remote platform.
    Push {
        #[command(flatten)]
        input: InputArgs,

        /// Configured environment to push to.
        #[arg(short, long, default_value = "dev")]
        env: String,

        /// Delete this subject's remote records first ("*" deletes everything).
        #[arg(short, long)]
        subject: Option<String>,

        /// Maximum in-flight requests per record kind.
        #[arg(long)]
        concurrency: Option<u32>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "kbsync=info",
        1 => "kbsync=debug",
        _ => "kbsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_file.as_deref();
    match cli.command {
        Command::Export { input, out } => cmd_export(config_path, &input, out),
        Command::Push {
            input,
            env,
            subject,
            concurrency,
        } => cmd_push(config_path, &input, &env, subject.as_deref(), concurrency).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    Ok(match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_export(config_path: Option<&Path>, input: &InputArgs, out: PathBuf) -> Result<()> {
    let config = load(config_path)?;

    let export_config = ExportConfig {
        inputs: input.paths(),
        output_dir: out,
        normalize: input.normalize(&config),
        messaging_service: config.defaults.messaging_service.clone(),
    };

    info!(
        dir = %input.dir.display(),
        output_dir = %export_config.output_dir.display(),
        "exporting knowledge base"
    );

    let reporter = CliProgress::new();
    let result = kbsync_core::pipeline::export(&export_config, &reporter)?;

    println!();
    println!("  Export complete!");
    println!("  Entities:       {}", result.entity_count);
    println!("  Understandings: {}", result.understanding_count);
    println!("  Files:          {}", result.entities_path.display());
    println!("                  {}", result.understandings_path.display());
    println!("  Time:           {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_push(
    config_path: Option<&Path>,
    input: &InputArgs,
    env: &str,
    subject: Option<&str>,
    concurrency: Option<u32>,
) -> Result<()> {
    let mut config = load(config_path)?;
    if let Some(n) = concurrency {
        if n == 0 {
            return Err(eyre!("--concurrency must be at least 1"));
        }
        config.defaults.concurrency = n;
    }

    // Resolve credentials before touching any input
    let remote = RemoteConfig::resolve(&config, env)?;
    let client = RemoteClient::new(remote)?;

    let push_config = PushConfig {
        inputs: input.paths(),
        normalize: input.normalize(&config),
        messaging_service: config.defaults.messaging_service.clone(),
        subject: subject.map(SubjectFilter::parse),
    };

    info!(
        env,
        base_url = %client.config().base_url,
        subject = subject.unwrap_or("-"),
        "pushing knowledge base"
    );

    let reporter = CliProgress::new();
    let result = kbsync_core::pipeline::push(&push_config, &client, &reporter).await?;

    print_push_summary(env, &result);
    Ok(())
}

fn print_push_summary(env: &str, result: &PushResult) {
    println!();
    println!("  Push to '{env}' complete!");
    for report in &result.deletions {
        println!(
            "  Deleted {:<9} {}/{}",
            format!("{}:", report.kind),
            report.succeeded,
            report.attempted
        );
    }
    for report in &result.creations {
        println!(
            "  Created {:<9} {}/{}",
            format!("{}:", report.kind),
            report.succeeded,
            report.attempted
        );
    }

    let failures = result.failure_count();
    if failures > 0 {
        println!("  Failures: {failures}");
        for report in result.deletions.iter().chain(&result.creations) {
            for (name, error) in &report.failed {
                println!("    {} {name}: {error}", report.kind);
            }
        }
    }

    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    if path.exists() {
        return Err(eyre!("config file already exists at '{}'", path.display()));
    }
    init_config_at(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: &Stage) {
        match stage {
            Stage::Done | Stage::Failed(_) => self.spinner.finish_and_clear(),
            other => self.spinner.set_message(other.to_string()),
        }
    }

    fn batch_finished(&self, report: &SyncReport) {
        self.spinner.println(format!(
            "  {} {}: {} ok, {} failed",
            if report.failed.is_empty() { "✓" } else { "!" },
            report.kind,
            report.succeeded,
            report.failed.len()
        ));
    }
}
