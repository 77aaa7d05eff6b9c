//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use corpusgen_core::pipeline::{CorpusSummary, ProgressReporter};
use corpusgen_shared::{AppConfig, CONFIG_FILE_NAME, CorpusConfig, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// corpusgen: concatenate a documentation tree into one LLM-ready file.
#[derive(Parser)]
#[command(
    name = "corpusgen",
    version,
    about = "Assemble an ordered, sanitized llms-full.txt from a documentation content tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./corpusgen.toml when present).
    #[arg(long, global = true, env = "CORPUSGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the corpus file.
    Build {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print pages in reading order with their canonical URLs, without writing.
    List {
        #[command(flatten)]
        overrides: Overrides,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags that take precedence over the config file.
#[derive(clap::Args)]
pub(crate) struct Overrides {
    /// Content tree root.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output file path.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Published origin for canonical URLs.
    #[arg(long)]
    pub origin: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a corpusgen.toml with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so stdout carries only command output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "corpusgen=warn",
        1 => "corpusgen=info",
        2 => "corpusgen=debug",
        _ => "corpusgen=trace",
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Build { overrides } => cmd_build(config_path, &overrides),
        Command::List { overrides, json } => cmd_list(config_path, &overrides, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load config and apply CLI overrides. Flag paths resolve against cwd.
fn resolve_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<CorpusConfig> {
    let (mut app, base_dir) = load_config(config_path)?;

    if let Some(origin) = &overrides.origin {
        app.site.origin = origin.clone();
    }

    let mut config = CorpusConfig::resolve(&app, &base_dir)?;

    let cwd = std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?;
    if let Some(root) = &overrides.root {
        config.root = cwd.join(root);
    }
    if let Some(out) = &overrides.out {
        config.output = cwd.join(out);
    }

    if !config.root.is_dir() {
        return Err(eyre!(
            "content root '{}' is not a directory",
            config.root.display()
        ));
    }

    Ok(config)
}

fn cmd_build(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;

    info!(
        root = %config.root.display(),
        output = %config.output.display(),
        origin = %config.origin,
        "building corpus"
    );

    let reporter = CliProgress::new()?;
    let summary = corpusgen_core::pipeline::build_corpus(&config, &reporter)?;

    println!(
        "Generated {} ({} pages, {} bytes)",
        summary.output.display(),
        summary.section_count,
        summary.size_bytes
    );

    Ok(())
}

/// One row of `corpusgen list --json`.
#[derive(Serialize)]
struct ListedPage {
    position: usize,
    slug: String,
    url: String,
    source: String,
}

fn cmd_list(config_path: Option<&Path>, overrides: &Overrides, json: bool) -> Result<()> {
    let config = resolve_config(config_path, overrides)?;
    let planned = corpusgen_core::pipeline::plan(&config)?;

    let rows: Vec<ListedPage> = planned
        .into_iter()
        .map(|p| ListedPage {
            position: p.page.position,
            source: p
                .page
                .source
                .strip_prefix(&config.root)
                .unwrap_or(&p.page.source)
                .display()
                .to_string(),
            slug: p.page.slug,
            url: p.url,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        println!("{:>4}  {}  ({})", row.position, row.url, row.source);
    }
    println!();
    println!("  {} pages", rows.len());

    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    init_config(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let (config, base_dir): (AppConfig, PathBuf) = load_config(config_path)?;
    // Validate before printing so mistakes surface here rather than at build time.
    CorpusConfig::resolve(&config, &base_dir)?;
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
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_sanitized(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Sanitizing [{current}/{total}] {url}"));
    }

    fn done(&self, _summary: &CorpusSummary) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
