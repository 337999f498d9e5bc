use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use eyre::{Context, Result, eyre};

use claude_chat_export::config;
use claude_chat_export::utils::{
    self, DEFAULT_OUTPUT_DIR, ExportConfig, RenderOptions, TimeZoneChoice, UnknownSenderPolicy,
};
use claude_chat_export::writer;

/// Convert a Claude conversations.json export into Markdown files.
#[derive(Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Path to conversations.json from the Claude data export.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory to write markdown files into.
    /// Defaults to ./claude-export if not set in config.
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/claude-chat-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Comma-separated tags to add to frontmatter (e.g. "claude,llm").
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// Author written to frontmatter.
    #[arg(long, value_name = "NAME")]
    author: Option<String>,

    /// Clock used for human-readable timestamps.
    #[arg(long, value_enum, value_name = "ZONE")]
    time_zone: Option<TimeZoneChoice>,

    /// What to do with messages from senders other than human/assistant.
    #[arg(long, value_enum, value_name = "POLICY")]
    unknown_senders: Option<UnknownSenderPolicy>,

    /// Show debug diagnostics.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    utils::init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // 1. Load config file (CLI path > default path)
    let file_cfg = config::load_file_config(cli.config.as_deref())?;

    // 2. Resolve output dir (CLI > Config > Default)
    let target_dir = cli
        .output_dir
        .or_else(|| file_cfg.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    if !cli.input.exists() {
        return Err(eyre!("Input file not found: {}", cli.input.display()));
    }

    // 3. Resolve rendering options (CLI > Config > Default)
    let mut render = RenderOptions::new(file_cfg.source_url_base()?);
    if let Some(tags) = cli.tags.or_else(|| file_cfg.tags.clone()) {
        render.tags = tags;
    }
    if let Some(author) = cli.author.or_else(|| file_cfg.author.clone()) {
        render.author = author;
    }
    if let Some(tz) = cli.time_zone.or(file_cfg.time_zone) {
        render.time_zone = tz;
    }
    if let Some(policy) = cli.unknown_senders.or(file_cfg.unknown_senders) {
        render.unknown_senders = policy;
    }

    // 4. Build the Export Config
    let config = ExportConfig {
        input_path: cli.input,
        target_dir,
        render,
        extensions: file_cfg.extension_table(),
        quiet: cli.quiet,
    };

    // 5. Run the Business Logic
    writer::execute(&config)
        .wrap_err_with(|| format!("Failed to convert {}", config.input_path.display()))?;

    Ok(())
}
