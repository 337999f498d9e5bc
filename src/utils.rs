use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::ValueEnum;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::extensions::ExtensionTable;

pub const DEFAULT_OUTPUT_DIR: &str = "claude-export";
pub const DEFAULT_SOURCE_URL_BASE: &str = "https://claude.ai/chat/";
pub const DEFAULT_AUTHOR: &str = "Claude";
pub const DEFAULT_TAG: &str = "claude-chat";

/// e.g. `Jan 5, 2025, 3:04 PM`
const DISPLAY_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Which clock human-readable timestamps are shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneChoice {
    #[default]
    Local,
    Utc,
}

/// What to do with messages whose sender is neither `human` nor `assistant`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSenderPolicy {
    /// Leave them out of the document.
    #[default]
    Drop,
    /// Render them under a label made from the raw sender value.
    Generic,
}

/// Everything the converter needs to render one conversation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Joined with the conversation UUID to form the `source` front matter URL.
    pub source_url_base: Url,
    pub author: String,
    pub tags: Vec<String>,
    pub time_zone: TimeZoneChoice,
    pub unknown_senders: UnknownSenderPolicy,
    /// Written as the `created` front matter date. Normally today.
    pub created: NaiveDate,
}

impl RenderOptions {
    pub fn new(source_url_base: Url) -> Self {
        Self {
            source_url_base,
            author: DEFAULT_AUTHOR.to_string(),
            tags: vec![DEFAULT_TAG.to_string()],
            time_zone: TimeZoneChoice::default(),
            unknown_senders: UnknownSenderPolicy::default(),
            created: Local::now().date_naive(),
        }
    }
}

/// Configuration required to run the export process.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input_path: PathBuf,
    pub target_dir: PathBuf,
    pub render: RenderOptions,
    pub extensions: ExtensionTable,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    Created,
    Updated,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub converted: usize,
    pub artifacts_written: usize,
    pub artifact_errors: usize,
}

pub fn format_timestamp(timestamp: &DateTime<Utc>, time_zone: TimeZoneChoice) -> String {
    match time_zone {
        TimeZoneChoice::Utc => timestamp.format(DISPLAY_FORMAT).to_string(),
        TimeZoneChoice::Local => timestamp
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string(),
    }
}

/// Size in KiB, rounded to the nearest whole number.
pub fn format_kib(bytes: u64) -> u64 {
    (bytes as f64 / 1024.0).round() as u64
}

/// Initialise console diagnostics on stderr. `RUST_LOG` overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact()
        .try_init();
}
