use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::tracker::tracker_model::TrackerConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "dirty-tracker",
    version,
    about = "Unsaved-changes tracking for form editing surfaces"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: dirty-tracker.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append tracker trace events (JSONL) to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay scenario YAML files against form sessions
    Replay {
        /// Scenario YAML file or directory of YAML files
        #[arg(long)]
        scenario: String,

        /// Output format: console, junit
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the snapshot and fingerprint of a surface's fields
    Snapshot {
        /// Surface: patient, user, antecedent, medical_record
        #[arg(long)]
        surface: String,

        /// YAML mapping of a stored record (default: blank form)
        #[arg(long)]
        fields: Option<String>,

        /// Serialize with sorted keys instead of insertion order
        #[arg(long)]
        sorted_keys: bool,
    },

    /// List the built-in editing surfaces
    Surfaces,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `dirty-tracker.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            format: "console".to_string(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_console() -> String { "console".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("dirty-tracker.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Tracker settings from the config file, with the CLI's sorted-keys switch
/// taking precedence.
pub fn build_tracker_config(config: &AppConfig, sorted_keys: bool) -> TrackerConfig {
    let mut tracker = config.tracker.clone();
    if sorted_keys {
        tracker.snapshot_mode = crate::snapshot::snapshot_model::SnapshotMode::SortedKeys;
    }
    tracker
}

/// CLI value, then config value, then `None` (tracing off).
pub fn resolve_trace_path<'a>(cli: Option<&'a str>, config: &'a AppConfig) -> Option<&'a str> {
    cli.or(config.trace.path.as_deref())
}
