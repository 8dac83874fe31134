use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_CONFIG_PATH: &str = "design-viewer.yaml";
pub const TOKEN_ENV: &str = "DESIGN_VIEWER_TOKEN";
pub const BASE_URL_ENV: &str = "DESIGN_VIEWER_BASE_URL";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "design-viewer",
    version,
    about = "Classify, browse and generate AI equipment designs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to config file (default: design-viewer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append session trace events (JSONL) to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a design name / equipment type offline
    Classify {
        /// Design name as returned by the AI
        #[arg(long, default_value = "")]
        name: String,

        /// Equipment type as returned by the AI
        #[arg(long, default_value = "")]
        equipment_type: String,

        /// Model type hint, used only when no keyword matches
        #[arg(long)]
        hint: Option<String>,
    },

    /// List saved designs and show the newest
    List,

    /// Show one saved design
    Show {
        #[arg(long)]
        id: String,
    },

    /// Submit a prompt for AI analysis
    Generate {
        #[arg(long)]
        prompt: String,
    },

    /// Delete a saved design
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Print the built-in example designs
    Demo,

    /// Log in against the backend
    Login {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Write the bearer token to stdout
        #[arg(long)]
        print_token: bool,
    },

    /// Show the user the token belongs to
    Whoami,

    /// End the backend session for the token
    Logout,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `design-viewer.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_timeout() -> u64 { DEFAULT_TIMEOUT_SECS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Setting resolution: CLI > config > env > defaults
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub trace_path: Option<String>,
}

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> Settings {
    resolve_settings_with_env(cli, config, |key| std::env::var(key).ok())
}

/// Same as `resolve_settings` with an injectable environment lookup.
pub fn resolve_settings_with_env(
    cli: &Cli,
    config: &AppConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| config.backend.base_url.clone())
        .or_else(|| env(BASE_URL_ENV))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let token = cli
        .token
        .clone()
        .or_else(|| config.backend.token.clone())
        .or_else(|| env(TOKEN_ENV))
        .filter(|t| !t.trim().is_empty());

    Settings {
        base_url,
        token,
        timeout_secs: config.backend.timeout_secs,
        trace_path: cli.trace.clone().or_else(|| config.trace.path.clone()),
    }
}

/// `warn` by default, one level more per `-v`.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
