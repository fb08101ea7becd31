//! Command-line arguments for the standalone launcher binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use plugin_host_launcher::TransformerKeyType;

/// Runtime plugin host: discovers, launches, and brokers calls between
/// out-of-process provider/transformer plugins for a blueprint deployment
/// engine.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plugin-host")]
#[command(about = "Discovers, launches, and brokers calls between deployment-engine plugins")]
pub struct Args {
    /// Colon-separated plugin search path. Overrides the environment
    /// variable named by `--plugin-path-env-var` when set.
    #[arg(long)]
    pub plugin_path: Option<String>,

    /// Name of the environment variable to read the search path from when
    /// `--plugin-path` is not given. Defaults to `DEPLOY_ENGINE_PLUGIN_PATH`.
    #[arg(long)]
    pub plugin_path_env_var: Option<String>,

    /// Root directory for per-plugin log files.
    #[arg(long)]
    pub log_root: Option<PathBuf>,

    /// This host's self-assigned identity token. Generated if not given.
    #[arg(long)]
    pub host_id: Option<String>,

    /// Maximum registration attempts per plugin before giving up.
    #[arg(long)]
    pub attempt_limit: Option<u32>,

    /// Milliseconds to wait for a plugin to register before retrying.
    #[arg(long)]
    pub wait_timeout_ms: Option<u64>,

    /// Milliseconds between registration polls.
    #[arg(long)]
    pub check_interval_ms: Option<u64>,

    /// How registered transformers are keyed in the facade map.
    #[arg(long, value_enum)]
    pub transformer_key_type: Option<CliTransformerKeyType>,
}

impl Args {
    #[cfg(test)]
    pub fn default_for_tests() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliTransformerKeyType {
    TransformName,
    PluginName,
}

impl From<CliTransformerKeyType> for TransformerKeyType {
    fn from(value: CliTransformerKeyType) -> Self {
        match value {
            CliTransformerKeyType::TransformName => TransformerKeyType::TransformName,
            CliTransformerKeyType::PluginName => TransformerKeyType::PluginName,
        }
    }
}
