//! Layered configuration: explicit CLI override, then environment variable,
//! then default. No file-based layer is warranted at this scope.

use std::path::PathBuf;
use std::time::Duration;

use plugin_host_core::{HostIdentity, ProtocolVersion};
use plugin_host_discovery::parse_search_path;
use plugin_host_launcher::{LauncherConfig, TransformerKeyType};
use plugin_host_server::HostServiceConfig;

use crate::cli::Args;

/// Name of the environment variable `HostConfig::load` reads the plugin
/// search path from, unless overridden by `--plugin-path-env-var`.
pub const DEFAULT_PLUGIN_PATH_ENV_VAR: &str = "DEPLOY_ENGINE_PLUGIN_PATH";

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub search_path: Vec<PathBuf>,
    pub log_root: PathBuf,
    pub host_id: String,
    pub accepted_protocol_versions: Vec<ProtocolVersion>,
    pub launcher: LauncherConfig,
    pub host_service: HostServiceConfig,
}

impl HostConfig {
    /// Resolves every setting from, in precedence order: the parsed CLI
    /// arguments, then environment variables, then the hard-coded default.
    pub fn load(args: &Args) -> Self {
        let plugin_path_env_var = args
            .plugin_path_env_var
            .clone()
            .unwrap_or_else(|| DEFAULT_PLUGIN_PATH_ENV_VAR.to_string());

        let search_path = match &args.plugin_path {
            Some(raw) => parse_search_path(raw),
            None => std::env::var(&plugin_path_env_var)
                .map(|raw| parse_search_path(&raw))
                .unwrap_or_default(),
        };

        let log_root = args
            .log_root
            .clone()
            .or_else(|| std::env::var_os("PLUGIN_HOST_LOG_ROOT").map(PathBuf::from))
            .unwrap_or_else(default_log_root);

        let host_id = args
            .host_id
            .clone()
            .or_else(|| std::env::var("PLUGIN_HOST_ID").ok())
            .unwrap_or_else(|| HostIdentity::generate().require().unwrap().to_string());

        let accepted_protocol_versions = vec![ProtocolVersion::new("1.0")];

        let launcher = LauncherConfig {
            attempt_limit: args.attempt_limit.unwrap_or(5),
            wait_timeout: Duration::from_millis(args.wait_timeout_ms.unwrap_or(20)),
            check_interval: Duration::from_millis(args.check_interval_ms.unwrap_or(5)),
            transformer_key_type: args
                .transformer_key_type
                .map(Into::into)
                .unwrap_or(TransformerKeyType::TransformName),
        };

        Self {
            search_path,
            log_root,
            host_id,
            accepted_protocol_versions,
            launcher,
            host_service: HostServiceConfig::default(),
        }
    }
}

fn default_log_root() -> PathBuf {
    std::env::temp_dir().join("plugin-host-logs")
}
