//! Launch orchestration: discover → execute → wait-for-register, then
//! build the two facade maps the engine consumes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use plugin_host_client::{ProviderCapability, TransformerCapability};
use plugin_host_core::{PluginPathInfo, PluginType};
use plugin_host_discovery::{discover, DiscoveryReport};
use plugin_host_server::{PluginFactory, PluginManager};

use crate::executor::{Executor, ExecutorError, PluginHandle};

/// How a registered transformer is keyed in [`PluginMaps::transformers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformerKeyType {
    /// Keyed by the value the transformer's own `GetTransformName` RPC
    /// returns: the default, since blueprints reference transformers by
    /// their transform-name string.
    #[default]
    TransformName,
    /// Keyed by the plugin id's namespace suffix, same rule as providers.
    PluginName,
}

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub attempt_limit: u32,
    pub wait_timeout: Duration,
    pub check_interval: Duration,
    pub transformer_key_type: TransformerKeyType,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            attempt_limit: 5,
            wait_timeout: Duration::from_millis(20),
            check_interval: Duration::from_millis(5),
            transformer_key_type: TransformerKeyType::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("failed to spawn plugin {id}: {source}")]
    Spawn { id: String, source: ExecutorError },

    #[error("plugin {id} did not register within {attempts} attempt(s)")]
    RegistrationTimeout { id: String, attempts: u32 },

    #[error("launch cancelled while waiting for {id} to register")]
    Cancelled { id: String },

    #[error("plugin {id} registered but is not a provider")]
    NotAProvider { id: String },

    #[error("plugin {id} registered but is not a transformer")]
    NotATransformer { id: String },
}

/// The two facade maps the engine consumes.
#[derive(Default)]
pub struct PluginMaps {
    pub providers: HashMap<String, Arc<dyn ProviderCapability>>,
    pub transformers: HashMap<String, Arc<dyn TransformerCapability>>,
}

/// Everything a successful launch run produces: the facade maps plus every
/// child process handle, so the caller can kill them at shutdown even if a
/// plugin registered after its wait was cancelled.
pub struct LaunchOutcome {
    pub maps: PluginMaps,
    pub handles: Vec<PluginHandle>,
    pub report: DiscoveryReport,
}

pub struct Launcher {
    config: LauncherConfig,
    executor: Executor,
    manager: Arc<PluginManager>,
    factory: Arc<dyn PluginFactory>,
    host_id: String,
}

impl Launcher {
    pub fn new(
        config: LauncherConfig,
        executor: Executor,
        manager: Arc<PluginManager>,
        factory: Arc<dyn PluginFactory>,
        host_id: impl Into<String>,
    ) -> Self {
        Self {
            config,
            executor,
            manager,
            factory,
            host_id: host_id.into(),
        }
    }

    /// Runs discovery over `search_path`, launches every candidate, and
    /// builds the facade maps from whatever ended up registered.
    pub async fn launch_all(&self, search_path: &[PathBuf]) -> Result<LaunchOutcome, LauncherError> {
        self.launch_all_cancellable(search_path, &CancellationToken::new())
            .await
    }

    pub async fn launch_all_cancellable(
        &self,
        search_path: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<LaunchOutcome, LauncherError> {
        let report = discover(search_path);
        info!(
            candidates = report.candidates.len(),
            shadowed = report.shadowed.len(),
            invalid = report.invalid.len(),
            "discovery complete"
        );

        let mut handles = Vec::with_capacity(report.candidates.len());
        for candidate in &report.candidates {
            match self.launch_plugin(candidate, 1, cancel).await {
                Ok(handle) => handles.push(handle),
                Err(LauncherError::Cancelled { id }) => {
                    warn!(id, "launch cancelled, leaving candidate for later cleanup");
                }
                Err(err) => return Err(err),
            }
        }

        let maps = self.build_facade_maps().await?;
        Ok(LaunchOutcome {
            maps,
            handles,
            report,
        })
    }

    fn launch_plugin<'a>(
        &'a self,
        candidate: &'a PluginPathInfo,
        attempt: u32,
        cancel: &'a CancellationToken,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PluginHandle, LauncherError>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut handle = self
                .executor
                .spawn(candidate)
                .map_err(|source| LauncherError::Spawn {
                    id: candidate.id.clone(),
                    source,
                })?;

            let deadline = Instant::now() + self.config.wait_timeout;
            loop {
                if self
                    .manager
                    .get_plugin(candidate.plugin_type, &candidate.id)
                    .is_some()
                {
                    return Ok(handle);
                }
                if cancel.is_cancelled() {
                    return Err(LauncherError::Cancelled {
                        id: candidate.id.clone(),
                    });
                }
                if Instant::now() >= deadline {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep(self.config.check_interval) => {}
                    _ = cancel.cancelled() => {
                        return Err(LauncherError::Cancelled { id: candidate.id.clone() });
                    }
                }
            }

            let _ = handle.kill().await;
            let next_attempt = attempt + 1;
            if next_attempt <= self.config.attempt_limit {
                warn!(
                    id = %candidate.id,
                    attempt,
                    "plugin did not register in time, retrying"
                );
                self.launch_plugin(candidate, next_attempt, cancel).await
            } else {
                Err(LauncherError::RegistrationTimeout {
                    id: candidate.id.clone(),
                    attempts: attempt,
                })
            }
        })
    }

    async fn build_facade_maps(&self) -> Result<PluginMaps, LauncherError> {
        let mut maps = PluginMaps::default();

        for instance in self.manager.get_plugins(PluginType::Provider) {
            if !instance.client.is_provider() {
                return Err(LauncherError::NotAProvider {
                    id: instance.info.id.clone(),
                });
            }
            maps.providers
                .insert(instance.info.namespace().to_string(), Arc::clone(instance.client.as_provider()));
        }

        for instance in self.manager.get_plugins(PluginType::Transformer) {
            if !instance.client.is_transformer() {
                return Err(LauncherError::NotATransformer {
                    id: instance.info.id.clone(),
                });
            }
            let transformer = Arc::clone(instance.client.as_transformer());
            let key = match self.config.transformer_key_type {
                TransformerKeyType::PluginName => instance.info.namespace().to_string(),
                TransformerKeyType::TransformName => transformer
                    .get_transform_name()
                    .await
                    .map_err(|_| LauncherError::NotATransformer {
                        id: instance.info.id.clone(),
                    })?,
            };
            maps.transformers.insert(key, transformer);
        }

        Ok(maps)
    }

    /// Exposed so the binary wiring can inspect the factory ahead of launch;
    /// the factory itself is opaque here, a strategy function for dialing
    /// a registered plugin's advertised transport.
    pub fn factory(&self) -> &Arc<dyn PluginFactory> {
        &self.factory
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }
}
