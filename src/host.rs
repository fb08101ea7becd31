//! `PluginHost`: wires the registry, host service, and launcher together
//! and owns the orderly-shutdown sequence.

use std::sync::Arc;

use plugin_host_core::HostIdentity;
use plugin_host_launcher::{Executor, GrpcPluginFactory, LaunchOutcome, Launcher, PluginHandle};
use plugin_host_server::{HostService, ManagerError, PluginManager};

use crate::config::HostConfig;

pub struct PluginHost {
    identity: HostIdentity,
    manager: Arc<PluginManager>,
    host_service: Arc<HostService>,
    launcher: Launcher,
    handles: Vec<PluginHandle>,
    config: HostConfig,
}

impl PluginHost {
    pub fn new(config: HostConfig) -> Self {
        let identity = HostIdentity::unset();
        identity
            .set(config.host_id.clone())
            .expect("freshly constructed identity cannot already be set");

        let manager = Arc::new(PluginManager::new(config.accepted_protocol_versions.clone()));
        let host_service = Arc::new(HostService::new(
            identity.clone(),
            Arc::clone(&manager),
            config.host_service.clone(),
        ));
        let factory = Arc::new(GrpcPluginFactory::new(identity.clone()));
        let executor = Executor::new(config.log_root.clone());
        let launcher = Launcher::new(
            config.launcher.clone(),
            executor,
            Arc::clone(&manager),
            factory,
            config.host_id.clone(),
        );

        Self {
            identity,
            manager,
            host_service,
            launcher,
            handles: Vec::new(),
            config,
        }
    }

    pub fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    pub fn host_service(&self) -> &Arc<HostService> {
        &self.host_service
    }

    /// Runs discovery and launches every candidate plugin found on
    /// `config.search_path`, returning the assembled facade maps.
    pub async fn launch(&mut self) -> Result<LaunchOutcome, plugin_host_launcher::LauncherError> {
        let outcome = self.launcher.launch_all(&self.config.search_path).await?;
        Ok(outcome)
    }

    /// Tracks handles produced by a [`LaunchOutcome`] so `shutdown` can kill
    /// them later, even plugins that registered after their wait was
    /// cancelled.
    pub fn track_handles(&mut self, handles: Vec<PluginHandle>) {
        self.handles.extend(handles);
    }

    /// Deregisters every plugin and kills every tracked child process.
    /// Idempotent: safe to call even if some children already exited.
    pub async fn shutdown(&mut self) -> Result<(), ManagerError> {
        for plugin_type in [
            plugin_host_core::PluginType::Provider,
            plugin_host_core::PluginType::Transformer,
        ] {
            for instance in self.manager.get_plugins(plugin_type) {
                self.manager.deregister(plugin_type, &instance.info.id)?;
            }
        }
        for handle in &mut self.handles {
            let _ = handle.kill().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_host_core::ProtocolVersion;
    use plugin_host_server::HostServiceConfig;
    use tempfile::tempdir;

    fn test_config(log_root: std::path::PathBuf) -> HostConfig {
        HostConfig {
            search_path: Vec::new(),
            log_root,
            host_id: "test-host".to_string(),
            accepted_protocol_versions: vec![ProtocolVersion::new("1.0")],
            launcher: plugin_host_launcher::LauncherConfig::default(),
            host_service: HostServiceConfig::default(),
        }
    }

    #[tokio::test]
    async fn empty_search_path_launches_cleanly_and_shuts_down() {
        let log_root = tempdir().unwrap();
        let mut host = PluginHost::new(test_config(log_root.path().to_path_buf()));

        let outcome = host.launch().await.unwrap();
        assert!(outcome.maps.providers.is_empty());
        assert!(outcome.maps.transformers.is_empty());
        host.track_handles(outcome.handles);

        host.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn host_identity_matches_configured_host_id() {
        let log_root = tempdir().unwrap();
        let host = PluginHost::new(test_config(log_root.path().to_path_buf()));
        assert_eq!(host.identity().get(), Some("test-host"));
    }
}
