//! Plugin registry: the shared, lock-protected index of every registered
//! plugin instance.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;

use plugin_host_client::PluginClient;
use plugin_host_core::{PluginInstanceInfo, PluginMetadata, PluginType, ProtocolVersion};

/// Closure invoked exactly once, when a plugin instance is deregistered, to
/// tear down its transport connection.
pub type CloseConn = Box<dyn FnOnce() + Send>;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("plugin already registered: {0} {1}")]
    AlreadyRegistered(PluginType, String),
    #[error("no protocol version overlap: plugin supports {supported:?}, host accepts {accepted:?}")]
    UnsupportedProtocolVersion {
        supported: Vec<String>,
        accepted: Vec<String>,
    },
    #[error("plugin not registered: {0} {1}")]
    NotFound(PluginType, String),
    #[error("plugin factory failed: {0}")]
    Factory(String),
}

/// Strategy for turning discovery/registration info into a live client.
///
/// The default factory is not implemented in this crate: it belongs to the
/// binary wiring everything together, see `plugin-host-launcher`. It opens
/// an insecure loopback connection to the plugin's advertised transport and
/// wraps it in the appropriate facade. Tests substitute a factory that
/// returns in-process stubs.
#[async_trait]
pub trait PluginFactory: Send + Sync {
    async fn build(
        &self,
        info: &PluginInstanceInfo,
        host_id: &str,
    ) -> Result<(PluginClient, CloseConn), ManagerError>;
}

/// One entry in the registry: the static info plus the live client handle.
pub struct PluginInstance {
    pub info: PluginInstanceInfo,
    pub client: PluginClient,
    close_conn: Mutex<Option<CloseConn>>,
}

impl PluginInstance {
    fn close(&self) {
        if let Some(close) = self.close_conn.lock().unwrap().take() {
            close();
        }
    }
}

/// Shared plugin index. Every host-service RPC goes through this.
pub struct PluginManager {
    registry: DashMap<(PluginType, String), Arc<PluginInstance>>,
    accepted_protocol_versions: Vec<ProtocolVersion>,
}

impl PluginManager {
    pub fn new(accepted_protocol_versions: Vec<ProtocolVersion>) -> Self {
        Self {
            registry: DashMap::new(),
            accepted_protocol_versions,
        }
    }

    /// Registers a newly-launched plugin instance. Fails with
    /// `AlreadyRegistered` if `(type, id)` already has an entry: no
    /// idempotent-by-replace semantics.
    pub async fn register(
        &self,
        info: PluginInstanceInfo,
        host_id: &str,
        factory: &dyn PluginFactory,
    ) -> Result<(), ManagerError> {
        let key = (info.plugin_type, info.id.clone());
        if self.registry.contains_key(&key) {
            return Err(ManagerError::AlreadyRegistered(info.plugin_type, info.id));
        }
        if !ProtocolVersion::any_accepted(&self.accepted_protocol_versions, &info.protocol_versions)
        {
            return Err(ManagerError::UnsupportedProtocolVersion {
                supported: info.protocol_versions.iter().map(|v| v.0.clone()).collect(),
                accepted: self
                    .accepted_protocol_versions
                    .iter()
                    .map(|v| v.0.clone())
                    .collect(),
            });
        }

        let (client, close_conn) = factory.build(&info, host_id).await?;
        let instance = Arc::new(PluginInstance {
            info,
            client,
            close_conn: Mutex::new(Some(close_conn)),
        });

        // `factory.build` already awaited, so re-check under the entry to
        // close the narrow race against a concurrent registration of the
        // same key instead of trusting the `contains_key` check above.
        match self.registry.entry(key) {
            Entry::Occupied(occupied) => {
                instance.close();
                let (plugin_type, id) = occupied.key().clone();
                Err(ManagerError::AlreadyRegistered(plugin_type, id))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(instance);
                Ok(())
            }
        }
    }

    /// Removes the entry and invokes `CloseConn` exactly once.
    pub fn deregister(&self, plugin_type: PluginType, id: &str) -> Result<(), ManagerError> {
        match self.registry.remove(&(plugin_type, id.to_string())) {
            Some((_, instance)) => {
                instance.close();
                Ok(())
            }
            None => Err(ManagerError::NotFound(plugin_type, id.to_string())),
        }
    }

    /// Non-blocking point lookup.
    pub fn get_plugin(&self, plugin_type: PluginType, id: &str) -> Option<Arc<PluginInstance>> {
        self.registry
            .get(&(plugin_type, id.to_string()))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// A stable, point-in-time snapshot of every registered instance of a
    /// given type.
    pub fn get_plugins(&self, plugin_type: PluginType) -> Vec<Arc<PluginInstance>> {
        self.registry
            .iter()
            .filter(|entry| entry.key().0 == plugin_type)
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn get_plugin_metadata(
        &self,
        plugin_type: PluginType,
        id: &str,
    ) -> Option<PluginMetadata> {
        self.get_plugin(plugin_type, id)
            .and_then(|instance| instance.info.metadata.clone())
    }
}
