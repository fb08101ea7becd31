//! # Plugin Host Server
//!
//! The plugin registry and host-service RPC surface, including the
//! recursion guard and resource-deploy brokering that sit between the
//! registry and the Provider/Transformer facades in `plugin-host-client`.

mod broker_context;
mod host_service;
mod manager;
pub mod messages;

pub use broker_context::BrokerContext;
pub use host_service::{HostService, HostServiceConfig};
pub use manager::{CloseConn, ManagerError, PluginFactory, PluginInstance, PluginManager};
