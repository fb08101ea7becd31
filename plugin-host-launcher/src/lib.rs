//! # Plugin Host Launcher
//!
//! Child-process executor and launch orchestration: discover, spawn, wait
//! for registration, retry on timeout, and build the two facade maps
//! (`PluginMaps`) the deployment engine consumes.
//!
//! [`grpc_factory`] supplies the default [`plugin_host_server::PluginFactory`],
//! the strategy the manager calls at `Register` time to turn a transport
//! locator into a live client. It belongs here rather than in
//! `plugin-host-server` because it is the one piece of wiring that is
//! specific to how *this* binary dials plugins, not to the registry itself
//! (see `plugin-host-server::manager`'s `PluginFactory` doc comment).

mod executor;
pub mod grpc_factory;
mod launcher;

pub use executor::{Executor, ExecutorError, PluginHandle};
pub use grpc_factory::{GrpcPluginFactory, PluginChannel};
pub use launcher::{
    LaunchOutcome, Launcher, LauncherConfig, LauncherError, PluginMaps, TransformerKeyType,
};
