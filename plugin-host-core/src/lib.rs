//! # Plugin Host Core
//!
//! Shared identity model, error taxonomy, and host-identity primitives used by
//! every other crate in the plugin host workspace. This crate has no
//! dependency on any other workspace member: it is the foundation that
//! `plugin-host-discovery`, `plugin-host-client`, `plugin-host-server`, and
//! `plugin-host-launcher` all build on.
//!
//! ## What lives here
//! - **Identity & path model**: parsing a plugin binary path into its
//!   `{type, id, version}` triple, and the namespace-derivation rule that the
//!   rest of the engine uses to route resource/data-source lookups.
//! - **Error taxonomy**: the closed `ErrorCode` sum type, the `PluginAction`
//!   discriminator, and the wire-level `ErrorResponse` envelope that round
//!   trips across the plugin boundary.
//! - **Host identity**: the init-once token every plugin must echo back on
//!   every RPC after `Register`.
//! - **Call stack**: the per-evaluation call chain used for recursion
//!   diagnostics and location-tagged errors.

mod call_stack;
mod error;
mod host_identity;
mod identity;
mod model;

pub use call_stack::{Call, CallStack};
pub use error::{
    decode_error, encode_error, DeploymentError, ErrorCode, ErrorResponse, PluginAction,
    PluginError, RetryableError,
};
pub use host_identity::HostIdentity;
pub use identity::{IdentityError, PluginPathInfo, PluginType};
pub use model::{PluginInstanceInfo, PluginMetadata, ProtocolVersion, Transport};
