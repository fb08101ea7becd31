//! # Plugin Host Client
//!
//! Facade wrappers: adapt an RPC plugin client into the in-process
//! `ProviderCapability` / `TransformerCapability` contract the deployment
//! engine consumes, injecting the host identity token on every outbound call
//! and short-circuiting any response whose echoed `hostId` doesn't match.
//!
//! The wire schema of individual RPCs is out of scope for this system.
//! `messages` defines manual request/response structs carrying opaque
//! `serde_json::Value` payloads: a fully operational service built on
//! hand-written types, rather than waiting on a `protoc` toolchain.

mod capability;
mod client;
mod facade;
pub mod messages;
mod raw;

pub use capability::{ProviderCapability, TransformerCapability};
pub use client::PluginClient;
pub use facade::{ProviderFacade, TransformerFacade};
pub use raw::{RawProviderClient, RawTransformerClient};
