//! Tagged-union plugin handle: replaces a polymorphic map of `any` with a
//! tagged union. Downcasts once at registration and panics if mismatched,
//! a programmer error, not a runtime one.

use std::sync::Arc;

use crate::capability::{ProviderCapability, TransformerCapability};

/// A registered plugin, already resolved to its declared kind. Built once at
/// registration time; every later lookup already knows which arm it needs, so
/// the mismatched-downcast panics never fire outside a broker bug.
#[derive(Clone)]
pub enum PluginClient {
    Provider(Arc<dyn ProviderCapability>),
    Transformer(Arc<dyn TransformerCapability>),
}

impl PluginClient {
    /// The provider facade, or panics if this handle is a transformer.
    ///
    /// Called only from code paths that already matched on
    /// `PluginType::Provider` when looking the handle up in the registry.
    /// A mismatch here means the registry stored the wrong kind under that
    /// key, a broker bug, not a caller mistake.
    pub fn as_provider(&self) -> &Arc<dyn ProviderCapability> {
        match self {
            PluginClient::Provider(p) => p,
            PluginClient::Transformer(_) => {
                panic!("plugin client registered as transformer, expected provider")
            }
        }
    }

    /// The transformer facade, or panics if this handle is a provider.
    pub fn as_transformer(&self) -> &Arc<dyn TransformerCapability> {
        match self {
            PluginClient::Transformer(t) => t,
            PluginClient::Provider(_) => {
                panic!("plugin client registered as provider, expected transformer")
            }
        }
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, PluginClient::Provider(_))
    }

    pub fn is_transformer(&self) -> bool {
        matches!(self, PluginClient::Transformer(_))
    }
}

impl std::fmt::Debug for PluginClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginClient::Provider(_) => write!(f, "PluginClient::Provider(..)"),
            PluginClient::Transformer(_) => write!(f, "PluginClient::Transformer(..)"),
        }
    }
}
