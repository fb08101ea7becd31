//! Registration payload and related data model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity::PluginType;

/// A protocol version string, e.g. `"1.0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion(pub String);

impl ProtocolVersion {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    /// Whether any of `supported` is also present in `accepted`: the
    /// intersection test required before a registration is accepted.
    pub fn any_accepted(supported: &[ProtocolVersion], accepted: &[ProtocolVersion]) -> bool {
        supported.iter().any(|v| accepted.contains(v))
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The loopback transport a plugin advertises at registration.
///
/// A plain enum is the natural way to enforce the *transport exclusivity*
/// invariant: a registration carries a TCP port XOR a Unix socket path,
/// never both, never neither. The type makes the "neither"/"both" states
/// unrepresentable instead of validating them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// TCP port on `127.0.0.1`.
    Tcp(u16),
    /// Filesystem path of a Unix domain socket.
    Unix(PathBuf),
}

/// Extended, optional descriptive fields surfaced to UIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
}

/// Registration payload supplied by the child process at `Register` time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInstanceInfo {
    pub plugin_type: PluginType,
    /// `(hostname/)?namespace/name`, matching the value discovery produced.
    pub id: String,
    /// Opaque, chosen by the child per process.
    pub instance_id: String,
    pub protocol_versions: Vec<ProtocolVersion>,
    pub transport: Transport,
    pub metadata: Option<PluginMetadata>,
}

impl PluginInstanceInfo {
    /// The namespace used to route lookups: `id`'s suffix after the final `/`.
    pub fn namespace(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

// `PluginType` doesn't derive Serialize/Deserialize in the identity module
// (it's a plain Copy enum used mostly as a map key); give it a minimal,
// explicit wire representation here so registration payloads can cross the
// plugin boundary without pulling serde into every consumer of `PluginType`.
impl Serialize for PluginType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(match self {
            PluginType::Provider => "provider",
            PluginType::Transformer => "transformer",
        })
    }
}

impl<'de> Deserialize<'de> for PluginType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "provider" => Ok(PluginType::Provider),
            "transformer" => Ok(PluginType::Transformer),
            other => Err(serde::de::Error::custom(format!(
                "unknown plugin type: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_version_intersection() {
        let supported = vec![ProtocolVersion::new("1.0"), ProtocolVersion::new("0.9")];
        let accepted = vec![ProtocolVersion::new("1.0")];
        assert!(ProtocolVersion::any_accepted(&supported, &accepted));

        let unsupported = vec![ProtocolVersion::new("2.0")];
        assert!(!ProtocolVersion::any_accepted(&unsupported, &accepted));
    }

    #[test]
    fn namespace_is_suffix_after_last_slash() {
        let info = PluginInstanceInfo {
            plugin_type: PluginType::Provider,
            id: "registry.customhost.com/celerity/azure".to_string(),
            instance_id: "inst-1".to_string(),
            protocol_versions: vec![ProtocolVersion::new("1.0")],
            transport: Transport::Tcp(5000),
            metadata: None,
        };
        assert_eq!(info.namespace(), "azure");
    }

    #[test]
    fn plugin_instance_info_round_trips_through_json() {
        let info = PluginInstanceInfo {
            plugin_type: PluginType::Transformer,
            id: "celerity/celerity".to_string(),
            instance_id: "inst-2".to_string(),
            protocol_versions: vec![ProtocolVersion::new("1.0")],
            transport: Transport::Unix(PathBuf::from("/tmp/plugin.sock")),
            metadata: Some(PluginMetadata {
                display_name: Some("Celerity Transformer".into()),
                ..Default::default()
            }),
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: PluginInstanceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
