//! Plugin identity and path parsing.
//!
//! A plugin is identified by a `{type, id, version}` triple derived entirely
//! from its location on disk, following this filesystem layout:
//!
//! ```text
//! <root>/<pluginType-plural>/(<hostname>/)?<namespace>/<name>/<version>/plugin
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// What functional role a registered plugin plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginType {
    /// Supplies resource types, data sources, links, custom variable types,
    /// and callable functions.
    Provider,
    /// Transforms an abstract blueprint into a concrete one.
    Transformer,
}

impl PluginType {
    /// The directory name this plugin type lives under (`providers` / `transformers`).
    pub fn plural(self) -> &'static str {
        match self {
            PluginType::Provider => "providers",
            PluginType::Transformer => "transformers",
        }
    }

    /// Parses the plural directory segment back into a `PluginType`.
    ///
    /// Returns `None` for anything else, so callers can skip unrecognised
    /// layout segments without treating them as fatal: invalid layouts are
    /// reported but do not abort discovery of siblings.
    pub fn from_plural(s: &str) -> Option<Self> {
        match s {
            "providers" => Some(PluginType::Provider),
            "transformers" => Some(PluginType::Transformer),
            _ => None,
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginType::Provider => write!(f, "provider"),
            PluginType::Transformer => write!(f, "transformer"),
        }
    }
}

/// Errors raised while parsing a candidate path into a [`PluginPathInfo`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The path below the plural directory did not have 3 or 4 segments
    /// (`namespace/name/version` or `hostname/namespace/name/version`).
    #[error("invalid plugin path layout: {0}")]
    InvalidLayout(String),

    /// One of the identity segments was empty.
    #[error("empty identity segment in path: {0}")]
    EmptySegment(String),
}

/// Discovery output: an immutable record of one plugin binary found on disk.
///
/// Created by [`plugin-host-discovery`](../plugin_host_discovery/index.html)
/// and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPathInfo {
    /// Absolute path to the executable.
    pub path: PathBuf,
    /// Whether this is a provider or transformer plugin.
    pub plugin_type: PluginType,
    /// `(hostname/)?namespace/name`.
    pub id: String,
    /// Semantic version string, taken verbatim from the directory segment.
    pub version: String,
}

impl PluginPathInfo {
    /// Builds a `PluginPathInfo` from the executable's path and the ordered
    /// identity segments found between the plural type directory and the
    /// trailing `<version>/plugin` components.
    ///
    /// `segments` must be `[namespace, name, version]` or
    /// `[hostname, namespace, name, version]`; anything else is
    /// [`IdentityError::InvalidLayout`].
    pub fn from_segments(
        path: PathBuf,
        plugin_type: PluginType,
        segments: &[String],
    ) -> Result<Self, IdentityError> {
        if segments.iter().any(|s| s.is_empty()) {
            return Err(IdentityError::EmptySegment(segments.join("/")));
        }
        let (id_parts, version) = match segments {
            [namespace, name, version] => (vec![namespace.as_str(), name.as_str()], version),
            [hostname, namespace, name, version] => (
                vec![hostname.as_str(), namespace.as_str(), name.as_str()],
                version,
            ),
            other => {
                return Err(IdentityError::InvalidLayout(other.join("/")));
            }
        };
        Ok(Self {
            path,
            plugin_type,
            id: id_parts.join("/"),
            version: version.clone(),
        })
    }

    /// The namespace used to route resource/data-source/custom-variable-type
    /// lookups: the text of [`id`](Self::id) after the final `/`.
    ///
    /// This is the *name* segment of `id`, called the namespace because it
    /// is what the engine uses to key the provider facade map, e.g. id
    /// `celerity/aws` yields namespace `aws`.
    pub fn namespace(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}
