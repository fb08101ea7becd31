//! # Plugin Host Discovery
//!
//! Walks a colon-separated search path into ordered [`PluginPathInfo`]
//! records. Discovery is a one-shot filesystem scan run at launcher
//! startup, not a hot path, so it stays synchronous; the launcher offloads it
//! onto a blocking thread via `tokio::task::spawn_blocking`.

use std::fs;
use std::path::{Path, PathBuf};

use plugin_host_core::{IdentityError, PluginPathInfo, PluginType};
use tracing::debug;

/// A plugin id seen more than once across roots. The first occurrence (in
/// root order) wins; every later one is recorded here instead of being
/// returned as a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowed {
    pub plugin_type: PluginType,
    pub id: String,
    pub winning_path: PathBuf,
    pub shadowed_path: PathBuf,
}

/// A path segment that didn't parse into a valid `{type, id, version}`
/// triple. Reported, not fatal: discovery continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLayout {
    pub path: PathBuf,
    pub error: IdentityError,
}

/// The full result of one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Candidates in root order, then lexicographic sub-order, deduplicated
    /// by `(type, id)` with first-occurrence-wins.
    pub candidates: Vec<PluginPathInfo>,
    pub shadowed: Vec<Shadowed>,
    pub invalid: Vec<InvalidLayout>,
}

/// Splits a `DEPLOY_ENGINE_PLUGIN_PATH`-style value into an ordered,
/// non-empty list of root directories. Empty segments (`::`, leading/trailing
/// `:`) are dropped rather than treated as `.`.
pub fn parse_search_path(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Runs discovery over every root in `search_path`, in order.
pub fn discover(search_path: &[PathBuf]) -> DiscoveryReport {
    let mut report = DiscoveryReport::default();
    let mut seen: std::collections::HashMap<(PluginType, String), PathBuf> =
        std::collections::HashMap::new();

    for root in search_path {
        if !root.is_dir() {
            debug!(root = %root.display(), "discovery root missing, skipping");
            continue;
        }
        for plugin_type in [PluginType::Provider, PluginType::Transformer] {
            let type_dir = root.join(plugin_type.plural());
            if !type_dir.is_dir() {
                continue;
            }
            walk_type_dir(&type_dir, plugin_type, &mut report, &mut seen);
        }
    }
    report
}

/// Recursively descends a `<root>/<providers|transformers>` directory,
/// accumulating path segments until it finds a file named `plugin`.
fn walk_type_dir(
    type_dir: &Path,
    plugin_type: PluginType,
    report: &mut DiscoveryReport,
    seen: &mut std::collections::HashMap<(PluginType, String), PathBuf>,
) {
    let mut segments = Vec::new();
    walk_segment(type_dir, plugin_type, &mut segments, report, seen);
}

fn walk_segment(
    dir: &Path,
    plugin_type: PluginType,
    segments: &mut Vec<String>,
    report: &mut DiscoveryReport,
    seen: &mut std::collections::HashMap<(PluginType, String), PathBuf>,
) {
    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(it) => it.filter_map(Result::ok).collect(),
        Err(err) => {
            debug!(dir = %dir.display(), %err, "could not read discovery directory");
            return;
        }
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .unwrap_or(false);

        if is_file && name == "plugin" {
            match PluginPathInfo::from_segments(path.clone(), plugin_type, segments) {
                Ok(info) => {
                    let key = (plugin_type, info.id.clone());
                    if let Some(winner) = seen.get(&key) {
                        report.shadowed.push(Shadowed {
                            plugin_type,
                            id: info.id.clone(),
                            winning_path: winner.clone(),
                            shadowed_path: info.path.clone(),
                        });
                    } else {
                        seen.insert(key, info.path.clone());
                        report.candidates.push(info);
                    }
                }
                Err(error) => {
                    report.invalid.push(InvalidLayout { path, error });
                }
            }
            continue;
        }

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            segments.push(name);
            walk_segment(&path, plugin_type, segments, report, seen);
            segments.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch_plugin(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("plugin"), b"#!/bin/sh\n").unwrap();
    }

    #[test]
    fn parses_colon_separated_roots_preserving_order() {
        let parsed = parse_search_path("/a:/b:/c");
        assert_eq!(
            parsed,
            vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn drops_empty_segments() {
        let parsed = parse_search_path(":/a::/b:");
        assert_eq!(parsed, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn discovers_three_and_four_segment_layouts_in_root_then_lex_order() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        touch_plugin(a.path(), "providers/celerity/aws/1.0.0");
        touch_plugin(a.path(), "transformers/celerity/celerity/2.0.1");
        touch_plugin(b.path(), "providers/registry.customhost.com/celerity/azure/3.2.0");

        let report = discover(&[a.path().to_path_buf(), b.path().to_path_buf()]);

        assert_eq!(report.candidates.len(), 3);
        assert_eq!(report.candidates[0].id, "celerity/aws");
        assert_eq!(report.candidates[0].plugin_type, PluginType::Provider);
        assert_eq!(report.candidates[1].id, "celerity/celerity");
        assert_eq!(report.candidates[1].plugin_type, PluginType::Transformer);
        assert_eq!(
            report.candidates[2].id,
            "registry.customhost.com/celerity/azure"
        );
        assert!(report.invalid.is_empty());
        assert!(report.shadowed.is_empty());
    }

    #[test]
    fn missing_root_is_skipped_not_fatal() {
        let a = tempdir().unwrap();
        touch_plugin(a.path(), "providers/celerity/aws/1.0.0");
        let missing = a.path().join("does-not-exist");

        let report = discover(&[missing, a.path().to_path_buf()]);

        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn first_occurrence_wins_later_is_shadowed() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        touch_plugin(a.path(), "providers/celerity/aws/1.0.0");
        touch_plugin(b.path(), "providers/celerity/aws/2.0.0");

        let report = discover(&[a.path().to_path_buf(), b.path().to_path_buf()]);

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].version, "1.0.0");
        assert_eq!(report.shadowed.len(), 1);
        assert_eq!(report.shadowed[0].id, "celerity/aws");
    }

    #[test]
    fn invalid_layout_is_reported_but_siblings_still_discovered() {
        let a = tempdir().unwrap();
        // wrong depth: only one segment below providers/
        touch_plugin(a.path(), "providers/aws");
        touch_plugin(a.path(), "providers/celerity/aws/1.0.0");

        let report = discover(&[a.path().to_path_buf()]);

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.invalid.len(), 1);
    }
}
