//! Child-process executor.
//!
//! Spawns a plugin binary with no arguments, inherits the parent environment,
//! and redirects both standard streams into a single per-plugin, append-only
//! log file. Child exit is not observed here: the launcher decides when to
//! kill a process.

use std::fs::{self, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::debug;

use plugin_host_core::PluginPathInfo;

const LOG_DIR_MODE: u32 = 0o755;
const LOG_FILE_MODE: u32 = 0o644;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to create log directory {path}: {source}")]
    LogDir { path: PathBuf, source: std::io::Error },

    #[error("failed to open log file {path}: {source}")]
    LogFile { path: PathBuf, source: std::io::Error },

    #[error("failed to spawn plugin binary {path}: {source}")]
    Spawn { path: PathBuf, source: std::io::Error },
}

/// A running plugin child process. The executor only opens the handle; the
/// launcher decides when (and whether) to call [`kill`](Self::kill).
pub struct PluginHandle {
    child: Child,
    pub log_path: PathBuf,
}

impl PluginHandle {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Terminates the child process. Idempotent: killing an already-exited
    /// child is not an error.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        match self.child.kill().await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Spawns plugin binaries and wires up their log redirection.
pub struct Executor {
    log_root: PathBuf,
}

impl Executor {
    pub fn new(log_root: impl Into<PathBuf>) -> Self {
        Self {
            log_root: log_root.into(),
        }
    }

    /// `<logRoot>/<id-path>/plugin.log`. `id` already contains the
    /// `(hostname/)?namespace/name` path segments.
    pub fn log_path_for(&self, candidate: &PluginPathInfo) -> PathBuf {
        self.log_root.join(&candidate.id).join("plugin.log")
    }

    /// Spawns `candidate.path` with no arguments, inheriting the parent
    /// environment, stdout+stderr redirected to its log file.
    pub fn spawn(&self, candidate: &PluginPathInfo) -> Result<PluginHandle, ExecutorError> {
        let log_path = self.log_path_for(candidate);
        let log_dir = log_path
            .parent()
            .expect("log path always has a parent (log_root/id)");

        fs::create_dir_all(log_dir).map_err(|source| ExecutorError::LogDir {
            path: log_dir.to_path_buf(),
            source,
        })?;
        set_dir_mode(log_dir).map_err(|source| ExecutorError::LogDir {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let log_file = open_append_log(&log_path).map_err(|source| ExecutorError::LogFile {
            path: log_path.clone(),
            source,
        })?;
        let stderr_file = log_file.try_clone().map_err(|source| ExecutorError::LogFile {
            path: log_path.clone(),
            source,
        })?;

        debug!(path = %candidate.path.display(), log = %log_path.display(), "spawning plugin");

        let child = Command::new(&candidate.path)
            .stdout(std::process::Stdio::from(log_file))
            .stderr(std::process::Stdio::from(stderr_file))
            .stdin(std::process::Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                path: candidate.path.clone(),
                source,
            })?;

        Ok(PluginHandle { child, log_path })
    }
}

fn open_append_log(path: &Path) -> std::io::Result<std::fs::File> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .mode(LOG_FILE_MODE)
        .open(path)
}

fn set_dir_mode(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(LOG_DIR_MODE))
}
