//! Host-identity container.
//!
//! The host's Register RPC hands back a single opaque token; every later
//! plugin→host call must echo it. Rather than a process-wide global, each
//! [`HostIdentity`] gets its own init-once cell, cheaply cloneable (`Arc`
//! internally) so a facade constructed before the host ID is assigned still
//! reads the current value at call time, and tests can run multiple
//! independent hosts in one process.

use std::sync::{Arc, OnceLock};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostIdentityError {
    #[error("host identity already set")]
    AlreadySet,
    #[error("host identity not yet set")]
    Unset,
}

/// Init-once, read-many holder for a host's self-assigned identity token.
#[derive(Debug, Clone, Default)]
pub struct HostIdentity {
    slot: Arc<OnceLock<String>>,
}

impl HostIdentity {
    /// An identity with no token assigned yet.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Generates a fresh random token and assigns it immediately.
    pub fn generate() -> Self {
        let identity = Self::unset();
        identity
            .set(uuid::Uuid::new_v4().to_string())
            .expect("freshly constructed identity cannot already be set");
        identity
    }

    /// Assigns the token. Fails if already set: the writer is expected to
    /// call this exactly once, at startup.
    pub fn set(&self, token: impl Into<String>) -> Result<(), HostIdentityError> {
        self.slot
            .set(token.into())
            .map_err(|_| HostIdentityError::AlreadySet)
    }

    /// Reads the current token, lazily: callers holding a clone taken
    /// before `set` observe the value as soon as it is assigned.
    pub fn get(&self) -> Option<&str> {
        self.slot.get().map(String::as_str)
    }

    /// Reads the token, failing if it has not been assigned yet.
    pub fn require(&self) -> Result<&str, HostIdentityError> {
        self.get().ok_or(HostIdentityError::Unset)
    }

    /// Whether `candidate` matches the assigned token. Always `false` for an
    /// unset identity, never a hard error: callers decide what to do with a
    /// mismatch (the host service turns it into an `Unexpected` error).
    pub fn matches(&self, candidate: &str) -> bool {
        self.get() == Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_has_no_token() {
        let id = HostIdentity::unset();
        assert_eq!(id.get(), None);
        assert_eq!(id.require(), Err(HostIdentityError::Unset));
    }

    #[test]
    fn set_once_then_read_many() {
        let id = HostIdentity::unset();
        id.set("host-1").unwrap();
        assert_eq!(id.get(), Some("host-1"));
        assert_eq!(id.set("host-2"), Err(HostIdentityError::AlreadySet));
    }

    #[test]
    fn clone_observes_late_assignment() {
        let id = HostIdentity::unset();
        let reader = id.clone();
        assert_eq!(reader.get(), None);
        id.set("host-1").unwrap();
        assert_eq!(reader.get(), Some("host-1"));
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let a = HostIdentity::generate();
        let b = HostIdentity::generate();
        assert_ne!(a.get(), b.get());
    }

    #[test]
    fn matches_is_false_without_hard_error() {
        let id = HostIdentity::unset();
        assert!(!id.matches("anything"));
        id.set("token").unwrap();
        assert!(id.matches("token"));
        assert!(!id.matches("other"));
    }
}
