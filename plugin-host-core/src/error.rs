//! Error taxonomy and round-trip.
//!
//! The taxonomy is closed: every error crossing the plugin boundary is one of
//! `Unexpected`, `Transient`, or `BadInput`. The wire-level shape is
//! [`ErrorResponse`], symmetric in both directions, and the call site
//! applies a [`PluginAction`] discriminator at decode time to produce the
//! richer [`PluginError`] the rest of the engine pattern-matches on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of error kinds an `ErrorResponse` can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Catch-all; non-retryable.
    Unexpected,
    /// Explicitly retryable by the caller/engine.
    Transient,
    /// Caller-supplied data violates the contract.
    BadInput,
}

/// Symmetric wire-level error envelope: `{code, message, details?}`.
///
/// `details` carries the `failureReasons` list for `BadInput` responses, or
/// any other structured diagnostic payload a plugin chooses to attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Unexpected,
            message: message.into(),
            details: None,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Transient,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_input(message: impl Into<String>, failure_reasons: Vec<String>) -> Self {
        Self {
            code: ErrorCode::BadInput,
            message: message.into(),
            details: Some(serde_json::json!({ "failure_reasons": failure_reasons })),
        }
    }

    /// `failureReasons` extracted back out of `details`, empty if absent or
    /// the code isn't `BadInput`.
    pub fn failure_reasons(&self) -> Vec<String> {
        if self.code != ErrorCode::BadInput {
            return Vec::new();
        }
        self.details
            .as_ref()
            .and_then(|d| d.get("failure_reasons"))
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

/// Every RPC name in the host service surface, plus the link-update actions
/// that only exist as deployment-error discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginAction {
    Register,
    Deregister,
    CallFunction,
    GetFunctionDefinition,
    HasFunction,
    ListFunctions,
    DeployResource,
    DestroyResource,
    UpdateLinkResourceA,
    UpdateLinkResourceB,
    UpdateLinkIntermediaryResources,
}

impl PluginAction {
    /// Whether this action is one of the deployment actions that get wrapped
    /// in a [`DeploymentError`] variant regardless of their underlying code.
    pub fn is_deployment_action(self) -> bool {
        matches!(
            self,
            PluginAction::DeployResource
                | PluginAction::DestroyResource
                | PluginAction::UpdateLinkResourceA
                | PluginAction::UpdateLinkResourceB
                | PluginAction::UpdateLinkIntermediaryResources
        )
    }
}

/// Deployment-action-specific error wrappers, so the deployment planner can
/// pattern-match on the action variant irrespective of the underlying code.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeploymentError {
    #[error("resource deploy failed: {0}")]
    ResourceDeployError(ErrorResponse),
    #[error("resource destroy failed: {0}")]
    ResourceDestroyError(ErrorResponse),
    #[error("update link resource A failed: {0}")]
    UpdateLinkResourceAError(ErrorResponse),
    #[error("update link resource B failed: {0}")]
    UpdateLinkResourceBError(ErrorResponse),
    #[error("update link intermediary resources failed: {0}")]
    UpdateLinkIntermediaryResourcesError(ErrorResponse),
}

impl DeploymentError {
    fn wrap(action: PluginAction, resp: ErrorResponse) -> Self {
        match action {
            PluginAction::DeployResource => DeploymentError::ResourceDeployError(resp),
            PluginAction::DestroyResource => DeploymentError::ResourceDestroyError(resp),
            PluginAction::UpdateLinkResourceA => DeploymentError::UpdateLinkResourceAError(resp),
            PluginAction::UpdateLinkResourceB => DeploymentError::UpdateLinkResourceBError(resp),
            PluginAction::UpdateLinkIntermediaryResources => {
                DeploymentError::UpdateLinkIntermediaryResourcesError(resp)
            }
            other => unreachable!("{other:?} is not a deployment action"),
        }
    }

    /// The underlying `ErrorResponse`, regardless of which variant this is.
    pub fn inner(&self) -> &ErrorResponse {
        match self {
            DeploymentError::ResourceDeployError(e)
            | DeploymentError::ResourceDestroyError(e)
            | DeploymentError::UpdateLinkResourceAError(e)
            | DeploymentError::UpdateLinkResourceBError(e)
            | DeploymentError::UpdateLinkIntermediaryResourcesError(e) => e,
        }
    }
}

/// A `Transient`-coded error the engine's retry loop recognises.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("retryable: {0}")]
pub struct RetryableError(pub ErrorResponse);

/// The decoded, call-site-aware error every plugin boundary call returns.
///
/// Built by [`decode_error`]; the action discriminator is supplied by the
/// caller at the point of decoding, not carried on the wire.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PluginError {
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Retryable(#[from] RetryableError),
    #[error(transparent)]
    Plain(ErrorResponse),
}

impl PluginError {
    /// The underlying `ErrorResponse`, regardless of which variant wraps it.
    pub fn response(&self) -> &ErrorResponse {
        match self {
            PluginError::Deployment(d) => d.inner(),
            PluginError::Retryable(r) => &r.0,
            PluginError::Plain(e) => e,
        }
    }
}

/// Applies the `action` discriminator to a wire-level `ErrorResponse`,
/// producing the richer, pattern-matchable [`PluginError`].
///
/// Deployment actions always get a [`DeploymentError`] wrapper irrespective
/// of the underlying code; everything else wraps `Transient` responses in
/// [`RetryableError`] and passes the rest through unchanged.
pub fn decode_error(resp: ErrorResponse, action: PluginAction) -> PluginError {
    if action.is_deployment_action() {
        return PluginError::Deployment(DeploymentError::wrap(action, resp));
    }
    if resp.code == ErrorCode::Transient {
        return PluginError::Retryable(RetryableError(resp));
    }
    PluginError::Plain(resp)
}

/// Inverse of [`decode_error`]: recovers the original `ErrorResponse`.
///
/// `encode_error(decode_error(e, action)) == e` for every `(code, action)`
/// pair.
pub fn encode_error(err: &PluginError) -> ErrorResponse {
    err.response().clone()
}
