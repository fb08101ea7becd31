//! Manual request/response types for the Provider/Transformer RPC surface.
//!
//! Every message carries `host_id` in both directions: the facade stamps it
//! on outbound requests, and a well-behaved plugin echoes it back on the
//! response so the facade can detect a stale or mismatched connection.
//! Field payloads that are application-level contracts of the plugin API
//! (resource schemas, function argument shapes, validation diagnostics) are
//! left as opaque `serde_json::Value`: their wire schema is a contract
//! between the engine and a plugin author, not this host.

use plugin_host_core::Call;

#[derive(Debug, Clone)]
pub struct CallFunctionRequest {
    pub host_id: String,
    pub function_name: String,
    pub args: serde_json::Value,
    pub call_stack: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct CallFunctionResponse {
    pub host_id: String,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct GetFunctionDefinitionRequest {
    pub host_id: String,
    pub function_name: String,
}

#[derive(Debug, Clone)]
pub struct GetFunctionDefinitionResponse {
    pub host_id: String,
    pub definition: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct HasFunctionRequest {
    pub host_id: String,
    pub function_name: String,
}

#[derive(Debug, Clone)]
pub struct HasFunctionResponse {
    pub host_id: String,
    pub has_function: bool,
}

#[derive(Debug, Clone)]
pub struct ListFunctionsRequest {
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct ListFunctionsResponse {
    pub host_id: String,
    pub function_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DeployResourceRequest {
    pub host_id: String,
    pub resource_type: String,
    pub change_set: serde_json::Value,
    pub wait_until_stable: bool,
}

#[derive(Debug, Clone)]
pub struct DeployResourceResponse {
    pub host_id: String,
    pub state: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct DestroyResourceRequest {
    pub host_id: String,
    pub resource_type: String,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct DestroyResourceResponse {
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct ResourceHasStabilisedRequest {
    pub host_id: String,
    pub resource_type: String,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct ResourceHasStabilisedResponse {
    pub host_id: String,
    pub stabilised: bool,
}

/// Covers `ListResourceTypes`/`ListDataSources`/`ListLinks`/
/// `ListCustomVariableTypes`: all four take only `host_id` and return a
/// name list.
#[derive(Debug, Clone)]
pub struct ListNamesRequest {
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct ListNamesResponse {
    pub host_id: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub host_id: String,
    pub abstract_blueprint: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct TransformResponse {
    pub host_id: String,
    pub concrete_blueprint: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct GetTransformNameRequest {
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct GetTransformNameResponse {
    pub host_id: String,
    pub transform_name: String,
}
