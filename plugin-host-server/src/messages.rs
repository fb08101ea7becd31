//! Request/response shapes for the host-service RPC surface (plugin → host
//! direction). Wire framing is out of scope; these are the plain structs
//! the brokering logic in `host_service` operates on.

use plugin_host_core::{Call, PluginInstanceInfo};

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub info: PluginInstanceInfo,
}

#[derive(Debug, Clone)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct DeregisterRequest {
    pub host_id: String,
    pub plugin_type: plugin_host_core::PluginType,
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct DeregisterResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CallFunctionRequest {
    pub host_id: String,
    pub function_name: String,
    pub args: serde_json::Value,
    pub call_stack: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct GetFunctionDefinitionRequest {
    pub host_id: String,
    pub function_name: String,
}

#[derive(Debug, Clone)]
pub struct HasFunctionRequest {
    pub host_id: String,
    pub function_name: String,
}

#[derive(Debug, Clone)]
pub struct ListFunctionsRequest {
    pub host_id: String,
}

#[derive(Debug, Clone)]
pub struct DeployResourceRequest {
    pub host_id: String,
    pub resource_type: String,
    pub change_set: serde_json::Value,
    pub wait_until_stable: bool,
}

#[derive(Debug, Clone)]
pub struct DestroyResourceRequest {
    pub host_id: String,
    pub resource_type: String,
    pub instance_id: String,
}

#[derive(Debug, Clone)]
pub struct ShutdownRequest {
    pub host_id: String,
}
