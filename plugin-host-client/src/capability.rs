//! Domain-facing Provider / Transformer contracts the deployment engine and
//! the host service's brokering logic both consume.

use async_trait::async_trait;
use plugin_host_core::{CallStack, PluginError};

#[async_trait]
pub trait ProviderCapability: Send + Sync {
    async fn call_function(
        &self,
        function_name: &str,
        args: serde_json::Value,
        call_stack: &CallStack,
    ) -> Result<serde_json::Value, PluginError>;

    async fn get_function_definition(
        &self,
        function_name: &str,
    ) -> Result<Option<serde_json::Value>, PluginError>;

    async fn has_function(&self, function_name: &str) -> Result<bool, PluginError>;

    async fn list_functions(&self) -> Result<Vec<String>, PluginError>;

    async fn deploy_resource(
        &self,
        resource_type: &str,
        change_set: serde_json::Value,
        wait_until_stable: bool,
    ) -> Result<serde_json::Value, PluginError>;

    async fn destroy_resource(
        &self,
        resource_type: &str,
        instance_id: &str,
    ) -> Result<(), PluginError>;

    async fn resource_has_stabilised(
        &self,
        resource_type: &str,
        instance_id: &str,
    ) -> Result<bool, PluginError>;

    async fn list_resource_types(&self) -> Result<Vec<String>, PluginError>;

    async fn list_data_sources(&self) -> Result<Vec<String>, PluginError>;

    async fn list_links(&self) -> Result<Vec<String>, PluginError>;

    async fn list_custom_variable_types(&self) -> Result<Vec<String>, PluginError>;
}

#[async_trait]
pub trait TransformerCapability: Send + Sync {
    async fn transform(
        &self,
        abstract_blueprint: serde_json::Value,
    ) -> Result<serde_json::Value, PluginError>;

    async fn get_transform_name(&self) -> Result<String, PluginError>;

    async fn list_abstract_resource_types(&self) -> Result<Vec<String>, PluginError>;
}
