//! Facade wrappers: adapt a [`RawProviderClient`]/[`RawTransformerClient`]
//! into the domain-facing [`ProviderCapability`]/[`TransformerCapability`]
//! contract.

use async_trait::async_trait;
use plugin_host_core::{CallStack, ErrorResponse, HostIdentity, PluginAction, PluginError};
use tonic::{Status, Code};

use crate::capability::{ProviderCapability, TransformerCapability};
use crate::messages::*;
use crate::raw::{RawProviderClient, RawTransformerClient};

/// Translates a transport-level `Status` into the taxonomy, then applies the
/// `action` discriminator via `decode_error`.
fn status_to_plugin_error(status: Status, action: PluginAction) -> PluginError {
    let response = match status.code() {
        Code::InvalidArgument => ErrorResponse::bad_input(status.message(), Vec::new()),
        Code::Unavailable | Code::DeadlineExceeded | Code::ResourceExhausted => {
            ErrorResponse::transient(status.message())
        }
        _ => ErrorResponse::unexpected(status.message()),
    };
    plugin_host_core::decode_error(response, action)
}

/// Checks the `hostId` a plugin echoed back against the identity stamped on
/// the outbound request. A mismatch is always `Unexpected`, never retried.
fn check_host_id(identity: &HostIdentity, echoed: &str) -> Result<(), PluginError> {
    if identity.matches(echoed) {
        Ok(())
    } else {
        Err(plugin_host_core::decode_error(
            ErrorResponse::unexpected(format!(
                "invalid host ID: expected {:?}, got {echoed:?}",
                identity.get()
            )),
            PluginAction::CallFunction,
        ))
    }
}

fn host_id(identity: &HostIdentity) -> Result<String, PluginError> {
    identity.require().map(str::to_string).map_err(|_| {
        plugin_host_core::decode_error(
            ErrorResponse::unexpected("host identity not yet assigned"),
            PluginAction::CallFunction,
        )
    })
}

/// Wraps a [`RawProviderClient`], injecting the host identity on every
/// outbound call and verifying it on every response.
pub struct ProviderFacade<C: RawProviderClient> {
    raw: C,
    host_identity: HostIdentity,
}

impl<C: RawProviderClient> ProviderFacade<C> {
    pub fn new(raw: C, host_identity: HostIdentity) -> Self {
        Self { raw, host_identity }
    }
}

#[async_trait]
impl<C: RawProviderClient> ProviderCapability for ProviderFacade<C> {
    async fn call_function(
        &self,
        function_name: &str,
        args: serde_json::Value,
        call_stack: &CallStack,
    ) -> Result<serde_json::Value, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .call_function(CallFunctionRequest {
                host_id: hid,
                function_name: function_name.to_string(),
                args,
                call_stack: call_stack.frames().to_vec(),
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::CallFunction))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.result)
    }

    async fn get_function_definition(
        &self,
        function_name: &str,
    ) -> Result<Option<serde_json::Value>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .get_function_definition(GetFunctionDefinitionRequest {
                host_id: hid,
                function_name: function_name.to_string(),
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::GetFunctionDefinition))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.definition)
    }

    async fn has_function(&self, function_name: &str) -> Result<bool, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .has_function(HasFunctionRequest {
                host_id: hid,
                function_name: function_name.to_string(),
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::HasFunction))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.has_function)
    }

    async fn list_functions(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_functions(ListFunctionsRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.function_names)
    }

    async fn deploy_resource(
        &self,
        resource_type: &str,
        change_set: serde_json::Value,
        wait_until_stable: bool,
    ) -> Result<serde_json::Value, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .deploy_resource(DeployResourceRequest {
                host_id: hid,
                resource_type: resource_type.to_string(),
                change_set,
                wait_until_stable,
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::DeployResource))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.state)
    }

    async fn destroy_resource(
        &self,
        resource_type: &str,
        instance_id: &str,
    ) -> Result<(), PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .destroy_resource(DestroyResourceRequest {
                host_id: hid,
                resource_type: resource_type.to_string(),
                instance_id: instance_id.to_string(),
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::DestroyResource))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(())
    }

    async fn resource_has_stabilised(
        &self,
        resource_type: &str,
        instance_id: &str,
    ) -> Result<bool, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .resource_has_stabilised(ResourceHasStabilisedRequest {
                host_id: hid,
                resource_type: resource_type.to_string(),
                instance_id: instance_id.to_string(),
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::DeployResource))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.stabilised)
    }

    async fn list_resource_types(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_resource_types(ListNamesRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.names)
    }

    async fn list_data_sources(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_data_sources(ListNamesRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.names)
    }

    async fn list_links(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_links(ListNamesRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.names)
    }

    async fn list_custom_variable_types(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_custom_variable_types(ListNamesRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.names)
    }
}

/// Wraps a [`RawTransformerClient`], same contract as [`ProviderFacade`].
pub struct TransformerFacade<C: RawTransformerClient> {
    raw: C,
    host_identity: HostIdentity,
}

impl<C: RawTransformerClient> TransformerFacade<C> {
    pub fn new(raw: C, host_identity: HostIdentity) -> Self {
        Self { raw, host_identity }
    }
}

#[async_trait]
impl<C: RawTransformerClient> TransformerCapability for TransformerFacade<C> {
    async fn transform(
        &self,
        abstract_blueprint: serde_json::Value,
    ) -> Result<serde_json::Value, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .transform(TransformRequest {
                host_id: hid,
                abstract_blueprint,
            })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::CallFunction))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.concrete_blueprint)
    }

    async fn get_transform_name(&self) -> Result<String, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .get_transform_name(GetTransformNameRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.transform_name)
    }

    async fn list_abstract_resource_types(&self) -> Result<Vec<String>, PluginError> {
        let hid = host_id(&self.host_identity)?;
        let resp = self
            .raw
            .list_abstract_resource_types(ListNamesRequest { host_id: hid })
            .await
            .map_err(|s| status_to_plugin_error(s, PluginAction::ListFunctions))?;
        check_host_id(&self.host_identity, &resp.host_id)?;
        Ok(resp.names)
    }
}
