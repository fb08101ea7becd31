//! The low-level RPC stub the facade wraps.
//!
//! Represents an already-connected client for one plugin instance's own RPC
//! surface (the plugin acts as the server here; the host/engine dials in).
//! Real implementations would be generated from the plugin API's wire
//! contract; that contract is out of scope for this system. Tests and the
//! in-process `PluginFactory` substitute hand-written stubs instead.

use async_trait::async_trait;
use tonic::Status;

use crate::messages::*;

#[async_trait]
pub trait RawProviderClient: Send + Sync {
    async fn call_function(
        &self,
        req: CallFunctionRequest,
    ) -> Result<CallFunctionResponse, Status>;

    async fn get_function_definition(
        &self,
        req: GetFunctionDefinitionRequest,
    ) -> Result<GetFunctionDefinitionResponse, Status>;

    async fn has_function(&self, req: HasFunctionRequest) -> Result<HasFunctionResponse, Status>;

    async fn list_functions(
        &self,
        req: ListFunctionsRequest,
    ) -> Result<ListFunctionsResponse, Status>;

    async fn deploy_resource(
        &self,
        req: DeployResourceRequest,
    ) -> Result<DeployResourceResponse, Status>;

    async fn destroy_resource(
        &self,
        req: DestroyResourceRequest,
    ) -> Result<DestroyResourceResponse, Status>;

    async fn resource_has_stabilised(
        &self,
        req: ResourceHasStabilisedRequest,
    ) -> Result<ResourceHasStabilisedResponse, Status>;

    async fn list_resource_types(&self, req: ListNamesRequest) -> Result<ListNamesResponse, Status>;

    async fn list_data_sources(&self, req: ListNamesRequest) -> Result<ListNamesResponse, Status>;

    async fn list_links(&self, req: ListNamesRequest) -> Result<ListNamesResponse, Status>;

    async fn list_custom_variable_types(
        &self,
        req: ListNamesRequest,
    ) -> Result<ListNamesResponse, Status>;
}

#[async_trait]
pub trait RawTransformerClient: Send + Sync {
    async fn transform(&self, req: TransformRequest) -> Result<TransformResponse, Status>;

    async fn get_transform_name(
        &self,
        req: GetTransformNameRequest,
    ) -> Result<GetTransformNameResponse, Status>;

    async fn list_abstract_resource_types(
        &self,
        req: ListNamesRequest,
    ) -> Result<ListNamesResponse, Status>;
}
