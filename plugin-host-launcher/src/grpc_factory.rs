//! Default [`PluginFactory`]: dials the transport a plugin advertised at
//! registration and wraps it in the appropriate facade.
//!
//! The loopback connection itself is real I/O: this is what proves the
//! plugin's advertised `Transport` is actually reachable. The RPC wire
//! format that rides on top of it is an application-level contract of the
//! plugin API, out of scope of this host, so the raw client stubs here
//! report that plainly rather than pretending to speak a protocol this
//! crate was never given.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::{TcpStream, UnixStream};
use tonic::Status;

use plugin_host_client::messages::*;
use plugin_host_client::{
    PluginClient, ProviderFacade, RawProviderClient, RawTransformerClient, TransformerFacade,
};
use plugin_host_core::{HostIdentity, PluginInstanceInfo, PluginType, Transport};
use plugin_host_server::{CloseConn, ManagerError, PluginFactory};

const WIRE_SCHEMA_OUT_OF_SCOPE: &str =
    "plugin RPC wire schema is out of scope of this host; wire up a real provider/transformer client";

/// The live loopback handle behind a registered plugin's advertised
/// [`Transport`]. Held only to keep the connection open until
/// deregistration drops it; the transport exclusivity invariant (TCP XOR
/// Unix) is mirrored directly in the two variants.
pub enum PluginChannel {
    Tcp(TcpStream),
    Unix(UnixStream),
}

async fn connect(transport: &Transport) -> std::io::Result<PluginChannel> {
    match transport {
        Transport::Tcp(port) => TcpStream::connect(("127.0.0.1", *port))
            .await
            .map(PluginChannel::Tcp),
        Transport::Unix(path) => UnixStream::connect(path).await.map(PluginChannel::Unix),
    }
}

struct UnimplementedProvider;

#[async_trait]
impl RawProviderClient for UnimplementedProvider {
    async fn call_function(
        &self,
        _req: CallFunctionRequest,
    ) -> Result<CallFunctionResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn get_function_definition(
        &self,
        _req: GetFunctionDefinitionRequest,
    ) -> Result<GetFunctionDefinitionResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn has_function(&self, _req: HasFunctionRequest) -> Result<HasFunctionResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_functions(
        &self,
        _req: ListFunctionsRequest,
    ) -> Result<ListFunctionsResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn deploy_resource(
        &self,
        _req: DeployResourceRequest,
    ) -> Result<DeployResourceResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn destroy_resource(
        &self,
        _req: DestroyResourceRequest,
    ) -> Result<DestroyResourceResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn resource_has_stabilised(
        &self,
        _req: ResourceHasStabilisedRequest,
    ) -> Result<ResourceHasStabilisedResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_resource_types(
        &self,
        _req: ListNamesRequest,
    ) -> Result<ListNamesResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_data_sources(&self, _req: ListNamesRequest) -> Result<ListNamesResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_links(&self, _req: ListNamesRequest) -> Result<ListNamesResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_custom_variable_types(
        &self,
        _req: ListNamesRequest,
    ) -> Result<ListNamesResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }
}

struct UnimplementedTransformer;

#[async_trait]
impl RawTransformerClient for UnimplementedTransformer {
    async fn transform(&self, _req: TransformRequest) -> Result<TransformResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn get_transform_name(
        &self,
        _req: GetTransformNameRequest,
    ) -> Result<GetTransformNameResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }

    async fn list_abstract_resource_types(
        &self,
        _req: ListNamesRequest,
    ) -> Result<ListNamesResponse, Status> {
        Err(Status::unimplemented(WIRE_SCHEMA_OUT_OF_SCOPE))
    }
}

/// Default [`PluginFactory`]: connects to the plugin's advertised transport
/// and wraps it in a [`ProviderFacade`]/[`TransformerFacade`] stamped with
/// the host's identity.
pub struct GrpcPluginFactory {
    host_identity: HostIdentity,
}

impl GrpcPluginFactory {
    pub fn new(host_identity: HostIdentity) -> Self {
        Self { host_identity }
    }
}

#[async_trait]
impl PluginFactory for GrpcPluginFactory {
    async fn build(
        &self,
        info: &PluginInstanceInfo,
        _host_id: &str,
    ) -> Result<(PluginClient, CloseConn), ManagerError> {
        let channel = connect(&info.transport).await.map_err(|source| {
            ManagerError::Factory(format!(
                "failed to connect to plugin transport for {}: {source}",
                info.id
            ))
        })?;

        let client = match info.plugin_type {
            PluginType::Provider => PluginClient::Provider(Arc::new(ProviderFacade::new(
                UnimplementedProvider,
                self.host_identity.clone(),
            ))),
            PluginType::Transformer => PluginClient::Transformer(Arc::new(TransformerFacade::new(
                UnimplementedTransformer,
                self.host_identity.clone(),
            ))),
        };

        let close_conn: CloseConn = Box::new(move || drop(channel));
        Ok((client, close_conn))
    }
}
