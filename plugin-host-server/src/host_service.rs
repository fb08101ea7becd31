//! Host service: the RPC surface every plugin child dials into.
//!
//! Plain async methods on a struct taking a request and returning a
//! response, with the service itself holding the shared state (here: the
//! registry and the host's own identity) rather than generated server
//! machinery.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use plugin_host_client::ProviderCapability;
use plugin_host_core::{
    decode_error, Call, CallStack, ErrorResponse, PluginAction, PluginError, PluginType,
};

use crate::broker_context::BrokerContext;
use crate::manager::{ManagerError, PluginFactory, PluginManager};
use crate::messages::*;

use std::sync::Arc;

tokio::task_local! {
    /// The wall-clock instant the *outermost* brokered function call in this
    /// task must finish by. Every nested `call_function` invocation that
    /// happens through further `.await`s in the same task, whether direct
    /// recursion or a cycle through several providers, sees the same
    /// value rather than getting a fresh budget, so the deadline bounds
    /// the whole chain rather than resetting at each hop.
    static CALL_DEADLINE: Instant;
}

/// Tunables for the host service's brokering behaviour.
#[derive(Debug, Clone)]
pub struct HostServiceConfig {
    /// Ceiling on an entire brokered call chain, recursive or not. Default
    /// 120s.
    pub plugin_to_plugin_call_timeout: Duration,
    /// Lower bound on how often `ResourceHasStabilised` is polled. 1ms in
    /// tests, >=100ms in production is typical; callers choose.
    pub stabilisation_poll_interval: Duration,
}

impl Default for HostServiceConfig {
    fn default() -> Self {
        Self {
            plugin_to_plugin_call_timeout: Duration::from_secs(120),
            stabilisation_poll_interval: Duration::from_millis(100),
        }
    }
}

pub struct HostService {
    host_identity: plugin_host_core::HostIdentity,
    manager: Arc<PluginManager>,
    config: HostServiceConfig,
}

impl HostService {
    pub fn new(
        host_identity: plugin_host_core::HostIdentity,
        manager: Arc<PluginManager>,
        config: HostServiceConfig,
    ) -> Self {
        Self {
            host_identity,
            manager,
            config,
        }
    }

    fn verify_host_id(&self, candidate: &str, action: PluginAction) -> Result<(), PluginError> {
        if self.host_identity.matches(candidate) {
            return Ok(());
        }
        Err(decode_error(
            ErrorResponse::unexpected(format!(
                "invalid host ID: expected {:?}, got {candidate:?}",
                self.host_identity.get()
            )),
            action,
        ))
    }

    pub async fn register(
        &self,
        req: RegisterRequest,
        factory: &dyn PluginFactory,
    ) -> RegisterResponse {
        let host_id = match self.host_identity.require() {
            Ok(id) => id.to_string(),
            Err(_) => {
                return RegisterResponse {
                    success: false,
                    message: "host identity not yet assigned".to_string(),
                    host_id: String::new(),
                }
            }
        };
        match self.manager.register(req.info, &host_id, factory).await {
            Ok(()) => {
                info!("plugin registered");
                RegisterResponse {
                    success: true,
                    message: String::new(),
                    host_id,
                }
            }
            Err(err) => RegisterResponse {
                success: false,
                message: format!("failed to register plugin due to error: {err}"),
                host_id,
            },
        }
    }

    pub fn deregister(&self, req: DeregisterRequest) -> DeregisterResponse {
        if !self.host_identity.matches(&req.host_id) {
            let expected = self.host_identity.get().unwrap_or_default();
            return DeregisterResponse {
                success: false,
                message: format!(
                    "failed to deregister plugin due to error: host id mismatch, expected {:?}, got {:?}",
                    expected, req.host_id
                ),
            };
        }
        match self.manager.deregister(req.plugin_type, &req.id) {
            Ok(()) => DeregisterResponse {
                success: true,
                message: String::new(),
            },
            Err(err) => DeregisterResponse {
                success: false,
                message: format!("failed to deregister plugin due to error: {err}"),
            },
        }
    }

    /// Finds the first registered provider reporting `has_function == true`
    /// for `function_name`. Any provider erroring mid-scan aborts the scan
    /// and propagates that error rather than being treated as "doesn't have
    /// it".
    async fn find_function_owner(
        &self,
        function_name: &str,
    ) -> Result<Option<Arc<crate::manager::PluginInstance>>, PluginError> {
        for instance in self.manager.get_plugins(PluginType::Provider) {
            let has = instance
                .client
                .as_provider()
                .has_function(function_name)
                .await?;
            if has {
                return Ok(Some(instance));
            }
        }
        Ok(None)
    }

    pub async fn call_function(
        &self,
        req: CallFunctionRequest,
    ) -> Result<serde_json::Value, PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::CallFunction)?;

        let owner = self
            .find_function_owner(&req.function_name)
            .await?
            .ok_or_else(|| {
                decode_error(
                    ErrorResponse::unexpected(format!(
                        "no provider registered function {:?}",
                        req.function_name
                    )),
                    PluginAction::CallFunction,
                )
            })?;

        let mut call_stack = CallStack::new();
        for call in &req.call_stack {
            call_stack.push(call.clone());
        }
        call_stack.push(Call::new(req.function_name.clone()));

        let dispatch = async move {
            let deadline = CALL_DEADLINE.get();
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timeout_error());
            }
            let invoke = owner
                .client
                .as_provider()
                .call_function(&req.function_name, req.args, &call_stack);
            match tokio::time::timeout(remaining, invoke).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(function = %req.function_name, "brokered call timed out");
                    Err(timeout_error())
                }
            }
        };

        if CALL_DEADLINE.try_with(|_| ()).is_ok() {
            dispatch.await
        } else {
            let deadline = Instant::now() + self.config.plugin_to_plugin_call_timeout;
            CALL_DEADLINE.scope(deadline, dispatch).await
        }
    }

    pub async fn get_function_definition(
        &self,
        req: GetFunctionDefinitionRequest,
    ) -> Result<Option<serde_json::Value>, PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::GetFunctionDefinition)?;
        for instance in self.manager.get_plugins(PluginType::Provider) {
            if let Some(def) = instance
                .client
                .as_provider()
                .get_function_definition(&req.function_name)
                .await?
            {
                return Ok(Some(def));
            }
        }
        Ok(None)
    }

    pub async fn has_function(&self, req: HasFunctionRequest) -> Result<bool, PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::HasFunction)?;
        Ok(self.find_function_owner(&req.function_name).await?.is_some())
    }

    pub async fn list_functions(
        &self,
        req: ListFunctionsRequest,
    ) -> Result<Vec<String>, PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::ListFunctions)?;
        let mut names = std::collections::BTreeSet::new();
        for instance in self.manager.get_plugins(PluginType::Provider) {
            for name in instance.client.as_provider().list_functions().await? {
                names.insert(name);
            }
        }
        Ok(names.into_iter().collect())
    }

    fn resolve_resource_provider(
        &self,
        resource_type: &str,
    ) -> Result<Arc<crate::manager::PluginInstance>, ErrorResponse> {
        let namespace = resource_type.split('/').next().unwrap_or(resource_type);
        self.manager
            .get_plugins(PluginType::Provider)
            .into_iter()
            .find(|instance| instance.info.namespace() == namespace)
            .ok_or_else(|| {
                ErrorResponse::unexpected(format!(
                    "no provider registered for resource type {resource_type:?}"
                ))
            })
    }

    pub async fn deploy_resource(
        &self,
        req: DeployResourceRequest,
        ctx: &BrokerContext,
    ) -> Result<serde_json::Value, PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::DeployResource)?;

        let provider = self
            .resolve_resource_provider(&req.resource_type)
            .map_err(|resp| decode_error(resp, PluginAction::DeployResource))?;

        let remaining = ctx.remaining();
        let deploy = provider.client.as_provider().deploy_resource(
            &req.resource_type,
            req.change_set,
            req.wait_until_stable,
        );
        let state = tokio::time::timeout(remaining, deploy)
            .await
            .map_err(|_| decode_error(timeout_response(), PluginAction::DeployResource))??;

        if req.wait_until_stable {
            let instance_id = state
                .get("instance_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            self.poll_until_stable(&provider, &req.resource_type, &instance_id, ctx)
                .await?;
        }

        Ok(state)
    }

    async fn poll_until_stable(
        &self,
        provider: &Arc<crate::manager::PluginInstance>,
        resource_type: &str,
        instance_id: &str,
        ctx: &BrokerContext,
    ) -> Result<(), PluginError> {
        let deadline_fut = async {
            loop {
                let stabilised = provider
                    .client
                    .as_provider()
                    .resource_has_stabilised(resource_type, instance_id)
                    .await?;
                if stabilised {
                    return Ok(());
                }
                tokio::time::sleep(self.config.stabilisation_poll_interval).await;
            }
        };
        tokio::time::timeout(ctx.remaining(), deadline_fut)
            .await
            .map_err(|_| decode_error(timeout_response(), PluginAction::DeployResource))?
    }

    pub async fn destroy_resource(
        &self,
        req: DestroyResourceRequest,
        ctx: &BrokerContext,
    ) -> Result<(), PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::DestroyResource)?;

        let provider = self
            .resolve_resource_provider(&req.resource_type)
            .map_err(|resp| decode_error(resp, PluginAction::DestroyResource))?;

        let remaining = ctx.remaining();
        let destroy = provider
            .client
            .as_provider()
            .destroy_resource(&req.resource_type, &req.instance_id);
        tokio::time::timeout(remaining, destroy)
            .await
            .map_err(|_| decode_error(timeout_response(), PluginAction::DestroyResource))??;
        Ok(())
    }

    /// Graceful shutdown: deregisters and closes every plugin connection so
    /// the host process can exit cleanly.
    pub async fn shutdown(&self, req: ShutdownRequest) -> Result<(), PluginError> {
        self.verify_host_id(&req.host_id, PluginAction::Deregister)?;
        for plugin_type in [PluginType::Provider, PluginType::Transformer] {
            for instance in self.manager.get_plugins(plugin_type) {
                debug!(id = %instance.info.id, "deregistering plugin for shutdown");
                let _ = self.manager.deregister(plugin_type, &instance.info.id);
            }
        }
        Ok(())
    }
}

fn timeout_response() -> ErrorResponse {
    ErrorResponse::transient("context deadline exceeded")
}

fn timeout_error() -> PluginError {
    decode_error(timeout_response(), PluginAction::CallFunction)
}

impl From<ManagerError> for PluginError {
    fn from(err: ManagerError) -> Self {
        decode_error(ErrorResponse::unexpected(err.to_string()), PluginAction::Register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plugin_host_client::PluginClient;
    use plugin_host_core::{HostIdentity, PluginInstanceInfo, ProtocolVersion, Transport};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubProvider {
        functions: Vec<&'static str>,
        call_count: Arc<AtomicU32>,
        recurse_into: Option<Arc<tokio::sync::Mutex<Option<Arc<HostService>>>>>,
        /// Number of `resource_has_stabilised` polls that report `false`
        /// before the next one reports `true`. `u32::MAX` never stabilises.
        stabilise_after: u32,
        /// Every `resource_has_stabilised` call, for assertions on how many
        /// times `poll_until_stable` looped.
        stabilise_polls: Arc<AtomicU32>,
    }

    impl Default for StubProvider {
        fn default() -> Self {
            Self {
                functions: Vec::new(),
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: None,
                stabilise_after: 0,
                stabilise_polls: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl ProviderCapability for StubProvider {
        async fn call_function(
            &self,
            function_name: &str,
            args: serde_json::Value,
            _call_stack: &CallStack,
        ) -> Result<serde_json::Value, PluginError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match function_name {
                "trim_suffix" => {
                    let arr = args.as_array().cloned().unwrap_or_default();
                    let input = arr.first().and_then(|v| v.as_str()).unwrap_or("");
                    let suffix = arr.get(1).and_then(|v| v.as_str()).unwrap_or("");
                    Ok(serde_json::json!(input.trim_end_matches(suffix)))
                }
                "trim_space_and_suffix" => {
                    let arr = args.as_array().cloned().unwrap_or_default();
                    let input = arr.first().and_then(|v| v.as_str()).unwrap_or("").trim();
                    let suffix = arr.get(1).and_then(|v| v.as_str()).unwrap_or("");
                    if let Some(recurse) = &self.recurse_into {
                        let host = recurse.lock().await.clone().unwrap();
                        let result = host
                            .call_function(CallFunctionRequest {
                                host_id: host.host_identity.require().unwrap().to_string(),
                                function_name: "trim_suffix".to_string(),
                                args: serde_json::json!([input, suffix]),
                                call_stack: vec![],
                            })
                            .await?;
                        return Ok(result);
                    }
                    Ok(serde_json::json!(input.trim_end_matches(suffix)))
                }
                "call_self" => {
                    let recurse = self.recurse_into.as_ref().unwrap();
                    let host = recurse.lock().await.clone().unwrap();
                    // A forced yield between recursion levels keeps this
                    // bounded to a handful of stack frames before the
                    // shared deadline (see `CALL_DEADLINE`) cuts it off,
                    // instead of spinning thousands of frames deep.
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    let req = CallFunctionRequest {
                        host_id: host.host_identity.require().unwrap().to_string(),
                        function_name: "call_self".to_string(),
                        args: serde_json::Value::Null,
                        call_stack: vec![],
                    };
                    host.call_function(req).await
                }
                other => Err(decode_error(
                    ErrorResponse::unexpected(format!("unknown function {other}")),
                    PluginAction::CallFunction,
                )),
            }
        }

        async fn get_function_definition(
            &self,
            _function_name: &str,
        ) -> Result<Option<serde_json::Value>, PluginError> {
            Ok(None)
        }

        async fn has_function(&self, function_name: &str) -> Result<bool, PluginError> {
            Ok(self.functions.contains(&function_name))
        }

        async fn list_functions(&self) -> Result<Vec<String>, PluginError> {
            Ok(self.functions.iter().map(|s| s.to_string()).collect())
        }

        async fn deploy_resource(
            &self,
            _resource_type: &str,
            _change_set: serde_json::Value,
            _wait_until_stable: bool,
        ) -> Result<serde_json::Value, PluginError> {
            Ok(serde_json::json!({ "instance_id": "i-1" }))
        }

        async fn destroy_resource(
            &self,
            _resource_type: &str,
            _instance_id: &str,
        ) -> Result<(), PluginError> {
            Ok(())
        }

        async fn resource_has_stabilised(
            &self,
            _resource_type: &str,
            _instance_id: &str,
        ) -> Result<bool, PluginError> {
            let call_index = self.stabilise_polls.fetch_add(1, Ordering::SeqCst);
            Ok(call_index >= self.stabilise_after)
        }

        async fn list_resource_types(&self) -> Result<Vec<String>, PluginError> {
            Ok(vec![])
        }
        async fn list_data_sources(&self) -> Result<Vec<String>, PluginError> {
            Ok(vec![])
        }
        async fn list_links(&self) -> Result<Vec<String>, PluginError> {
            Ok(vec![])
        }
        async fn list_custom_variable_types(&self) -> Result<Vec<String>, PluginError> {
            Ok(vec![])
        }
    }

    struct NullFactory;
    #[async_trait]
    impl PluginFactory for NullFactory {
        async fn build(
            &self,
            _info: &PluginInstanceInfo,
            _host_id: &str,
        ) -> Result<(PluginClient, crate::manager::CloseConn), ManagerError> {
            unreachable!("tests insert instances directly via the manager's register path")
        }
    }

    fn make_host(manager: Arc<PluginManager>) -> (plugin_host_core::HostIdentity, HostService) {
        let identity = HostIdentity::unset();
        identity.set("host-1").unwrap();
        let service = HostService::new(identity.clone(), manager, HostServiceConfig::default());
        (identity, service)
    }

    async fn register_stub(
        manager: &PluginManager,
        id: &str,
        provider: StubProvider,
    ) {
        struct DirectFactory(Arc<std::sync::Mutex<Option<StubProvider>>>);
        #[async_trait]
        impl PluginFactory for DirectFactory {
            async fn build(
                &self,
                _info: &PluginInstanceInfo,
                _host_id: &str,
            ) -> Result<(PluginClient, crate::manager::CloseConn), ManagerError> {
                let provider = self.0.lock().unwrap().take().unwrap();
                Ok((PluginClient::Provider(Arc::new(provider)), Box::new(|| {})))
            }
        }
        let factory = DirectFactory(Arc::new(std::sync::Mutex::new(Some(provider))));
        manager
            .register(
                PluginInstanceInfo {
                    plugin_type: PluginType::Provider,
                    id: id.to_string(),
                    instance_id: "inst".to_string(),
                    protocol_versions: vec![ProtocolVersion::new("1.0")],
                    transport: Transport::Tcp(0),
                    metadata: None,
                },
                "host-1",
                &factory,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn deregister_with_wrong_host_id_reports_mismatch_and_leaves_plugin() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        register_stub(
            &manager,
            "celerity/aws",
            StubProvider {
                functions: vec![],
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: None,
                ..Default::default()
            },
        )
        .await;
        let (_identity, host) = make_host(Arc::clone(&manager));

        let resp = host.deregister(DeregisterRequest {
            host_id: "H2".to_string(),
            plugin_type: PluginType::Provider,
            id: "celerity/aws".to_string(),
        });

        assert!(!resp.success);
        assert!(resp.message.contains("host id mismatch"));
        assert!(manager.get_plugin(PluginType::Provider, "celerity/aws").is_some());
    }

    #[tokio::test]
    async fn cross_plugin_function_call_delegates_and_returns_trimmed_value() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        let identity = HostIdentity::unset();
        identity.set("host-1").unwrap();
        let host = Arc::new(HostService::new(
            identity.clone(),
            Arc::clone(&manager),
            HostServiceConfig::default(),
        ));
        let recurse_slot = Arc::new(tokio::sync::Mutex::new(Some(Arc::clone(&host))));

        register_stub(
            &manager,
            "celerity/strings",
            StubProvider {
                functions: vec!["trim_suffix", "trim_space_and_suffix"],
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: Some(recurse_slot),
                ..Default::default()
            },
        )
        .await;

        let result = host
            .call_function(CallFunctionRequest {
                host_id: "host-1".to_string(),
                function_name: "trim_space_and_suffix".to_string(),
                args: serde_json::json!(["   localhost:3000 ", ":3000"]),
                call_stack: vec![],
            })
            .await
            .unwrap();

        assert_eq!(result, serde_json::json!("localhost"));
    }

    #[tokio::test]
    async fn self_recursive_call_times_out() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        let identity = HostIdentity::unset();
        identity.set("host-1").unwrap();
        let host = Arc::new(HostService::new(
            identity.clone(),
            Arc::clone(&manager),
            HostServiceConfig {
                plugin_to_plugin_call_timeout: Duration::from_millis(30),
                ..HostServiceConfig::default()
            },
        ));
        let recurse_slot = Arc::new(tokio::sync::Mutex::new(Some(Arc::clone(&host))));

        register_stub(
            &manager,
            "celerity/recursive",
            StubProvider {
                functions: vec!["call_self"],
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: Some(recurse_slot),
                ..Default::default()
            },
        )
        .await;

        let err = host
            .call_function(CallFunctionRequest {
                host_id: "host-1".to_string(),
                function_name: "call_self".to_string(),
                args: serde_json::Value::Null,
                call_stack: vec![],
            })
            .await
            .unwrap_err();

        assert!(err.response().message.contains("context deadline exceeded"));
    }

    #[tokio::test]
    async fn list_functions_deduplicates_across_providers() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        register_stub(
            &manager,
            "celerity/a",
            StubProvider {
                functions: vec!["shared", "only_a"],
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: None,
                ..Default::default()
            },
        )
        .await;
        register_stub(
            &manager,
            "celerity/b",
            StubProvider {
                functions: vec!["shared", "only_b"],
                call_count: Arc::new(AtomicU32::new(0)),
                recurse_into: None,
                ..Default::default()
            },
        )
        .await;
        let (_identity, host) = make_host(manager);

        let names = host
            .list_functions(ListFunctionsRequest {
                host_id: "host-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(names, vec!["only_a", "only_b", "shared"]);
    }

    #[tokio::test]
    async fn deploy_resource_resolves_provider_by_namespace_and_skips_polling() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        register_stub(
            &manager,
            "celerity/aws",
            StubProvider {
                ..Default::default()
            },
        )
        .await;
        let (_identity, host) = make_host(manager);
        let ctx = BrokerContext::new(Duration::from_secs(5));

        let state = host
            .deploy_resource(
                DeployResourceRequest {
                    host_id: "host-1".to_string(),
                    resource_type: "aws/function".to_string(),
                    change_set: serde_json::json!({}),
                    wait_until_stable: false,
                },
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(state, serde_json::json!({ "instance_id": "i-1" }));
    }

    #[tokio::test]
    async fn deploy_resource_with_wait_until_stable_loops_until_stabilised() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        let stabilise_polls = Arc::new(AtomicU32::new(0));
        register_stub(
            &manager,
            "celerity/aws",
            StubProvider {
                stabilise_after: 2,
                stabilise_polls: Arc::clone(&stabilise_polls),
                ..Default::default()
            },
        )
        .await;
        let host = HostService::new(
            {
                let identity = HostIdentity::unset();
                identity.set("host-1").unwrap();
                identity
            },
            Arc::clone(&manager),
            HostServiceConfig {
                stabilisation_poll_interval: Duration::from_millis(1),
                ..HostServiceConfig::default()
            },
        );
        let ctx = BrokerContext::new(Duration::from_secs(5));

        let state = host
            .deploy_resource(
                DeployResourceRequest {
                    host_id: "host-1".to_string(),
                    resource_type: "aws/function".to_string(),
                    change_set: serde_json::json!({}),
                    wait_until_stable: true,
                },
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(state, serde_json::json!({ "instance_id": "i-1" }));
        assert!(stabilise_polls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn deploy_resource_wraps_stabilisation_timeout_as_resource_deploy_error() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        register_stub(
            &manager,
            "celerity/aws",
            StubProvider {
                stabilise_after: u32::MAX,
                ..Default::default()
            },
        )
        .await;
        let host = HostService::new(
            {
                let identity = HostIdentity::unset();
                identity.set("host-1").unwrap();
                identity
            },
            Arc::clone(&manager),
            HostServiceConfig {
                stabilisation_poll_interval: Duration::from_millis(1),
                ..HostServiceConfig::default()
            },
        );
        let ctx = BrokerContext::new(Duration::from_millis(20));

        let err = host
            .deploy_resource(
                DeployResourceRequest {
                    host_id: "host-1".to_string(),
                    resource_type: "aws/function".to_string(),
                    change_set: serde_json::json!({}),
                    wait_until_stable: true,
                },
                &ctx,
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PluginError::Deployment(plugin_host_core::DeploymentError::ResourceDeployError(_))
        ));
        assert!(err.response().message.contains("context deadline exceeded"));
    }

    #[tokio::test]
    async fn destroy_resource_resolves_provider_by_namespace() {
        let manager = Arc::new(PluginManager::new(vec![ProtocolVersion::new("1.0")]));
        register_stub(
            &manager,
            "celerity/aws",
            StubProvider {
                ..Default::default()
            },
        )
        .await;
        let (_identity, host) = make_host(manager);
        let ctx = BrokerContext::new(Duration::from_secs(5));

        host.destroy_resource(
            DestroyResourceRequest {
                host_id: "host-1".to_string(),
                resource_type: "aws/function".to_string(),
                instance_id: "i-1".to_string(),
            },
            &ctx,
        )
        .await
        .unwrap();
    }
}
