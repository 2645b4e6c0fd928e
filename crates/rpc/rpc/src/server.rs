use crate::{OrnodeRpc, RpcConfig, RpcServerError};
use jsonrpsee::{
    server::{Server, ServerHandle},
    RpcModule,
};
use ornode_chain::ChainReader;
use ornode_rpc_api::{OrnodeAdminApiServer, OrnodeApiServer};
use ornode_storage::OrDb;
use ornode_sync::ProposalSyncService;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// A running RPC server.
#[derive(Debug, Clone)]
pub struct RpcServerHandle {
    addr: SocketAddr,
    handle: ServerHandle,
}

impl RpcServerHandle {
    /// Returns the address the server is bound to.
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Tells the server to stop. Returns false if it was already stopped.
    pub fn stop(&self) -> bool {
        self.handle.stop().is_ok()
    }

    /// Resolves once the server has stopped.
    pub async fn stopped(self) {
        self.handle.stopped().await
    }
}

/// Builds the module of all namespaces enabled in `config`.
pub fn ornode_module<DB, C>(
    api: OrnodeRpc<DB, C>,
    config: &RpcConfig,
) -> Result<RpcModule<()>, RpcServerError>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader + 'static,
{
    let mut module = RpcModule::new(());
    if config.enable_admin {
        module.merge(OrnodeAdminApiServer::into_rpc(api.clone()))?;
    }
    module.merge(OrnodeApiServer::into_rpc(api))?;
    Ok(module)
}

/// Binds the server to the configured address and starts serving `service`.
pub async fn launch<DB, C>(
    config: &RpcConfig,
    service: Arc<ProposalSyncService<DB, C>>,
) -> Result<RpcServerHandle, RpcServerError>
where
    DB: OrDb + Clone + 'static,
    C: ChainReader + 'static,
{
    let module = ornode_module(OrnodeRpc::new(service), config)?;
    let server = Server::builder()
        .max_connections(config.max_connections)
        .build(config.addr)
        .await
        .map_err(RpcServerError::Bind)?;
    let addr = server.local_addr().map_err(RpcServerError::Bind)?;
    let handle = server.start(module);

    info!(target: "ornode::rpc", %addr, admin = config.enable_admin, "RPC server started");
    Ok(RpcServerHandle { addr, handle })
}
