//! Commands of the ornode binary.

use eyre::WrapErr;
use ornode_chain::{Contracts, HttpChain};
use ornode_config::{Config, StorageBackend, StorageConfig};
use ornode_reconciler::EventReconciler;
use ornode_storage::{MemoryOrDb, OrDb, RedbOrDb};
use std::{fmt, sync::Arc};
use tracing::info;

pub mod backfill;
pub mod config_cmd;
pub mod node;

/// Store handle shared by the reconciler and the RPC server.
pub type SharedDb = Arc<dyn OrDb>;

/// Opens the configured store.
pub fn open_store(config: &StorageConfig) -> eyre::Result<SharedDb> {
    match config.backend {
        StorageBackend::Memory => {
            info!(target: "ornode::cli", "Keeping the view in memory");
            Ok(Arc::new(MemoryOrDb::new()))
        }
        StorageBackend::Redb => {
            let db = RedbOrDb::open(&config.path)
                .wrap_err_with(|| format!("failed to open {}", config.path.display()))?;
            info!(target: "ornode::cli", path = %config.path.display(), "Opened database");
            Ok(Arc::new(db))
        }
    }
}

/// Components built from a configuration.
pub struct Components {
    /// The store.
    pub db: SharedDb,
    /// Reader of the Orec contract.
    pub chain: HttpChain,
    /// Contract addresses.
    pub contracts: Contracts,
    /// Applies events to the store.
    pub reconciler: Arc<EventReconciler<SharedDb, HttpChain>>,
}

impl Components {
    /// Opens the store and connects the chain reader.
    pub fn build(config: &Config) -> eyre::Result<Self> {
        let db = open_store(&config.storage)?;
        let contracts = config.chain.contracts();
        let chain = HttpChain::connect_http(config.chain.http_url()?, contracts);
        let reconciler = Arc::new(EventReconciler::new(
            Arc::clone(&db),
            chain.clone(),
            contracts,
            config.reconciler,
        ));
        Ok(Self { db, chain, contracts, reconciler })
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Components").field("contracts", &self.contracts).finish_non_exhaustive()
    }
}
