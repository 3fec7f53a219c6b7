//! # Node Runtime
//!
//! Wires one role's subsystems together and owns their background tasks.

use crate::config::{NodeConfig, NodeRole};
use anyhow::{Context, Result};
use mc_02_ledger::JsonFileLedgerStore;
use mc_03_authority::{AuthorityHandle, KeyPairSigner, SystemClock};
use mc_04_chain_sync::{ClientNode, HttpAuthorityConnection};
use mc_05_patient_index::{JsonFilePatientStore, PatientRegistry};
use mc_06_api_gateway::{
    authority_router, client_router, serve_on, AuthorityState, ClientState, GatewayError,
};
use shared_crypto::{Ed25519KeyPair, SymmetricKey};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

enum RoleTasks {
    Authority(AuthorityHandle),
    Client {
        node: Arc<ClientNode>,
        sync_loop: JoinHandle<()>,
    },
}

/// A started node. Dropping it without [`NodeRuntime::shutdown`] leaves
/// the tasks running until the runtime exits.
pub struct NodeRuntime {
    role: NodeRole,
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    tasks: RoleTasks,
    server: JoinHandle<std::result::Result<(), GatewayError>>,
}

/// Registry persisted to `patients_file` under the configured key, or an
/// in-memory one when no key is set.
fn open_registry(config: &NodeConfig) -> Result<PatientRegistry> {
    match &config.registry_key {
        Some(key) => {
            info!("[mc-05] Patient file: {}", config.patients_file.display());
            PatientRegistry::open(
                SymmetricKey::from_bytes(key.expose()),
                Arc::new(JsonFilePatientStore::new(&config.patients_file)),
            )
            .context("failed to open patient registry")
        }
        None => {
            warn!("[mc-05] MC_REGISTRY_KEY not set, patient registry is ephemeral");
            Ok(PatientRegistry::ephemeral())
        }
    }
}

impl NodeRuntime {
    /// Start every task for `config.role` and bind the HTTP gateway.
    pub async fn start(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid node configuration")?;
        info!("===========================================");
        info!("  Med-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Role: {}", config.role);
        info!("===========================================");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (tasks, router) = match config.role {
            NodeRole::Authority => {
                let keypair = match &config.authority_seed {
                    Some(seed) => Ed25519KeyPair::from_seed(seed.expose()),
                    None => {
                        warn!("[mc-03] MC_AUTHORITY_SEED not set, signing with a fresh key");
                        Ed25519KeyPair::generate()
                    }
                };
                let registry = open_registry(&config)?;

                let store = Arc::new(JsonFileLedgerStore::new(&config.data_file));
                info!("[mc-02] Chain file: {}", config.data_file.display());

                let handle = AuthorityHandle::start(
                    config.authority.clone(),
                    Arc::new(KeyPairSigner::new(keypair)),
                    Arc::new(SystemClock),
                    store,
                    shutdown_rx.clone(),
                )
                .context("failed to start authority")?;

                let state = AuthorityState {
                    engine: Arc::clone(&handle.engine),
                    registry: Arc::new(registry),
                };
                (
                    RoleTasks::Authority(handle),
                    authority_router(state, &config.gateway),
                )
            }
            NodeRole::Client => {
                let connection = HttpAuthorityConnection::new(&config.sync)
                    .context("failed to build authority connection")?;
                let node = Arc::new(ClientNode::new(config.sync.clone(), Arc::new(connection)));
                if let Err(e) = node.discover_authority().await {
                    warn!("[mc-04] Authority not reachable yet, will retry: {}", e);
                }
                let sync_loop = Arc::clone(&node).spawn(shutdown_rx.clone());
                let state = ClientState {
                    node: Arc::clone(&node),
                };
                (
                    RoleTasks::Client { node, sync_loop },
                    client_router(state, &config.gateway),
                )
            }
        };

        let listener = TcpListener::bind(config.gateway.http_addr)
            .await
            .with_context(|| format!("failed to bind {}", config.gateway.http_addr))?;
        let local_addr = listener.local_addr()?;
        let server = tokio::spawn(serve_on(listener, router, shutdown_rx));

        info!("Node is serving on {}", local_addr);
        Ok(Self {
            role: config.role,
            local_addr,
            shutdown_tx,
            tasks,
            server,
        })
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Bound HTTP address; differs from the configured one when port 0 was asked for.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Blocks on the local ledger.
    pub fn height(&self) -> usize {
        match &self.tasks {
            RoleTasks::Authority(handle) => handle.engine.height(),
            RoleTasks::Client { node, .. } => node.height(),
        }
    }

    /// Signal every task and wait for them to finish.
    pub async fn shutdown(self) -> Result<()> {
        info!("Initiating graceful shutdown...");
        if self.shutdown_tx.send(true).is_err() {
            warn!("All tasks already stopped");
        }

        match self.server.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("[mc-06] Gateway stopped with error: {}", e),
            Err(e) => error!("[mc-06] Gateway task panicked: {}", e),
        }

        match self.tasks {
            RoleTasks::Authority(handle) => handle.join().await,
            RoleTasks::Client { sync_loop, .. } => {
                if let Err(e) = sync_loop.await {
                    error!("[mc-04] Sync loop panicked: {}", e);
                }
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}
