//! Route tables and handlers for both node roles.

use crate::domain::config::GatewayConfig;
use crate::domain::error::ApiError;
use crate::domain::types::{
    AddPatientRequest, AddPatientResponse, HealthResponse, PatientQuery, SubmitResponse,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use mc_03_authority::{AuthorityEngine, SubmitOutcome};
use mc_04_chain_sync::{handle_sync, ClientNode, PublicKeyResponse, SyncRequest, SyncResponse};
use mc_05_patient_index::{transactions_for, PatientId, PatientRegistry};
use shared_types::{Block, Transaction};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared state of the authority router
#[derive(Clone)]
pub struct AuthorityState {
    pub engine: Arc<AuthorityEngine>,
    pub registry: Arc<PatientRegistry>,
}

/// Shared state of the client router
#[derive(Clone)]
pub struct ClientState {
    pub node: Arc<ClientNode>,
}

pub fn authority_router(state: AuthorityState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/addTransaction", post(add_transaction))
        .route("/createBlock", post(create_block))
        .route("/getBlockchain", get(get_blockchain))
        .route("/sync", post(sync))
        .route("/getPublicKey", get(get_public_key))
        .route("/getTransactionPool", get(get_transaction_pool))
        .route("/getPatientTransactions", get(get_patient_transactions))
        .route("/addPatient", post(add_patient))
        .route("/health", get(authority_health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn client_router(state: ClientState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/addTransaction", post(forward_transaction))
        .route("/getBlockchain", get(client_blockchain))
        .route("/health", get(client_health))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn add_transaction(
    State(state): State<AuthorityState>,
    body: Result<Json<Transaction>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(tx) = body?;
    let transaction_hash = tx.hash_hex();

    let response = match state.engine.submit(tx)? {
        SubmitOutcome::Pooled { pending } => SubmitResponse {
            transaction_hash,
            status: "pooled".into(),
            pending: Some(pending),
            block_id: None,
        },
        SubmitOutcome::Sealed(block) => SubmitResponse {
            transaction_hash,
            status: "sealed".into(),
            pending: Some(0),
            block_id: Some(block.id),
        },
    };
    Ok(Json(response))
}

async fn create_block(State(state): State<AuthorityState>) -> Result<Json<Block>, ApiError> {
    let block = state.engine.seal_block()?;
    info!("[mc-06] Block {} sealed on request", block.id);
    Ok(Json(block))
}

async fn get_blockchain(State(state): State<AuthorityState>) -> Json<Vec<Block>> {
    Json(state.engine.blocks())
}

async fn sync(
    State(state): State<AuthorityState>,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncResponse>, ApiError> {
    let Json(request) = body?;
    let response = state
        .engine
        .with_ledger(|ledger| handle_sync(ledger, &request))?;
    debug!("[mc-06] Sync served {} blocks", response.blocks.len());
    Ok(Json(response))
}

async fn get_public_key(State(state): State<AuthorityState>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.engine.public_key(),
    })
}

async fn get_transaction_pool(
    State(state): State<AuthorityState>,
) -> Json<BTreeMap<String, Transaction>> {
    Json(
        state
            .engine
            .pending_transactions()
            .into_iter()
            .map(|tx| (tx.hash_hex(), tx))
            .collect(),
    )
}

async fn get_patient_transactions(
    State(state): State<AuthorityState>,
    query: Result<Query<PatientQuery>, QueryRejection>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let Query(query) = query?;
    let id = PatientId::from_hex(&query.patient_id);
    let transactions = state
        .engine
        .with_ledger(|ledger| transactions_for(ledger, &state.registry, &id))?;
    Ok(Json(transactions))
}

async fn add_patient(
    State(state): State<AuthorityState>,
    body: Result<Json<AddPatientRequest>, JsonRejection>,
) -> Result<Json<AddPatientResponse>, ApiError> {
    let Json(request) = body?;
    let patient_id = state
        .registry
        .add_patient(&request.profile, request.public_key)?;
    Ok(Json(AddPatientResponse { patient_id }))
}

async fn authority_health(State(state): State<AuthorityState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        role: "authority".into(),
        height: state.engine.height(),
    })
}

async fn forward_transaction(
    State(state): State<ClientState>,
    body: Result<Json<Transaction>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(tx) = body?;
    tx.verify()
        .map_err(|e| ApiError::InvalidTransaction(e.to_string()))?;
    state.node.forward_transaction(&tx).await?;
    Ok(Json(SubmitResponse {
        transaction_hash: tx.hash_hex(),
        status: "forwarded".into(),
        pending: None,
        block_id: None,
    }))
}

async fn client_blockchain(State(state): State<ClientState>) -> Json<Vec<Block>> {
    Json(state.node.blocks())
}

async fn client_health(State(state): State<ClientState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        role: "client".into(),
        height: state.node.height(),
    })
}
