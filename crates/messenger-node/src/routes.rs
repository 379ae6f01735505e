use crate::{
    constants::{MSG_CHAIN_INVALID, MSG_CHAIN_VALID, MSG_FIELDS_REQUIRED, MSG_RESOLVED},
    page::{self, PageView},
};
use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use messenger_core::{Block, Chain, ChainStats, Transaction};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<RwLock<Chain>>,
}

impl AppState {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain: Arc::new(RwLock::new(chain)),
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Head {
    height: u64,
    hash: Option<String>,
}

#[derive(Serialize)]
struct Validity {
    valid: bool,
    error: Option<String>,
}

/// Form and JSON body for a new message. Missing fields deserialize as empty.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageIn {
    pub sender: String,
    pub receiver: String,
    pub message: String,
}

impl MessageIn {
    fn is_complete(&self) -> bool {
        !(self.sender.is_empty() || self.receiver.is_empty() || self.message.is_empty())
    }

    /// Fill fields left empty in `self` from `fallback`.
    fn fill_from(self, fallback: MessageIn) -> MessageIn {
        let pick = |own: String, other: String| if own.is_empty() { other } else { own };
        MessageIn {
            sender: pick(self.sender, fallback.sender),
            receiver: pick(self.receiver, fallback.receiver),
            message: pick(self.message, fallback.message),
        }
    }

    fn into_transaction(self) -> Transaction {
        Transaction::new(self.sender, self.receiver, self.message)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(messenger_page))
        .route("/message", post(handle_message))
        .route("/validate", post(handle_validation))
        .route("/resolve", post(handle_resolution))
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/chain", get(chain_blocks))
        .route("/chain/head", get(chain_head))
        .route("/chain/stats", get(chain_stats))
        .route("/chain/validate", get(chain_validity))
        .route("/tx", post(submit_tx))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn messenger_page(State(state): State<AppState>) -> Html<String> {
    let chain = state.chain.read().await;
    Html(page::render(&chain, &PageView::default()))
}

/// Body fields win over query-string fields. A body that is not a form
/// (wrong or missing content type) counts as empty.
async fn handle_message(
    State(state): State<AppState>,
    query: Result<Query<MessageIn>, QueryRejection>,
    body: Result<Form<MessageIn>, FormRejection>,
) -> Html<String> {
    let body = body.map(|Form(f)| f).unwrap_or_else(|rejection| {
        debug!(%rejection, "message body is not a form");
        MessageIn::default()
    });
    let form = body.fill_from(query.map(|Query(q)| q).unwrap_or_default());
    if !form.is_complete() {
        let chain = state.chain.read().await;
        return Html(page::render(
            &chain,
            &PageView {
                status: MSG_FIELDS_REQUIRED,
                sender: &form.sender,
                receiver: &form.receiver,
            },
        ));
    }

    let mut chain = state.chain.write().await;
    let status = match chain.append(vec![form.into_transaction()]) {
        Ok(index) => {
            info!(index, "message recorded");
            String::new()
        }
        Err(err) => {
            warn!(%err, "message rejected");
            err.to_string()
        }
    };
    Html(page::render(
        &chain,
        &PageView {
            status: &status,
            ..PageView::default()
        },
    ))
}

async fn handle_validation(State(state): State<AppState>) -> Html<String> {
    let chain = state.chain.read().await;
    let status = if chain.validate() {
        MSG_CHAIN_VALID
    } else {
        MSG_CHAIN_INVALID
    };
    Html(page::render(
        &chain,
        &PageView {
            status,
            ..PageView::default()
        },
    ))
}

async fn handle_resolution(State(state): State<AppState>) -> Html<String> {
    let mut chain = state.chain.write().await;
    chain.resolve();
    Html(page::render(
        &chain,
        &PageView {
            status: MSG_RESOLVED,
            ..PageView::default()
        },
    ))
}

async fn chain_blocks(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.chain.read().await.blocks().to_vec())
}

async fn chain_head(State(state): State<AppState>) -> Json<Head> {
    let chain = state.chain.read().await;
    Json(Head {
        height: chain.last().map(|b| b.index).unwrap_or(0),
        hash: chain.last().map(|b| b.hash.clone()),
    })
}

async fn chain_stats(State(state): State<AppState>) -> Json<ChainStats> {
    Json(state.chain.read().await.stats())
}

async fn chain_validity(State(state): State<AppState>) -> Json<Validity> {
    let result = state.chain.read().await.verify();
    Json(Validity {
        valid: result.is_ok(),
        error: result.err().map(|e| e.to_string()),
    })
}

async fn submit_tx(
    State(state): State<AppState>,
    Json(tx): Json<MessageIn>,
) -> (StatusCode, Json<serde_json::Value>) {
    if !tx.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "accepted": false, "error": MSG_FIELDS_REQUIRED })),
        );
    }
    let mut chain = state.chain.write().await;
    match chain.append(vec![tx.into_transaction()]) {
        Ok(index) => (
            StatusCode::OK,
            Json(serde_json::json!({ "accepted": true, "index": index })),
        ),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "accepted": false, "error": err.to_string() })),
        ),
    }
}
