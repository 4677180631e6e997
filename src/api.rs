//! Thin demonstration HTTP surface over the matching engine and ledger.
//!
//! The HTTP surface itself is out of core scope (spec §5 calls it an
//! external collaborator); this module exists only so the library can be
//! exercised end-to-end the way the teacher's `api.rs` exercises its
//! engine. All invariants live in [`crate::engine`] and [`crate::ledger`].

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::engine::MatchingEngine;
use crate::error::EngineError;
use crate::ledger::LedgerQuery;
use crate::types::{Instrument, Order, OrderSide};

/// Shared app state: one engine per process.
#[derive(Clone)]
pub struct AppState {
    pub(crate) engine: Arc<MatchingEngine>,
}

/// Builds the REST router with state. Returns `Router<()>` so it can be
/// passed directly to `axum::serve`.
pub fn create_router(engine: Arc<MatchingEngine>) -> Router<()> {
    let state = AppState { engine };
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(submit_order))
        .route("/ledger", get(query_ledger))
        .route("/ledger/user/:user_id", get(query_by_user))
        .route("/ledger/instrument/:instrument", get(query_by_instrument))
        .route("/ledger/today", get(query_today))
        .layer(Extension(state))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(serde::Deserialize)]
struct SubmitOrderRequest {
    instrument: String,
    side: OrderSide,
    price: Decimal,
    quantity: Decimal,
    user_id: String,
}

async fn submit_order(
    Extension(state): Extension<AppState>,
    Json(body): Json<SubmitOrderRequest>,
) -> Response {
    let order = Order::new(
        Instrument::new(body.instrument),
        body.side,
        body.price,
        body.quantity,
        body.user_id,
    );
    match state.engine.process_order(order) {
        Ok(trades) => (StatusCode::OK, Json(serde_json::json!({ "trades": trades }))).into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(serde::Deserialize, Default)]
struct LedgerQueryParams {
    user_id: Option<String>,
    instrument: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
}

impl From<LedgerQueryParams> for LedgerQuery {
    fn from(p: LedgerQueryParams) -> Self {
        LedgerQuery {
            user_id: p.user_id,
            instrument: p.instrument.map(Instrument::new),
            start_day: p.start_date,
            end_day: p.end_date,
            min_amount: p.min_amount,
            max_amount: p.max_amount,
        }
    }
}

async fn query_ledger(
    Extension(state): Extension<AppState>,
    Query(params): Query<LedgerQueryParams>,
) -> Response {
    run_query(&state, params.into())
}

async fn query_by_user(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    run_query(
        &state,
        LedgerQuery {
            user_id: Some(user_id),
            ..Default::default()
        },
    )
}

async fn query_by_instrument(
    Extension(state): Extension<AppState>,
    Path(instrument): Path<String>,
) -> Response {
    run_query(
        &state,
        LedgerQuery {
            instrument: Some(Instrument::new(instrument)),
            ..Default::default()
        },
    )
}

async fn query_today(Extension(state): Extension<AppState>) -> Response {
    let today = crate::clock::today_key();
    run_query(
        &state,
        LedgerQuery {
            start_day: Some(today.clone()),
            end_day: Some(today),
            ..Default::default()
        },
    )
}

fn run_query(state: &AppState, query: LedgerQuery) -> Response {
    match state.engine.ledger().query(&query) {
        Ok(trades) => (StatusCode::OK, Json(serde_json::json!({ "trades": trades }))).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: EngineError) -> Response {
    let status = match e {
        EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        EngineError::ComplianceRejected { .. } => StatusCode::FORBIDDEN,
        EngineError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::InternalEncodeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}
