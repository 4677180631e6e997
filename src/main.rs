//! Demonstration HTTP binary for the matching engine.
//!
//! Wires an in-memory store and a compliance gate behind the router in
//! [`bond_matching_engine::api`]. Kubernetes-style probes hit `/health`;
//! clients submit orders via `POST /orders` and read the ledger via
//! `GET /ledger` and its convenience routes.

use bond_matching_engine::{
    api, config::EngineConfig, AuditSink, ComplianceGate, DefaultComplianceGate, InMemoryStore,
    MatchingEngine, NoopComplianceGate, StdoutAuditSink,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = EngineConfig::from_env();
    let store = Arc::new(InMemoryStore::new());
    let compliance: Arc<dyn ComplianceGate> = if config.disable_compliance {
        log::warn!("compliance gate disabled via DISABLE_COMPLIANCE");
        Arc::new(NoopComplianceGate)
    } else {
        let sink: Arc<dyn AuditSink> = Arc::new(StdoutAuditSink);
        Arc::new(DefaultComplianceGate::new(sink))
    };
    let engine = Arc::new(MatchingEngine::new(store, compliance));

    let app = api::create_router(engine);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await.expect("serve");
}
