//! Compliance Gate (spec §4.2): two pure predicates and one side-effecting
//! notifier, consulted synchronously by the matching engine — once per
//! submission (the predicates, in conjunction) and once per executed
//! trade (the reporter).
//!
//! This is the stable abstraction real KYC/risk backends sit behind; the
//! default policy here accepts everything and only logs.

use crate::audit::{AuditEvent, AuditSink};
use crate::types::Trade;
use std::sync::Arc;

pub trait ComplianceGate: Send + Sync {
    /// Rejects a null/empty user id. Default policy: accept.
    fn is_user_compliant(&self, user_id: &str) -> bool;
    /// Pre-trade check on the incoming order. Default policy: accept.
    fn pre_trade_check(&self, order: &crate::types::Order) -> bool;
    /// Side-effecting notification for an executed trade.
    fn report_trade(&self, trade: &Trade);
}

/// Accept-all compliance policy. Rejects only the structurally invalid
/// case spec §4.2 names (empty user id); logs every reported trade via
/// the configured [`AuditSink`]. `pre_trade_check` always accepts — it is
/// the seam a real KYC/risk backend replaces, not a duplicate of the
/// caller's own price/quantity precondition (`MatchingEngine::process_order`
/// already rejects non-positive price/quantity as `InvalidInput` before
/// this gate is ever consulted).
pub struct DefaultComplianceGate {
    sink: Arc<dyn AuditSink>,
}

impl DefaultComplianceGate {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }
}

impl ComplianceGate for DefaultComplianceGate {
    fn is_user_compliant(&self, user_id: &str) -> bool {
        !user_id.trim().is_empty()
    }

    fn pre_trade_check(&self, _order: &crate::types::Order) -> bool {
        true
    }

    fn report_trade(&self, trade: &Trade) {
        self.sink.emit(&AuditEvent::now(
            "compliance",
            "trade_reported",
            Some(serde_json::json!({ "trade_id": trade.id.to_string() })),
            "success",
        ));
    }
}

/// Always-accept, non-reporting compliance gate used when compliance is
/// disabled entirely (`EngineConfig::disable_compliance`). Unlike
/// [`DefaultComplianceGate`] it accepts even a blank user id and emits no
/// audit events — there is no policy to report against.
pub struct NoopComplianceGate;

impl ComplianceGate for NoopComplianceGate {
    fn is_user_compliant(&self, _user_id: &str) -> bool {
        true
    }

    fn pre_trade_check(&self, _order: &crate::types::Order) -> bool {
        true
    }

    fn report_trade(&self, _trade: &Trade) {}
}
