//! Error taxonomy for the matching engine and ledger (spec §7).
//!
//! `InvalidInput` and `ComplianceRejected` are expected control-flow
//! outcomes; `StoreUnavailable` propagates a fatal store failure;
//! `MalformedRecord` is logged and swallowed at the point it occurs (it
//! never reaches a caller as an `Err` — see [`crate::ledger`] and
//! [`crate::matching`]); `InternalEncodeError` signals a programming bug.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("compliance rejected order for user {user_id}")]
    ComplianceRejected { user_id: String },

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal encode error: {0}")]
    InternalEncodeError(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => EngineError::StoreUnavailable(msg),
        }
    }
}
