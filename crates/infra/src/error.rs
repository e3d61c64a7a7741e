//! Per-submission failure taxonomy.

use thiserror::Error;

use stockguard_core::DomainError;
use stockguard_events::AbortReason;

use crate::record_store::RecordStoreError;

/// Why a submission could not be checked or reconciled.
///
/// Contained per submission: callers turn it into an abort or a warning,
/// never into a crash of the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// No inventory record carries the item code.
    #[error("no inventory record for item `{item_code}`")]
    NotFound { item_code: String },

    /// Requested quantity exceeds current stock (before-commit only).
    #[error("insufficient stock for item `{item_code}`: requested {requested}, available {available}")]
    InsufficientStock {
        item_code: String,
        requested: i64,
        available: i64,
    },

    /// Order payload lacks a field, or a field has the wrong type.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Any remote fault, including write conflicts.
    #[error("remote fault: {0}")]
    Remote(#[from] RecordStoreError),
}

impl From<DomainError> for ReservationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::MalformedInput(msg) | DomainError::Validation(msg) => {
                ReservationError::MalformedInput(msg)
            }
        }
    }
}

impl ReservationError {
    /// Abort reason shown to the submitting user. Remote detail is dropped.
    pub fn abort_reason(&self) -> AbortReason {
        match self {
            ReservationError::NotFound { item_code } => AbortReason::ItemNotFound {
                item_code: item_code.clone(),
            },
            ReservationError::InsufficientStock {
                item_code,
                requested,
                available,
            } => AbortReason::InsufficientStock {
                item_code: item_code.clone(),
                requested: *requested,
                available: *available,
            },
            ReservationError::MalformedInput(detail) => AbortReason::MalformedInput {
                detail: detail.clone(),
            },
            ReservationError::Remote(_) => AbortReason::SystemError,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ReservationError::Remote(_))
    }
}
