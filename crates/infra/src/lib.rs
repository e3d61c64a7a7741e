//! Infrastructure layer: remote record store, configuration, and the two
//! order-submission stages built on top of them.

pub mod config;
pub mod error;
pub mod guard;
pub mod hooks;
pub mod reconciler;
pub mod record_store;
pub mod stock_lookup;

#[cfg(test)]
mod integration_tests;

pub use config::{GuardConfig, HttpStoreConfig};
pub use error::ReservationError;
pub use guard::PreSubmitGuard;
pub use hooks::SubmissionHooks;
pub use reconciler::{PostSubmitReconciler, ReconcileOutcome, StockUpdate};
pub use stock_lookup::StockLookup;
