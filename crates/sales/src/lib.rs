//! Sales domain module.
//!
//! Reads the order being submitted out of the loosely structured submission
//! payload. The order itself is created and stored by the external form; this
//! crate only reads it.

pub mod order;

pub use order::{Order, OrderFields};
