//! Data model, feed catalog and credit ledger for Tessera.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod model;

pub use catalog::Catalog;
pub use error::CoreError;
pub use ledger::Ledger;
