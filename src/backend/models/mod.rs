pub mod account;
pub mod audit_log;
pub mod common;
pub mod document;
pub mod payment;
pub mod reference;

// Re-export common types/enums for easier access
pub use common::*;
