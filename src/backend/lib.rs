// src/backend/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use api::Registry;
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use services::summary::summarize_payment;
