pub mod account_service;
pub mod audit_service;
pub mod document_service;
pub mod export_service;
pub mod numbering;
pub mod reference_service;
pub mod summary;
