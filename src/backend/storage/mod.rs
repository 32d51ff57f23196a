// src/backend/storage/mod.rs
// Persisted state of the registry, kept in ic-stable-structures memory.

pub mod memory;
pub mod sequences;
pub mod storable;
pub mod structures;

pub use memory::Partition;
pub use sequences::SequenceCounters;
pub use storable::{from_cbor, to_cbor, CborCell};
pub use structures::Storage;
