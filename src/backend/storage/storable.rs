// src/backend/storage/storable.rs
use crate::error::RegistryError;
use crate::storage::memory::Partition;
use ic_stable_structures::{Memory, StableCell};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Encodes a value as CBOR for stable storage.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, RegistryError> {
    let mut writer = vec![];
    ciborium::ser::into_writer(value, &mut writer)
        .map_err(|e| RegistryError::StorageFailure(format!("encode failed: {}", e)))?;
    Ok(writer)
}

pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RegistryError> {
    ciborium::de::from_reader(bytes).map_err(|e| RegistryError::StorageFailure(format!("decode failed: {}", e)))
}

/// A whole collection kept in one stable cell and rewritten on every mutation.
/// An empty cell means the collection was never written.
pub struct CborCell<T, M: Memory> {
    name: &'static str,
    cell: StableCell<Vec<u8>, Partition<M>>,
    _value: PhantomData<T>,
}

impl<T, M> CborCell<T, M>
where
    T: Serialize + DeserializeOwned,
    M: Memory,
{
    pub fn init(name: &'static str, memory: Partition<M>) -> Result<Self, RegistryError> {
        let cell = StableCell::init(memory, Vec::new())
            .map_err(|e| RegistryError::StorageFailure(format!("{}: init failed: {:?}", name, e)))?;
        Ok(Self { name, cell, _value: PhantomData })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `Ok(None)` when nothing was ever stored.
    pub fn read(&self) -> Result<Option<T>, RegistryError> {
        let bytes = self.cell.get();
        if bytes.is_empty() {
            return Ok(None);
        }
        from_cbor(bytes)
            .map(Some)
            .map_err(|e| RegistryError::StorageFailure(format!("{}: {}", self.name, e)))
    }

    pub fn write(&mut self, value: &T) -> Result<(), RegistryError> {
        let bytes = to_cbor(value)?;
        self.cell
            .set(bytes)
            .map(|_previous| ())
            .map_err(|e| RegistryError::StorageFailure(format!("{}: write failed: {:?}", self.name, e)))
    }

    /// Returns the cell to its never-written state.
    pub fn clear(&mut self) -> Result<(), RegistryError> {
        self.cell
            .set(Vec::new())
            .map(|_previous| ())
            .map_err(|e| RegistryError::StorageFailure(format!("{}: clear failed: {:?}", self.name, e)))
    }

    /// Overwrites the cell with raw bytes. Used to simulate damaged storage in tests.
    #[cfg(test)]
    pub(crate) fn write_raw(&mut self, bytes: Vec<u8>) {
        self.cell.set(bytes).expect("raw write");
    }
}
