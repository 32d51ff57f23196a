// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};

// One virtual memory per top-level collection.
// IDs are part of the persisted layout; never renumber.
pub(crate) const ACCOUNTS_MEM_ID: MemoryId = MemoryId::new(0);
pub(crate) const DOCUMENTS_MEM_ID: MemoryId = MemoryId::new(1);
pub(crate) const REFERENCE_MEM_ID: MemoryId = MemoryId::new(2);
pub(crate) const OPERATION_LOG_MEM_ID: MemoryId = MemoryId::new(3);
pub(crate) const SESSION_MEM_ID: MemoryId = MemoryId::new(4);
pub(crate) const SEQUENCES_MEM_ID: MemoryId = MemoryId::new(5);

/// Memory handed to each collection.
pub type Partition<M> = VirtualMemory<M>;

/// Splits the backing memory into the collection partitions.
pub(crate) struct Partitions<M: ic_stable_structures::Memory> {
    manager: MemoryManager<M>,
}

impl<M: ic_stable_structures::Memory> Partitions<M> {
    pub(crate) fn init(memory: M) -> Self {
        Self { manager: MemoryManager::init(memory) }
    }

    pub(crate) fn get(&self, id: MemoryId) -> Partition<M> {
        self.manager.get(id)
    }
}
