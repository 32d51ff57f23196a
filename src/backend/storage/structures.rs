// src/backend/storage/structures.rs
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::{Session, UserAccount};
use crate::models::audit_log::LogEntry;
use crate::models::document::DocumentRecord;
use crate::models::reference::ReferenceData;
use crate::storage::memory::{
    Partitions, ACCOUNTS_MEM_ID, DOCUMENTS_MEM_ID, OPERATION_LOG_MEM_ID, REFERENCE_MEM_ID, SEQUENCES_MEM_ID,
    SESSION_MEM_ID,
};
use crate::storage::sequences::SequenceCounters;
use crate::storage::storable::CborCell;
use crate::utils::crypto::generate_id;
use crate::utils::time::now;
use ic_stable_structures::Memory;
use std::cell::RefCell;

/// Every persisted collection of the registry over one backing memory.
///
/// Collections are independent: there is no cross-collection transaction,
/// and each mutation rewrites the whole collection it touches.
pub struct Storage<M: Memory> {
    accounts: CborCell<Vec<UserAccount>, M>,
    documents: CborCell<Vec<DocumentRecord>, M>,
    reference: CborCell<ReferenceData, M>,
    operation_log: CborCell<Vec<LogEntry>, M>,
    session: CborCell<Session, M>,
    pub(crate) sequences: SequenceCounters<M>,
    warnings: RefCell<Vec<String>>,
}

impl<M: Memory> Storage<M> {
    /// Opens (or initializes) the collections in `memory`. Seeds the
    /// default accounts when the account list is missing or empty.
    pub fn open(memory: M, config: &RegistryConfig) -> Result<Self, RegistryError> {
        let partitions = Partitions::init(memory);
        let mut storage = Self {
            accounts: CborCell::init("accounts", partitions.get(ACCOUNTS_MEM_ID))?,
            documents: CborCell::init("documents", partitions.get(DOCUMENTS_MEM_ID))?,
            reference: CborCell::init("reference", partitions.get(REFERENCE_MEM_ID))?,
            operation_log: CborCell::init("operation_log", partitions.get(OPERATION_LOG_MEM_ID))?,
            session: CborCell::init("session", partitions.get(SESSION_MEM_ID))?,
            sequences: SequenceCounters::init(partitions.get(SEQUENCES_MEM_ID)),
            warnings: RefCell::new(Vec::new()),
        };
        let unseeded = match storage.accounts.read() {
            Ok(None) => true,
            Ok(Some(accounts)) => accounts.is_empty(),
            Err(_) => false,
        };
        if unseeded {
            storage.seed_accounts(config)?;
        }
        Ok(storage)
    }

    fn seed_accounts(&mut self, config: &RegistryConfig) -> Result<(), RegistryError> {
        let created_at = now();
        let accounts: Vec<UserAccount> = config
            .seed_accounts
            .iter()
            .map(|seed| UserAccount {
                id: generate_id(),
                username: seed.username.clone(),
                password: seed.password.clone(),
                display_name: seed.display_name.clone(),
                role: seed.role,
                first_login: seed.first_login,
                created_at,
                last_login_at: None,
            })
            .collect();
        tracing::info!(count = accounts.len(), "seeding default accounts");
        self.accounts.write(&accounts)
    }

    /// Unreadable collections read as empty. The failure is logged and kept
    /// for `take_warnings` rather than propagated.
    fn degrade<T>(&self, name: &str, result: Result<Option<T>, RegistryError>) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(collection = name, error = %e, "falling back to an empty collection");
                self.warnings.borrow_mut().push(e.to_string());
                None
            }
        }
    }

    pub fn accounts(&self) -> Vec<UserAccount> {
        self.degrade(self.accounts.name(), self.accounts.read()).unwrap_or_default()
    }

    pub fn save_accounts(&mut self, accounts: &Vec<UserAccount>) -> Result<(), RegistryError> {
        self.accounts.write(accounts)
    }

    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.degrade(self.documents.name(), self.documents.read()).unwrap_or_default()
    }

    pub fn save_documents(&mut self, documents: &Vec<DocumentRecord>) -> Result<(), RegistryError> {
        self.documents.write(documents)
    }

    pub fn reference_data(&self) -> ReferenceData {
        self.degrade(self.reference.name(), self.reference.read()).unwrap_or_default()
    }

    pub fn save_reference_data(&mut self, data: &ReferenceData) -> Result<(), RegistryError> {
        self.reference.write(data)
    }

    pub fn operation_log(&self) -> Vec<LogEntry> {
        self.degrade(self.operation_log.name(), self.operation_log.read()).unwrap_or_default()
    }

    pub fn save_operation_log(&mut self, entries: &Vec<LogEntry>) -> Result<(), RegistryError> {
        self.operation_log.write(entries)
    }

    pub fn session(&self) -> Option<Session> {
        self.degrade(self.session.name(), self.session.read())
    }

    pub fn save_session(&mut self, session: Option<&Session>) -> Result<(), RegistryError> {
        match session {
            Some(session) => self.session.write(session),
            None => self.session.clear(),
        }
    }

    /// Drains the storage warnings collected since the last call.
    pub fn take_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }

    /// Erases every collection, counters and session included, then reseeds
    /// the default accounts. Reference lists fall back to their seeds on read.
    pub fn wipe(&mut self, config: &RegistryConfig) -> Result<(), RegistryError> {
        self.documents.clear()?;
        self.reference.clear()?;
        self.operation_log.clear()?;
        self.session.clear()?;
        self.sequences.clear();
        self.seed_accounts(config)
    }

    #[cfg(test)]
    pub(crate) fn corrupt_documents(&mut self) {
        self.documents.write_raw(vec![0xff, 0x00, 0x13]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;

    #[test]
    fn open_seeds_accounts_once() {
        let memory = DefaultMemoryImpl::default();
        let config = RegistryConfig::default();
        let first = Storage::open(memory.clone(), &config).unwrap();
        let seeded = first.accounts();
        assert_eq!(seeded.len(), 3);

        // Reopening the same memory keeps the ids minted the first time.
        let second = Storage::open(memory, &config).unwrap();
        assert_eq!(second.accounts(), seeded);
    }

    #[test]
    fn reopen_reseeds_an_emptied_account_list() {
        let memory = DefaultMemoryImpl::default();
        let config = RegistryConfig::default();
        let mut first = Storage::open(memory.clone(), &config).unwrap();
        first.save_accounts(&Vec::new()).unwrap();
        assert!(first.accounts().is_empty());

        let reopened = Storage::open(memory, &config).unwrap();
        let usernames: Vec<String> = reopened.accounts().into_iter().map(|a| a.username).collect();
        assert_eq!(usernames, vec!["TYL2025", "8888", "1001"]);
    }

    #[test]
    fn corrupt_collection_reads_empty_and_warns() {
        let config = RegistryConfig::default();
        let mut storage = Storage::open(DefaultMemoryImpl::default(), &config).unwrap();
        storage.corrupt_documents();

        assert!(storage.documents().is_empty());
        let warnings = storage.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("documents"));
        assert!(storage.take_warnings().is_empty());
    }

    #[test]
    fn session_round_trips_and_clears() {
        let config = RegistryConfig::default();
        let mut storage = Storage::open(DefaultMemoryImpl::default(), &config).unwrap();
        let account = storage.accounts().remove(0);
        let session = Session::for_account(&account, now());

        storage.save_session(Some(&session)).unwrap();
        assert_eq!(storage.session(), Some(session));
        storage.save_session(None).unwrap();
        assert_eq!(storage.session(), None);
    }
}
