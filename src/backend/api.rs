// src/backend/api.rs
// The registry facade: one handle over storage, configuration and the
// current session. Every UI-facing operation goes through here.

use crate::{
    config::RegistryConfig,
    error::RegistryError,
    metrics::{compute_statistics, RegistryStatistics},
    models::account::{LoginOutcome, NewAccount, Session, UserAccount},
    models::audit_log::LogEntry,
    models::common::{AccountId, Capability, DocumentId, Role},
    models::document::{DocumentDraft, DocumentPatch, DocumentRecord, SearchFilters},
    models::reference::{ReferenceCategory, ReferenceEntry},
    services::{
        account_service, audit_service, document_service,
        export_service::{self, RestoredCounts},
        numbering, reference_service,
    },
    storage::Storage,
    utils::guards::{check_permission, require_session},
    utils::time::today,
};
use ic_stable_structures::{DefaultMemoryImpl, Memory};

pub struct Registry<M: Memory = DefaultMemoryImpl> {
    storage: Storage<M>,
    config: RegistryConfig,
    session: Option<Session>,
}

impl Registry<DefaultMemoryImpl> {
    /// A registry over a fresh in-process memory.
    pub fn in_memory(config: RegistryConfig) -> Result<Self, RegistryError> {
        Self::open(DefaultMemoryImpl::default(), config)
    }
}

impl<M: Memory> Registry<M> {
    /// Opens the registry stored in `memory`, restoring the persisted session.
    ///
    /// # Errors
    ///
    /// `Validation` when `config` is unusable.
    pub fn open(memory: M, config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        let storage = Storage::open(memory, &config)?;
        let session = storage.session();
        tracing::info!(restored_session = session.is_some(), "registry opened");
        Ok(Self { storage, config, session })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether the current session's role grants `capability`. No session
    /// grants nothing.
    pub fn check_permission(&self, capability: Capability) -> bool {
        check_permission(self.session.as_ref(), capability)
    }

    /// Storage read failures since the last call. Each one made a
    /// collection read as empty.
    pub fn storage_warnings(&self) -> Vec<String> {
        self.storage.take_warnings()
    }

    // --- Reference data ---

    pub fn reference_list(&self, category: ReferenceCategory) -> Vec<ReferenceEntry> {
        reference_service::list(&self.storage, &self.config, category)
    }

    pub fn reference_names(&self, category: ReferenceCategory) -> Vec<String> {
        reference_service::names(&self.storage, &self.config, category)
    }

    pub fn add_reference(
        &mut self,
        category: ReferenceCategory,
        entry: impl Into<ReferenceEntry>,
    ) -> Result<ReferenceEntry, RegistryError> {
        reference_service::add(&mut self.storage, &self.config, self.session.as_ref(), category, entry.into())
    }

    pub fn remove_reference(&mut self, category: ReferenceCategory, name: &str) -> Result<ReferenceEntry, RegistryError> {
        reference_service::remove(&mut self.storage, &self.config, self.session.as_ref(), category, name)
    }

    // --- Documents ---

    pub fn create_document(&mut self, draft: DocumentDraft) -> Result<DocumentRecord, RegistryError> {
        document_service::create(&mut self.storage, &self.config, self.session.as_ref(), draft)
    }

    pub fn get_document(&self, id: &str) -> Result<DocumentRecord, RegistryError> {
        document_service::get(&self.storage, id)
    }

    pub fn update_document(&mut self, id: &str, patch: DocumentPatch) -> Result<DocumentRecord, RegistryError> {
        document_service::update(&mut self.storage, &self.config, self.session.as_ref(), id, patch)
    }

    pub fn delete_document(&mut self, id: &str) -> Result<DocumentRecord, RegistryError> {
        document_service::delete(&mut self.storage, &self.config, self.session.as_ref(), id)
    }

    pub fn batch_update_status(
        &mut self,
        ids: &[DocumentId],
        status: &str,
        reject_reason: Option<&str>,
    ) -> Result<usize, RegistryError> {
        document_service::batch_update_status(
            &mut self.storage,
            &self.config,
            self.session.as_ref(),
            ids,
            status,
            reject_reason,
        )
    }

    pub fn batch_delete(&mut self, ids: &[DocumentId]) -> Result<usize, RegistryError> {
        document_service::batch_delete(&mut self.storage, &self.config, self.session.as_ref(), ids)
    }

    pub fn search_documents(&self, filters: &SearchFilters) -> Vec<DocumentRecord> {
        document_service::search(&self.storage, filters)
    }

    pub fn generate_document_number(
        &mut self,
        file_type: &str,
        department: &str,
        existing_number: Option<&str>,
    ) -> String {
        numbering::generate_document_number(&mut self.storage, file_type, department, existing_number)
    }

    pub fn next_sequence(&mut self, category: &str, pad_width: usize) -> String {
        numbering::next_sequence(&mut self.storage, category, pad_width)
    }

    // --- Accounts ---

    pub fn login(&mut self, username: &str, password: &str) -> Result<LoginOutcome, RegistryError> {
        let outcome = account_service::login(&mut self.storage, &self.config, username, password)?;
        self.session = Some(outcome.session.clone());
        Ok(outcome)
    }

    pub fn logout(&mut self) -> Result<(), RegistryError> {
        account_service::logout(&mut self.storage, &self.config, self.session.as_ref())?;
        self.session = None;
        Ok(())
    }

    pub fn change_password(&mut self, username: &str, old_password: &str, new_password: &str) -> Result<(), RegistryError> {
        account_service::change_password(
            &mut self.storage,
            &self.config,
            self.session.as_ref(),
            username,
            old_password,
            new_password,
        )
    }

    pub fn add_account(&mut self, new_account: NewAccount) -> Result<UserAccount, RegistryError> {
        account_service::add_account(&mut self.storage, &self.config, self.session.as_ref(), new_account)
    }

    pub fn delete_account(&mut self, id: &str) -> Result<UserAccount, RegistryError> {
        account_service::delete_account(&mut self.storage, &self.config, self.session.as_ref(), id)
    }

    pub fn set_role(&mut self, id: &AccountId, role: Role) -> Result<(), RegistryError> {
        if let Some(refreshed) = account_service::set_role(&mut self.storage, &self.config, self.session.as_ref(), id, role)? {
            self.session = Some(refreshed);
        }
        Ok(())
    }

    pub fn reset_password(&mut self, id: &str) -> Result<String, RegistryError> {
        account_service::reset_password(&mut self.storage, &self.config, self.session.as_ref(), id)
    }

    pub fn accounts(&self) -> Vec<UserAccount> {
        account_service::list(&self.storage)
    }

    pub fn search_accounts(&self, keyword: &str) -> Vec<UserAccount> {
        account_service::search(&self.storage, keyword)
    }

    // --- Operation log ---

    pub fn append_log(&mut self, action: &str) -> Result<LogEntry, RegistryError> {
        audit_service::append(&mut self.storage, &self.config, self.session.as_ref(), action)
    }

    pub fn log_entries(&self, limit: Option<usize>) -> Vec<LogEntry> {
        audit_service::list(&self.storage, limit)
    }

    pub fn clear_log(&mut self) -> Result<(), RegistryError> {
        audit_service::clear(&mut self.storage, &self.config, self.session.as_ref())
    }

    // --- Statistics, export, maintenance ---

    pub fn statistics(&self) -> RegistryStatistics {
        compute_statistics(&self.storage.documents(), today())
    }

    /// CSV of the documents matching `filters`, in search order.
    pub fn export_documents_csv(&self, filters: &SearchFilters) -> Result<String, RegistryError> {
        export_service::documents_csv(&self.search_documents(filters))
    }

    pub fn export_accounts_csv(&self) -> Result<String, RegistryError> {
        export_service::accounts_csv(&self.storage.accounts())
    }

    pub fn export_backup(&self) -> Result<String, RegistryError> {
        export_service::export_backup(&self.storage)
    }

    pub fn import_backup(&mut self, json: &str) -> Result<RestoredCounts, RegistryError> {
        export_service::import_backup(&mut self.storage, &self.config, self.session.as_ref(), json)
    }

    /// Wipes every collection, the session and counters included, and
    /// reseeds the defaults. The reset itself is logged under the acting user.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a session; nothing is wiped then.
    pub fn reset(&mut self) -> Result<(), RegistryError> {
        let actor = require_session(self.session.as_ref())?.clone();
        self.storage.wipe(&self.config)?;
        audit_service::append(&mut self.storage, &self.config, Some(&actor), "重置系统数据")?;
        tracing::warn!(user = %actor.username, "registry reset");
        self.session = None;
        Ok(())
    }
}
