// src/backend/services/reference_service.rs
// Controlled vocabularies: file types, departments, units, statuses,
// payment companies, payment types and payment projects.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::Session;
use crate::models::reference::{ReferenceCategory, ReferenceEntry};
use crate::services::audit_service;
use crate::storage::Storage;
use ic_stable_structures::Memory;

/// Current entries of `category`; the configured seed list until the category is first written.
pub fn list<M: Memory>(storage: &Storage<M>, config: &RegistryConfig, category: ReferenceCategory) -> Vec<ReferenceEntry> {
    storage
        .reference_data()
        .lists
        .get(&category)
        .cloned()
        .unwrap_or_else(|| config.seeds.entries(category))
}

/// Plain names of `category`, in order.
pub fn names<M: Memory>(storage: &Storage<M>, config: &RegistryConfig, category: ReferenceCategory) -> Vec<String> {
    list(storage, config, category).iter().map(|entry| entry.name().to_string()).collect()
}

/// Appends `entry` to `category`.
///
/// # Errors
///
/// `Validation` for an empty value, `DuplicateEntry` when an entry with the
/// same name (exact, case-sensitive) is already present.
pub fn add<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    category: ReferenceCategory,
    entry: ReferenceEntry,
) -> Result<ReferenceEntry, RegistryError> {
    let entry = entry.trimmed().conform(category);
    if entry.name().is_empty() {
        return Err(RegistryError::invalid(format!("{} must not be empty", category.display_name())));
    }

    let mut data = storage.reference_data();
    let mut entries = data.lists.get(&category).cloned().unwrap_or_else(|| config.seeds.entries(category));
    if entries.iter().any(|existing| existing.name() == entry.name()) {
        return Err(RegistryError::DuplicateEntry(format!("{}: {}", category.display_name(), entry.name())));
    }
    entries.push(entry.clone());
    data.lists.insert(category, entries);
    storage.save_reference_data(&data)?;

    let action = match &entry {
        ReferenceEntry::PaymentType(payment_type) => format!(
            "添加{}: {} (需要百分比: {})",
            category.display_name(),
            payment_type.name,
            if payment_type.need_percentage { "是" } else { "否" }
        ),
        ReferenceEntry::Value(value) => format!("添加{}: {}", category.display_name(), value),
    };
    audit_service::append(storage, config, actor, action)?;
    tracing::info!(category = ?category, value = entry.name(), "reference entry added");
    Ok(entry)
}

/// Removes the entry named `name` from `category`. Documents that use the
/// value keep it.
///
/// # Errors
///
/// `NotFound` when no entry has that name.
pub fn remove<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    category: ReferenceCategory,
    name: &str,
) -> Result<ReferenceEntry, RegistryError> {
    let mut data = storage.reference_data();
    let mut entries = data.lists.get(&category).cloned().unwrap_or_else(|| config.seeds.entries(category));
    let index = entries
        .iter()
        .position(|entry| entry.name() == name)
        .ok_or_else(|| RegistryError::NotFound(format!("{}: {}", category.display_name(), name)))?;
    let removed = entries.remove(index);
    data.lists.insert(category, entries);
    storage.save_reference_data(&data)?;

    audit_service::append(storage, config, actor, format!("删除{}: {}", category.display_name(), name))?;
    tracing::info!(category = ?category, value = name, "reference entry removed");
    Ok(removed)
}
