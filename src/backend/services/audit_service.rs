// src/backend/services/audit_service.rs
// Operation log: append-only record of what each session did.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::Session;
use crate::models::audit_log::LogEntry;
use crate::storage::Storage;
use crate::utils::time::now;
use ic_stable_structures::Memory;

/// Username recorded for `actor`, or the configured system name.
pub fn actor_name<'a>(config: &'a RegistryConfig, actor: Option<&'a Session>) -> &'a str {
    actor.map_or(config.system_actor.as_str(), |session| session.username.as_str())
}

/// Appends an entry and drops the oldest ones beyond `config.log_capacity`.
pub fn append<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    action: impl Into<String>,
) -> Result<LogEntry, RegistryError> {
    let entry = LogEntry {
        time: now(),
        action: action.into(),
        user: actor_name(config, actor).to_string(),
    };
    let mut entries = storage.operation_log();
    entries.push(entry.clone());
    if entries.len() > config.log_capacity {
        let excess = entries.len() - config.log_capacity;
        entries.drain(..excess);
    }
    storage.save_operation_log(&entries)?;
    tracing::debug!(user = %entry.user, action = %entry.action, "operation logged");
    Ok(entry)
}

/// Entries newest first, at most `limit` of them.
pub fn list<M: Memory>(storage: &Storage<M>, limit: Option<usize>) -> Vec<LogEntry> {
    let entries = storage.operation_log();
    let limit = limit.unwrap_or(entries.len());
    entries.into_iter().rev().take(limit).collect()
}

/// Empties the log, then records who cleared it.
pub fn clear<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
) -> Result<(), RegistryError> {
    storage.save_operation_log(&Vec::new())?;
    append(storage, config, actor, "清空操作日志")?;
    tracing::info!(user = actor_name(config, actor), "operation log cleared");
    Ok(())
}
