// src/backend/services/export_service.rs
// CSV exports and the checksummed JSON backup.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::{Session, UserAccount};
use crate::models::audit_log::LogEntry;
use crate::models::common::Timestamp;
use crate::models::document::DocumentRecord;
use crate::models::reference::ReferenceData;
use crate::services::audit_service;
use crate::storage::Storage;
use crate::utils::crypto::calculate_sha256_hex;
use crate::utils::time::{format_date, format_timestamp, now};
use ic_stable_structures::Memory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BOM: &str = "\u{feff}";
const BACKUP_FORMAT: &str = "docreg-backup";
const BACKUP_VERSION: u32 = 1;

pub const DOCUMENT_CSV_HEADER: [&str; 13] = [
    "日期",
    "文件类型",
    "文件编号",
    "申请部门",
    "申请人",
    "文件内容",
    "计量单位",
    "数量",
    "金额",
    "结束日期",
    "送签状态",
    "状态更新时间",
    "退回原因",
];

pub const ACCOUNT_CSV_HEADER: [&str; 6] = ["用户名", "角色", "显示名称", "创建时间", "最后登录时间", "需修改密码"];

fn csv_failure(e: impl std::fmt::Display) -> RegistryError {
    RegistryError::StorageFailure(format!("csv: {}", e))
}

/// Writes `rows` under `header` as a BOM-prefixed CSV with every field quoted.
fn write_csv<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> Result<String, RegistryError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(BOM.as_bytes().to_vec());
    writer.write_record(header).map_err(csv_failure)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_failure)?;
    }
    let bytes = writer.into_inner().map_err(csv_failure)?;
    String::from_utf8(bytes).map_err(csv_failure)
}

/// One row per content line. Continuation rows leave the record's own
/// fields blank.
pub fn documents_csv(records: &[DocumentRecord]) -> Result<String, RegistryError> {
    let mut rows = Vec::new();
    for record in records {
        let lines: Vec<[String; 4]> = if record.contents.is_empty() {
            vec![Default::default()]
        } else {
            record
                .contents
                .iter()
                .map(|line| {
                    [line.content.clone(), line.unit.clone(), line.quantity.to_string(), line.amount.to_string()]
                })
                .collect()
        };
        for (index, [content, unit, quantity, amount]) in lines.into_iter().enumerate() {
            let row = if index == 0 {
                [
                    format_date(&record.date),
                    record.file_type.clone(),
                    record.file_number.clone().unwrap_or_default(),
                    record.department.clone(),
                    record.applicant.clone(),
                    content,
                    unit,
                    quantity,
                    amount,
                    record.end_date.as_ref().map(format_date).unwrap_or_default(),
                    record.status.clone().unwrap_or_default(),
                    record.status_updated_at.as_ref().map(format_timestamp).unwrap_or_default(),
                    record.reject_reason.clone().unwrap_or_default(),
                ]
            } else {
                let mut row: [String; 13] = Default::default();
                row[5] = content;
                row[6] = unit;
                row[7] = quantity;
                row[8] = amount;
                row
            };
            rows.push(row);
        }
    }
    tracing::debug!(records = records.len(), rows = rows.len(), "documents exported");
    write_csv(DOCUMENT_CSV_HEADER, rows)
}

/// Account list without passwords.
pub fn accounts_csv(accounts: &[UserAccount]) -> Result<String, RegistryError> {
    let rows = accounts
        .iter()
        .map(|account| {
            [
                account.username.clone(),
                account.role.display_name().to_string(),
                account.display_name.clone(),
                format_timestamp(&account.created_at),
                account.last_login_at.as_ref().map(format_timestamp).unwrap_or_default(),
                if account.first_login { "是" } else { "否" }.to_string(),
            ]
        })
        .collect();
    write_csv(ACCOUNT_CSV_HEADER, rows)
}

/// Everything the registry persists apart from the session.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BackupPayload {
    pub accounts: Vec<UserAccount>,
    pub documents: Vec<DocumentRecord>,
    pub reference: ReferenceData,
    pub operation_log: Vec<LogEntry>,
    pub sequences: BTreeMap<String, u64>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct BackupEnvelope {
    pub format: String,
    pub version: u32,
    pub exported_at: Timestamp,
    /// Hex SHA-256 of the JSON encoding of `payload`.
    pub checksum: String,
    pub payload: BackupPayload,
}

/// Counts of what an import restored.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoredCounts {
    pub accounts: usize,
    pub documents: usize,
    pub log_entries: usize,
}

fn payload_checksum(payload: &BackupPayload) -> Result<String, RegistryError> {
    let bytes = serde_json::to_vec(payload).map_err(|e| RegistryError::StorageFailure(e.to_string()))?;
    Ok(calculate_sha256_hex(&bytes))
}

pub fn export_backup<M: Memory>(storage: &Storage<M>) -> Result<String, RegistryError> {
    let payload = BackupPayload {
        accounts: storage.accounts(),
        documents: storage.documents(),
        reference: storage.reference_data(),
        operation_log: storage.operation_log(),
        sequences: storage.sequences.snapshot(),
    };
    let envelope = BackupEnvelope {
        format: BACKUP_FORMAT.to_string(),
        version: BACKUP_VERSION,
        exported_at: now(),
        checksum: payload_checksum(&payload)?,
        payload,
    };
    tracing::info!(documents = envelope.payload.documents.len(), "backup exported");
    serde_json::to_string_pretty(&envelope).map_err(|e| RegistryError::StorageFailure(e.to_string()))
}

/// Parses and verifies a backup without touching storage.
pub fn parse_backup(json: &str) -> Result<BackupPayload, RegistryError> {
    let envelope: BackupEnvelope =
        serde_json::from_str(json).map_err(|e| RegistryError::CorruptBackup(format!("unreadable: {}", e)))?;
    if envelope.format != BACKUP_FORMAT || envelope.version != BACKUP_VERSION {
        return Err(RegistryError::CorruptBackup(format!(
            "unsupported format {} v{}",
            envelope.format, envelope.version
        )));
    }
    if payload_checksum(&envelope.payload)? != envelope.checksum {
        return Err(RegistryError::CorruptBackup("checksum mismatch".to_string()));
    }
    Ok(envelope.payload)
}

/// Replaces every collection with the backup's content and logs the import.
/// The current session is kept. Nothing is written if verification fails.
pub fn import_backup<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    json: &str,
) -> Result<RestoredCounts, RegistryError> {
    let payload = parse_backup(json)?;
    storage.save_accounts(&payload.accounts)?;
    storage.save_documents(&payload.documents)?;
    storage.save_reference_data(&payload.reference)?;
    storage.save_operation_log(&payload.operation_log)?;
    storage.sequences.restore(&payload.sequences);

    let counts = RestoredCounts {
        accounts: payload.accounts.len(),
        documents: payload.documents.len(),
        log_entries: payload.operation_log.len(),
    };
    audit_service::append(
        storage,
        config,
        actor,
        format!("导入备份数据，文件记录 {} 条，用户 {} 个", counts.documents, counts.accounts),
    )?;
    tracing::info!(?counts, "backup imported");
    Ok(counts)
}
