// src/backend/services/document_service.rs
// Document registry: create, update, delete, batch status changes and search.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::Session;
use crate::models::common::{CalendarDate, DocumentId, SortOrder, Timestamp};
use crate::models::document::{
    ContentLine, DocumentDraft, DocumentPatch, DocumentRecord, SearchFilters, SortField,
};
use crate::services::audit_service::{self, actor_name};
use crate::storage::Storage;
use crate::utils::crypto::generate_id;
use crate::utils::time::{now, today};
use ic_stable_structures::Memory;
use std::cmp::Ordering;

const UNPROCESSED_LABEL: &str = "未处理";

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Checks the required fields shared by drafts and stored records.
/// Problems are reported in field order, then line by line.
fn validate_fields(
    date: Option<&CalendarDate>,
    file_type: &str,
    department: &str,
    applicant: &str,
    contents: &[ContentLine],
) -> Result<(), RegistryError> {
    let mut problems = Vec::new();
    if date.is_none() {
        problems.push("date is required".to_string());
    }
    if file_type.trim().is_empty() {
        problems.push("file type is required".to_string());
    }
    if department.trim().is_empty() {
        problems.push("department is required".to_string());
    }
    if applicant.trim().is_empty() {
        problems.push("applicant is required".to_string());
    }
    if contents.is_empty() {
        problems.push("at least one content line is required".to_string());
    }
    for (index, line) in contents.iter().enumerate() {
        let n = index + 1;
        if line.content.trim().is_empty() {
            problems.push(format!("content line {}: content is required", n));
        }
        if line.unit.trim().is_empty() {
            problems.push(format!("content line {}: unit is required", n));
        }
        if !line.quantity.is_finite() || line.quantity < 0.0 {
            problems.push(format!("content line {}: quantity must be a non-negative number", n));
        }
        if !line.amount.is_finite() || line.amount < 0.0 {
            problems.push(format!("content line {}: amount must be a non-negative number", n));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::Validation(problems))
    }
}

pub fn validate_draft(draft: &DocumentDraft) -> Result<(), RegistryError> {
    validate_fields(draft.date.as_ref(), &draft.file_type, &draft.department, &draft.applicant, &draft.contents)
}

pub fn validate_record(record: &DocumentRecord) -> Result<(), RegistryError> {
    validate_fields(Some(&record.date), &record.file_type, &record.department, &record.applicant, &record.contents)
}

fn trimmed_lines(lines: Vec<ContentLine>) -> Vec<ContentLine> {
    lines
        .into_iter()
        .map(|line| ContentLine {
            content: line.content.trim().to_string(),
            unit: line.unit.trim().to_string(),
            ..line
        })
        .collect()
}

/// A Reject status must always carry a reason.
fn require_reject_reason(config: &RegistryConfig, status: Option<&str>, reason: Option<&str>) -> Result<(), RegistryError> {
    if config.is_reject(status) && reason.is_none() {
        return Err(RegistryError::invalid(format!(
            "a reject reason is required when the status is {}",
            config.reject_status
        )));
    }
    Ok(())
}

/// Moves `record` into `status`, stamping the transition time.
fn transition_status(record: &mut DocumentRecord, status: Option<String>, at: Timestamp) {
    record.status = status;
    record.status_updated_at = Some(at);
}

/// Re-derives end date and reject reason from the status.
/// A transition into Complete always re-stamps the end date.
fn settle_derived_fields(record: &mut DocumentRecord, config: &RegistryConfig, transitioned: bool, today: CalendarDate) {
    if config.is_complete(record.status.as_deref()) {
        if transitioned || record.end_date.is_none() {
            record.end_date = Some(today);
        }
    } else {
        record.end_date = None;
    }
    if !config.is_reject(record.status.as_deref()) {
        record.reject_reason = None;
    }
}

/// Registers a new document with an empty status.
///
/// # Errors
///
/// `Validation` naming the missing fields in order.
pub fn create<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    draft: DocumentDraft,
) -> Result<DocumentRecord, RegistryError> {
    validate_draft(&draft)?;
    let date = draft.date.ok_or_else(|| RegistryError::invalid("date is required"))?;
    let created_at = now();
    let record = DocumentRecord {
        id: generate_id(),
        date,
        file_type: draft.file_type.trim().to_string(),
        department: draft.department.trim().to_string(),
        applicant: draft.applicant.trim().to_string(),
        file_number: draft.file_number.as_deref().and_then(non_empty),
        contents: trimmed_lines(draft.contents),
        status: None,
        status_updated_at: None,
        end_date: None,
        reject_reason: None,
        created_by: actor_name(config, actor).to_string(),
        created_at,
        updated_at: created_at,
    };

    let mut documents = storage.documents();
    documents.push(record.clone());
    storage.save_documents(&documents)?;

    audit_service::append(storage, config, actor, format!("添加文件记录，文件类型：{}", record.file_type))?;
    tracing::info!(id = %record.id, file_type = %record.file_type, "document created");
    Ok(record)
}

pub fn get<M: Memory>(storage: &Storage<M>, id: &str) -> Result<DocumentRecord, RegistryError> {
    storage
        .documents()
        .into_iter()
        .find(|record| record.id == id)
        .ok_or_else(|| RegistryError::NotFound(format!("document {}", id)))
}

/// Merges `patch` onto the stored record and re-validates it.
///
/// A changed status stamps `status_updated_at`; entering the Complete status
/// stamps today's end date, leaving it clears the date; any status other
/// than Reject clears the reject reason, and a Reject status needs one.
pub fn update<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    id: &str,
    patch: DocumentPatch,
) -> Result<DocumentRecord, RegistryError> {
    let mut documents = storage.documents();
    let index = documents
        .iter()
        .position(|record| record.id == id)
        .ok_or_else(|| RegistryError::NotFound(format!("document {}", id)))?;

    let mut record = documents[index].clone();
    let previous_status = record.status.clone();
    let at = now();

    if let Some(date) = patch.date {
        record.date = date;
    }
    if let Some(file_type) = patch.file_type {
        record.file_type = file_type.trim().to_string();
    }
    if let Some(department) = patch.department {
        record.department = department.trim().to_string();
    }
    if let Some(applicant) = patch.applicant {
        record.applicant = applicant.trim().to_string();
    }
    if let Some(file_number) = patch.file_number {
        record.file_number = non_empty(&file_number);
    }
    if let Some(contents) = patch.contents {
        record.contents = trimmed_lines(contents);
    }

    let new_status = patch.status.as_deref().map(non_empty).filter(|status| *status != previous_status);
    let transitioned = new_status.is_some();
    if let Some(status) = new_status {
        transition_status(&mut record, status, at);
    }
    if let Some(reason) = patch.reject_reason {
        record.reject_reason = non_empty(&reason);
    }
    settle_derived_fields(&mut record, config, transitioned, today());
    validate_record(&record)?;
    require_reject_reason(config, record.status.as_deref(), record.reject_reason.as_deref())?;
    record.updated_at = at;

    documents[index] = record.clone();
    storage.save_documents(&documents)?;

    let mut action = format!("更新文件记录，ID：{}", id);
    if transitioned {
        action.push_str(&format!(
            "，送签状态从 {} 改为 {}",
            previous_status.as_deref().unwrap_or(UNPROCESSED_LABEL),
            record.status.as_deref().unwrap_or(UNPROCESSED_LABEL)
        ));
    }
    audit_service::append(storage, config, actor, action)?;
    tracing::info!(id, transitioned, "document updated");
    Ok(record)
}

pub fn delete<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    id: &str,
) -> Result<DocumentRecord, RegistryError> {
    let mut documents = storage.documents();
    let index = documents
        .iter()
        .position(|record| record.id == id)
        .ok_or_else(|| RegistryError::NotFound(format!("document {}", id)))?;
    let removed = documents.remove(index);
    storage.save_documents(&documents)?;

    audit_service::append(
        storage,
        config,
        actor,
        format!("删除文件记录，ID：{}，文件类型：{}", id, removed.file_type),
    )?;
    tracing::info!(id, "document deleted");
    Ok(removed)
}

/// Moves every listed record into `status`. Unknown ids are skipped.
/// Returns the number of records changed.
///
/// # Errors
///
/// `Validation` when `status` is the Reject value and no reason is given.
pub fn batch_update_status<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    ids: &[DocumentId],
    status: &str,
    reject_reason: Option<&str>,
) -> Result<usize, RegistryError> {
    let status = non_empty(status);
    let reason = reject_reason.and_then(non_empty);
    require_reject_reason(config, status.as_deref(), reason.as_deref())?;

    let at = now();
    let today = today();
    let mut documents = storage.documents();
    let mut updated = 0;
    for record in documents.iter_mut().filter(|record| ids.contains(&record.id)) {
        transition_status(record, status.clone(), at);
        record.reject_reason = reason.clone();
        settle_derived_fields(record, config, true, today);
        record.updated_at = at;
        updated += 1;
    }
    if updated > 0 {
        storage.save_documents(&documents)?;
    }

    audit_service::append(
        storage,
        config,
        actor,
        format!(
            "批量更新文件送签状态为 {}，共更新 {} 条",
            status.as_deref().unwrap_or(UNPROCESSED_LABEL),
            updated
        ),
    )?;
    tracing::info!(requested = ids.len(), updated, "batch status update");
    Ok(updated)
}

/// Removes every listed record in one write. Returns the number removed.
pub fn batch_delete<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    ids: &[DocumentId],
) -> Result<usize, RegistryError> {
    let mut documents = storage.documents();
    let before = documents.len();
    documents.retain(|record| !ids.contains(&record.id));
    let removed = before - documents.len();
    if removed > 0 {
        storage.save_documents(&documents)?;
    }

    audit_service::append(storage, config, actor, format!("批量删除文件记录，共删除 {} 条", removed))?;
    tracing::info!(requested = ids.len(), removed, "batch delete");
    Ok(removed)
}

fn matches_keyword(record: &DocumentRecord, keyword: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(keyword);
    hit(&record.file_type)
        || hit(&record.department)
        || hit(&record.applicant)
        || record.contents.iter().any(|line| hit(&line.content))
        || record.file_number.as_deref().map_or(false, hit)
}

fn matches(record: &DocumentRecord, filters: &SearchFilters) -> bool {
    if let Some(keyword) = filters.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        if !matches_keyword(record, &keyword.to_lowercase()) {
            return false;
        }
    }
    if filters.file_type.as_deref().map_or(false, |v| record.file_type != v) {
        return false;
    }
    if filters.department.as_deref().map_or(false, |v| record.department != v) {
        return false;
    }
    if filters.status.as_deref().map_or(false, |v| record.status_str() != v) {
        return false;
    }
    if filters.created_by.as_deref().map_or(false, |v| record.created_by != v) {
        return false;
    }
    if filters.date_from.map_or(false, |from| record.date < from) {
        return false;
    }
    // Dates carry no time, so `<=` covers the whole last day.
    if filters.date_to.map_or(false, |to| record.date > to) {
        return false;
    }
    true
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare(a: &DocumentRecord, b: &DocumentRecord, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::FileType => compare_text(&a.file_type, &b.file_type),
        SortField::FileNumber => {
            compare_text(a.file_number.as_deref().unwrap_or(""), b.file_number.as_deref().unwrap_or(""))
        }
        SortField::Department => compare_text(&a.department, &b.department),
        SortField::Applicant => compare_text(&a.applicant, &b.applicant),
        SortField::Status => compare_text(a.status_str(), b.status_str()),
        SortField::StatusUpdatedAt => a.status_updated_at.cmp(&b.status_updated_at),
        SortField::EndDate => a.end_date.cmp(&b.end_date),
        SortField::Amount => a.total_amount().total_cmp(&b.total_amount()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Returns the matching records as a new list, newest first unless
/// `filters.sort` says otherwise. Stored data is never touched.
pub fn search<M: Memory>(storage: &Storage<M>, filters: &SearchFilters) -> Vec<DocumentRecord> {
    let mut found: Vec<DocumentRecord> =
        storage.documents().into_iter().filter(|record| matches(record, filters)).collect();
    let sort = filters.sort.unwrap_or_default();
    found.sort_by(|a, b| {
        let ordering = compare(a, b, sort.field);
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Role;
    use crate::models::document::{SortSpec, FILE_TYPE_PURCHASE_PLAN};
    use chrono::NaiveDate;
    use ic_stable_structures::DefaultMemoryImpl;
    use pretty_assertions::assert_eq;

    fn setup() -> (Storage<DefaultMemoryImpl>, RegistryConfig) {
        let config = RegistryConfig::default();
        (Storage::open(DefaultMemoryImpl::default(), &config).unwrap(), config)
    }

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(file_type: &str, applicant: &str) -> DocumentDraft {
        DocumentDraft {
            date: Some(date(2024, 3, 1)),
            file_type: file_type.to_string(),
            department: "前厅FO".to_string(),
            applicant: applicant.to_string(),
            file_number: None,
            contents: vec![ContentLine::new("打印纸", "箱", 2.0, 180.0)],
        }
    }

    fn clerk() -> Session {
        Session { account_id: "c".into(), username: "1001".into(), role: Role::User, started_at: now() }
    }

    #[test]
    fn create_stamps_provenance_and_logs() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, Some(&clerk()), draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        assert_eq!(record.created_by, "1001");
        assert_eq!(record.status, None);
        assert_eq!(record.end_date, None);
        assert_eq!(get(&storage, &record.id).unwrap(), record);
        assert_eq!(storage.operation_log().last().unwrap().action, "添加文件记录，文件类型：采购计划审批表");
    }

    #[test]
    fn create_reports_first_missing_field() {
        let (mut storage, config) = setup();
        let mut bad = draft(FILE_TYPE_PURCHASE_PLAN, "");
        bad.date = None;
        let err = create(&mut storage, &config, None, bad).unwrap_err();
        assert_eq!(err.to_string(), "date is required");
        assert_eq!(err.problems()[1], "applicant is required");
        assert!(storage.documents().is_empty());
    }

    #[test]
    fn create_checks_each_line() {
        let (mut storage, config) = setup();
        let mut bad = draft(FILE_TYPE_PURCHASE_PLAN, "张三");
        bad.contents.push(ContentLine::new("墨盒", "", 1.0, 50.0));
        let err = create(&mut storage, &config, None, bad).unwrap_err();
        assert_eq!(err.problems(), ["content line 2: unit is required".to_string()]);

        let mut empty = draft(FILE_TYPE_PURCHASE_PLAN, "张三");
        empty.contents.clear();
        let err = create(&mut storage, &config, None, empty).unwrap_err();
        assert_eq!(err.to_string(), "at least one content line is required");
    }

    #[test]
    fn negative_and_non_finite_numbers_are_rejected() {
        let (mut storage, config) = setup();
        let mut bad = draft(FILE_TYPE_PURCHASE_PLAN, "张三");
        bad.contents = vec![
            ContentLine::new("纸巾", "包", -1.0, 10.0),
            ContentLine::new("茶叶", "罐", 1.0, f64::NAN),
            ContentLine::new("咖啡", "袋", f64::INFINITY, f64::NEG_INFINITY),
        ];
        let err = create(&mut storage, &config, None, bad).unwrap_err();
        assert_eq!(
            err.problems(),
            [
                "content line 1: quantity must be a non-negative number".to_string(),
                "content line 2: amount must be a non-negative number".to_string(),
                "content line 3: quantity must be a non-negative number".to_string(),
                "content line 3: amount must be a non-negative number".to_string(),
            ]
        );
        assert!(storage.documents().is_empty());

        let mut zero = draft(FILE_TYPE_PURCHASE_PLAN, "张三");
        zero.contents = vec![ContentLine::new("样品", "件", 0.0, 0.0)];
        assert!(create(&mut storage, &config, None, zero).is_ok());
    }

    #[test]
    fn complete_sets_end_date_and_leaving_clears_it() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();

        let done = update(&mut storage, &config, None, &record.id, DocumentPatch::status("完毕")).unwrap();
        assert_eq!(done.end_date, Some(today()));
        assert!(done.status_updated_at.is_some());

        let back = update(&mut storage, &config, None, &record.id, DocumentPatch::status("集团审核")).unwrap();
        assert_eq!(back.end_date, None);
        assert!(back.status_updated_at >= done.status_updated_at);
    }

    #[test]
    fn reject_reason_only_survives_in_reject() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        let rejected = update(
            &mut storage,
            &config,
            None,
            &record.id,
            DocumentPatch { status: Some("退回".into()), reject_reason: Some("金额有误".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(rejected.reject_reason.as_deref(), Some("金额有误"));

        // Entering Reject without a reason is refused.
        let other = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();
        let err = update(&mut storage, &config, None, &other.id, DocumentPatch::status("退回")).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(get(&storage, &other.id).unwrap().status, None);

        let resent = update(&mut storage, &config, None, &record.id, DocumentPatch::status("重签")).unwrap();
        assert_eq!(resent.reject_reason, None);

        // A reason patched onto a non-reject record is dropped.
        let ignored = update(
            &mut storage,
            &config,
            None,
            &record.id,
            DocumentPatch { reject_reason: Some("x".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(ignored.reject_reason, None);
    }

    #[test]
    fn unchanged_status_does_not_restamp() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        let first = update(&mut storage, &config, None, &record.id, DocumentPatch::status("急单")).unwrap();
        let second = update(&mut storage, &config, None, &record.id, DocumentPatch::status("急单")).unwrap();
        assert_eq!(first.status_updated_at, second.status_updated_at);
        assert!(!storage.operation_log().last().unwrap().action.contains("送签状态从"));
    }

    #[test]
    fn update_logs_transition_and_revalidates() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        update(&mut storage, &config, None, &record.id, DocumentPatch::status("待送集团")).unwrap();
        assert_eq!(
            storage.operation_log().last().unwrap().action,
            format!("更新文件记录，ID：{}，送签状态从 未处理 改为 待送集团", record.id)
        );

        let err = update(
            &mut storage,
            &config,
            None,
            &record.id,
            DocumentPatch { applicant: Some("  ".into()), ..Default::default() },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "applicant is required");
        assert_eq!(get(&storage, &record.id).unwrap().applicant, "张三");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (mut storage, config) = setup();
        assert!(matches!(
            update(&mut storage, &config, None, "nope", DocumentPatch::default()),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(delete(&mut storage, &config, None, "nope"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn delete_logs_file_type() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft("会议议题", "李四")).unwrap();
        delete(&mut storage, &config, None, &record.id).unwrap();
        assert!(storage.documents().is_empty());
        assert!(storage.operation_log().last().unwrap().action.ends_with("文件类型：会议议题"));
    }

    #[test]
    fn batch_reject_requires_reason() {
        let (mut storage, config) = setup();
        let record = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        let ids = vec![record.id.clone()];
        let err = batch_update_status(&mut storage, &config, None, &ids, "退回", Some(" ")).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(_)));
        assert_eq!(get(&storage, &record.id).unwrap().status, None);

        assert_eq!(batch_update_status(&mut storage, &config, None, &ids, "退回", Some("缺附件")).unwrap(), 1);
        assert_eq!(get(&storage, &record.id).unwrap().reject_reason.as_deref(), Some("缺附件"));
    }

    #[test]
    fn batch_update_skips_unknown_ids_and_counts() {
        let (mut storage, config) = setup();
        let a = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        let b = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();
        let start = now();
        let ids = vec![a.id.clone(), b.id.clone(), "missing".to_string()];
        assert_eq!(batch_update_status(&mut storage, &config, None, &ids, "完毕", None).unwrap(), 2);

        let a = get(&storage, &a.id).unwrap();
        let b = get(&storage, &b.id).unwrap();
        assert_eq!(a.end_date, Some(today()));
        assert_eq!(a.end_date, b.end_date);
        assert!(a.status_updated_at.unwrap() >= start);
        assert!(b.status_updated_at.unwrap() >= start);
        assert_eq!(storage.operation_log().last().unwrap().action, "批量更新文件送签状态为 完毕，共更新 2 条");
    }

    #[test]
    fn batch_delete_counts_actual_removals() {
        let (mut storage, config) = setup();
        let a = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();
        let removed = batch_delete(&mut storage, &config, None, &[a.id.clone(), "ghost".into()]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(storage.documents().len(), 1);
        assert_eq!(storage.operation_log().last().unwrap().action, "批量删除文件记录，共删除 1 条");
    }

    #[test]
    fn search_and_combines_predicates() {
        let (mut storage, config) = setup();
        let target = create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();
        let other_type = create(&mut storage, &config, None, draft("会议议题", "王五")).unwrap();
        batch_update_status(&mut storage, &config, None, &[target.id.clone(), other_type.id.clone()], "完毕", None)
            .unwrap();

        let found = search(
            &storage,
            &SearchFilters {
                file_type: Some(FILE_TYPE_PURCHASE_PLAN.into()),
                status: Some("完毕".into()),
                ..Default::default()
            },
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, target.id);

        let unprocessed = search(&storage, &SearchFilters { status: Some(String::new()), ..Default::default() });
        assert_eq!(unprocessed.len(), 1);
        assert_eq!(unprocessed[0].applicant, "李四");
    }

    #[test]
    fn created_by_filter_matches_the_recording_user() {
        let (mut storage, config) = setup();
        let mine = create(&mut storage, &config, Some(&clerk()), draft(FILE_TYPE_PURCHASE_PLAN, "张三")).unwrap();
        create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();

        let found = search(&storage, &SearchFilters { created_by: Some("1001".into()), ..Default::default() });
        assert_eq!(found, vec![mine]);

        let system = search(
            &storage,
            &SearchFilters { created_by: Some(config.system_actor.clone()), ..Default::default() },
        );
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].applicant, "李四");

        let nobody = search(&storage, &SearchFilters { created_by: Some("8888".into()), ..Default::default() });
        assert!(nobody.is_empty());
    }

    #[test]
    fn keyword_is_case_insensitive_across_fields() {
        let (mut storage, config) = setup();
        let mut d = draft("会议议题", "张三");
        d.file_number = Some("TBTC-FIN-0009".into());
        d.contents = vec![ContentLine::new("Coffee Beans", "包", 3.0, 90.0)];
        create(&mut storage, &config, None, d).unwrap();
        create(&mut storage, &config, None, draft(FILE_TYPE_PURCHASE_PLAN, "李四")).unwrap();

        for keyword in ["coffee", "fin-0009", "张三"] {
            let found = search(&storage, &SearchFilters { keyword: Some(keyword.into()), ..Default::default() });
            assert_eq!(found.len(), 1, "keyword {}", keyword);
        }
    }

    #[test]
    fn date_range_is_inclusive() {
        let (mut storage, config) = setup();
        for day in [1, 15, 31] {
            let mut d = draft(FILE_TYPE_PURCHASE_PLAN, "张三");
            d.date = Some(date(2024, 1, day));
            create(&mut storage, &config, None, d).unwrap();
        }
        let found = search(
            &storage,
            &SearchFilters { date_from: Some(date(2024, 1, 15)), date_to: Some(date(2024, 1, 31)), ..Default::default() },
        );
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn default_order_is_newest_first_and_sort_is_configurable() {
        let (mut storage, config) = setup();
        let mut ids = Vec::new();
        for (applicant, amount) in [("b", 10.0), ("a", 30.0), ("c", 20.0)] {
            let mut d = draft(FILE_TYPE_PURCHASE_PLAN, applicant);
            d.contents[0].amount = amount;
            ids.push(create(&mut storage, &config, None, d).unwrap().id);
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        let newest_first: Vec<String> = search(&storage, &SearchFilters::default()).into_iter().map(|r| r.id).collect();
        assert_eq!(newest_first, ids.iter().rev().cloned().collect::<Vec<_>>());

        let by_amount: Vec<String> = search(
            &storage,
            &SearchFilters {
                sort: Some(SortSpec { field: SortField::Amount, order: SortOrder::Asc }),
                ..Default::default()
            },
        )
        .into_iter()
        .map(|r| r.applicant)
        .collect();
        assert_eq!(by_amount, vec!["b", "c", "a"]);
    }
}
