// src/backend/models/document.rs
use crate::models::common::{CalendarDate, DocumentId, SortOrder, Timestamp};
use serde::{Deserialize, Serialize};

pub const FILE_TYPE_PURCHASE_PLAN: &str = "采购计划审批表";
pub const FILE_TYPE_CONTRACT: &str = "合同（协议）签订审批表";
pub const FILE_TYPE_PAYMENT_REQUEST: &str = "付款申请单";
pub const FILE_TYPE_PAYMENT_WITH_SEAL: &str = "付款单+用印审批（仅限验收报告）";

/// File types whose content lines are generated by services::summary.
pub fn is_payment_file_type(file_type: &str) -> bool {
    file_type == FILE_TYPE_PAYMENT_REQUEST || file_type == FILE_TYPE_PAYMENT_WITH_SEAL
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ContentLine {
    pub content: String,
    pub unit: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub amount: f64,
}

impl ContentLine {
    pub fn new(content: impl Into<String>, unit: impl Into<String>, quantity: f64, amount: f64) -> Self {
        Self { content: content.into(), unit: unit.into(), quantity, amount }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub date: CalendarDate,
    pub file_type: String,
    pub department: String,
    pub applicant: String,
    pub file_number: Option<String>,
    pub contents: Vec<ContentLine>,
    /// Routing status; `None` is unprocessed.
    pub status: Option<String>,
    pub status_updated_at: Option<Timestamp>,
    /// Present exactly when `status` is the Complete value.
    pub end_date: Option<CalendarDate>,
    /// Present only when `status` is the Reject value.
    pub reject_reason: Option<String>,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DocumentRecord {
    pub fn total_amount(&self) -> f64 {
        self.contents.iter().map(|line| line.amount).sum()
    }

    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// Input to `create`. Empty strings count as missing.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct DocumentDraft {
    pub date: Option<CalendarDate>,
    pub file_type: String,
    pub department: String,
    pub applicant: String,
    pub file_number: Option<String>,
    pub contents: Vec<ContentLine>,
}

/// Fields to merge onto a stored record. `None` leaves a field untouched.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct DocumentPatch {
    pub date: Option<CalendarDate>,
    pub file_type: Option<String>,
    pub department: Option<String>,
    pub applicant: Option<String>,
    /// `Some("")` clears the number.
    pub file_number: Option<String>,
    pub contents: Option<Vec<ContentLine>>,
    /// `Some("")` moves the record back to unprocessed.
    pub status: Option<String>,
    pub reject_reason: Option<String>,
}

impl DocumentPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self { status: Some(status.into()), ..Default::default() }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Date,
    FileType,
    FileNumber,
    Department,
    Applicant,
    Status,
    StatusUpdatedAt,
    EndDate,
    Amount,
    CreatedAt,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { field: SortField::CreatedAt, order: SortOrder::Desc }
    }
}

/// All set predicates are AND-combined.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct SearchFilters {
    /// Case-insensitive substring over file type, department, applicant, contents and file number.
    pub keyword: Option<String>,
    pub file_type: Option<String>,
    pub department: Option<String>,
    /// Exact match; `Some("")` selects unprocessed records.
    pub status: Option<String>,
    pub created_by: Option<String>,
    pub date_from: Option<CalendarDate>,
    /// Inclusive through the end of the day.
    pub date_to: Option<CalendarDate>,
    pub sort: Option<SortSpec>,
}
