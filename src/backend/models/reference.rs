// src/backend/models/reference.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The administrator-managed vocabularies that populate selection fields.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceCategory {
    FileTypes,
    Departments,
    Units,
    Statuses,
    PaymentCompanies,
    PaymentTypes,
    PaymentProjects,
}

impl ReferenceCategory {
    pub const ALL: [ReferenceCategory; 7] = [
        ReferenceCategory::FileTypes,
        ReferenceCategory::Departments,
        ReferenceCategory::Units,
        ReferenceCategory::Statuses,
        ReferenceCategory::PaymentCompanies,
        ReferenceCategory::PaymentTypes,
        ReferenceCategory::PaymentProjects,
    ];

    /// Label used in operation-log text.
    pub fn display_name(self) -> &'static str {
        match self {
            ReferenceCategory::FileTypes => "文件类型",
            ReferenceCategory::Departments => "部门",
            ReferenceCategory::Units => "计量单位",
            ReferenceCategory::Statuses => "送签状态",
            ReferenceCategory::PaymentCompanies => "付款单位简称",
            ReferenceCategory::PaymentTypes => "支付类型",
            ReferenceCategory::PaymentProjects => "支付项目",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PaymentType {
    pub name: String,
    /// Whether the payment summary carries a percentage, e.g. 预付款(30%).
    #[serde(default)]
    pub need_percentage: bool,
}

impl PaymentType {
    pub fn new(name: impl Into<String>, need_percentage: bool) -> Self {
        Self { name: name.into(), need_percentage }
    }
}

/// One entry of a reference list. Only `PaymentTypes` holds structured entries.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum ReferenceEntry {
    Value(String),
    PaymentType(PaymentType),
}

impl ReferenceEntry {
    /// The value duplicates and removals are matched on.
    pub fn name(&self) -> &str {
        match self {
            ReferenceEntry::Value(value) => value,
            ReferenceEntry::PaymentType(payment_type) => &payment_type.name,
        }
    }

    /// Reshapes the entry to the form stored for `category`.
    pub fn conform(self, category: ReferenceCategory) -> Self {
        match (category, self) {
            (ReferenceCategory::PaymentTypes, ReferenceEntry::Value(name)) => {
                ReferenceEntry::PaymentType(PaymentType::new(name, false))
            }
            (ReferenceCategory::PaymentTypes, entry) => entry,
            (_, ReferenceEntry::PaymentType(payment_type)) => ReferenceEntry::Value(payment_type.name),
            (_, entry) => entry,
        }
    }

    pub(crate) fn trimmed(self) -> Self {
        match self {
            ReferenceEntry::Value(value) => ReferenceEntry::Value(value.trim().to_string()),
            ReferenceEntry::PaymentType(payment_type) => ReferenceEntry::PaymentType(PaymentType {
                name: payment_type.name.trim().to_string(),
                need_percentage: payment_type.need_percentage,
            }),
        }
    }
}

impl fmt::Display for ReferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ReferenceEntry {
    fn from(value: &str) -> Self {
        ReferenceEntry::Value(value.to_string())
    }
}

impl From<String> for ReferenceEntry {
    fn from(value: String) -> Self {
        ReferenceEntry::Value(value)
    }
}

impl From<PaymentType> for ReferenceEntry {
    fn from(value: PaymentType) -> Self {
        ReferenceEntry::PaymentType(value)
    }
}

/// Persisted reference lists. A category that was never written is absent
/// and reads as its seed list.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub lists: BTreeMap<ReferenceCategory, Vec<ReferenceEntry>>,
}
