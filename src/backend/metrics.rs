// src/backend/metrics.rs
use crate::models::common::CalendarDate;
use crate::models::document::DocumentRecord;
use crate::utils::time::same_month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry statistics computed on demand from the stored documents.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RegistryStatistics {
    pub total_documents: usize,
    /// Sum of every content line amount.
    pub total_amount: f64,
    pub by_file_type: BTreeMap<String, usize>,
    pub by_department: BTreeMap<String, usize>,
    /// Unprocessed documents are not counted here.
    pub by_status: BTreeMap<String, usize>,
    /// Documents whose `date` falls in the month of `today`.
    pub this_month: usize,
}

pub fn compute_statistics(documents: &[DocumentRecord], today: CalendarDate) -> RegistryStatistics {
    let mut stats = RegistryStatistics { total_documents: documents.len(), ..Default::default() };
    for document in documents {
        stats.total_amount += document.total_amount();
        *stats.by_file_type.entry(document.file_type.clone()).or_default() += 1;
        *stats.by_department.entry(document.department.clone()).or_default() += 1;
        if let Some(status) = &document.status {
            *stats.by_status.entry(status.clone()).or_default() += 1;
        }
        if same_month(&document.date, &today) {
            stats.this_month += 1;
        }
    }
    stats
}
