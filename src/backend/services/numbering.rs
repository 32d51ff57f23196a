// src/backend/services/numbering.rs
// Human-readable document numbers built from per-category sequence counters.

use crate::models::document::{is_payment_file_type, FILE_TYPE_CONTRACT, FILE_TYPE_PURCHASE_PLAN};
use crate::storage::Storage;
use ic_stable_structures::Memory;

pub const DEFAULT_PAD_WIDTH: usize = 4;
const PAYMENT_PAD_WIDTH: usize = 7;
const NUMBER_PREFIX: &str = "TBTC";
const GENERIC_PREFIX: &str = "DOC";
const FALLBACK_DEPARTMENT_CODE: &str = "MISC";

/// Department name fragment → code used in contract numbers. First match wins.
const DEPARTMENT_CODES: [(&str, &str); 10] = [
    ("财务", "FIN"),
    ("前厅", "FO"),
    ("行政", "EO"),
    ("人事", "HR"),
    ("客房", "HKSP"),
    ("销售", "S&M"),
    ("工程", "ENG"),
    ("工会", "TU"),
    ("食材", "FOOD"),
    ("酒水", "BEVERAGE"),
];

/// Which template a file type is numbered with, and the counter it draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberScheme {
    /// `TBTC-0001`
    Purchase,
    /// `TBTC-FIN-0001`
    Contract,
    /// `0000001`
    Payment,
    /// `DOC-0001`
    Generic,
}

impl NumberScheme {
    pub fn for_file_type(file_type: &str) -> Self {
        if file_type == FILE_TYPE_PURCHASE_PLAN {
            NumberScheme::Purchase
        } else if file_type == FILE_TYPE_CONTRACT {
            NumberScheme::Contract
        } else if is_payment_file_type(file_type) {
            NumberScheme::Payment
        } else {
            NumberScheme::Generic
        }
    }

    pub fn sequence_category(self) -> &'static str {
        match self {
            NumberScheme::Purchase => "purchase",
            NumberScheme::Contract => "contract",
            NumberScheme::Payment => "payment",
            NumberScheme::Generic => "doc",
        }
    }

    pub fn pad_width(self) -> usize {
        match self {
            NumberScheme::Payment => PAYMENT_PAD_WIDTH,
            _ => DEFAULT_PAD_WIDTH,
        }
    }
}

pub fn department_code(department: &str) -> &'static str {
    DEPARTMENT_CODES
        .iter()
        .find(|(fragment, _)| department.contains(fragment))
        .map_or(FALLBACK_DEPARTMENT_CODE, |(_, code)| code)
}

/// Applies the scheme's template around an already-allocated sequence segment.
pub fn format_document_number(scheme: NumberScheme, department: &str, sequence: &str) -> String {
    match scheme {
        NumberScheme::Purchase => format!("{}-{}", NUMBER_PREFIX, sequence),
        NumberScheme::Contract => format!("{}-{}-{}", NUMBER_PREFIX, department_code(department), sequence),
        NumberScheme::Payment => sequence.to_string(),
        NumberScheme::Generic => format!("{}-{}", GENERIC_PREFIX, sequence),
    }
}

/// Increments the counter of `category` and returns it zero-padded to `pad_width`.
/// Callers are serialized by `&mut Storage`.
pub fn next_sequence<M: Memory>(storage: &mut Storage<M>, category: &str, pad_width: usize) -> String {
    let value = storage.sequences.increment(category);
    tracing::debug!(category, value, "sequence advanced");
    format!("{:0width$}", value, width = pad_width)
}

/// Builds a document number for `file_type`. An `existing_number` replaces
/// the sequence segment verbatim and no counter is advanced.
pub fn generate_document_number<M: Memory>(
    storage: &mut Storage<M>,
    file_type: &str,
    department: &str,
    existing_number: Option<&str>,
) -> String {
    let scheme = NumberScheme::for_file_type(file_type);
    let sequence = match existing_number.map(str::trim).filter(|n| !n.is_empty()) {
        Some(existing) => existing.to_string(),
        None => next_sequence(storage, scheme.sequence_category(), scheme.pad_width()),
    };
    format_document_number(scheme, department, &sequence)
}
