// src/backend/models/payment.rs
use crate::models::reference::PaymentType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catch-all choice in the project and company lists whose text is replaced by an override.
pub const OTHER_CHOICE: &str = "其他";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum PayOrReimburse {
    Pay,
    Reimburse,
}

impl PayOrReimburse {
    pub fn label(self) -> &'static str {
        match self {
            PayOrReimburse::Pay => "支付",
            PayOrReimburse::Reimburse => "报销",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年{:02}月", self.year, self.month)
    }
}

/// The accounting period a payment covers.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum Period {
    Month(YearMonth),
    Range { from: YearMonth, to: YearMonth },
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(month) => write!(f, "{}", month),
            Period::Range { from, to } => write!(f, "{}-{}", from, to),
        }
    }
}

/// A choice from a reference list, or `其他` with the text typed in its place.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub selected: String,
    pub other: Option<String>,
}

impl Choice {
    pub fn selected(value: impl Into<String>) -> Self {
        Self { selected: value.into(), other: None }
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self { selected: OTHER_CHOICE.to_string(), other: Some(text.into()) }
    }

    /// The text that ends up in the summary.
    pub fn resolve(&self) -> &str {
        match self.other.as_deref() {
            Some(text) if self.selected == OTHER_CHOICE && !text.trim().is_empty() => text.trim(),
            _ => &self.selected,
        }
    }
}

/// Structured inputs from which a payment document's content line is generated.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct PaymentSummaryInput {
    pub pay_or_reimburse: PayOrReimburse,
    pub project: Choice,
    pub payment_type: PaymentType,
    pub percentage: Option<f64>,
    pub period: Period,
    pub payee_company: Choice,
}
