// src/backend/services/summary.rs
use crate::error::RegistryError;
use crate::models::payment::{Period, PaymentSummaryInput};

fn check_period(period: &Period) -> Result<(), RegistryError> {
    let months = match period {
        Period::Month(month) => vec![month],
        Period::Range { from, to } => {
            if to < from {
                return Err(RegistryError::invalid(format!("period ends before it starts: {}", period)));
            }
            vec![from, to]
        }
    };
    if let Some(bad) = months.into_iter().find(|m| !m.is_valid()) {
        return Err(RegistryError::invalid(format!("month must be between 1 and 12, got {}", bad.month)));
    }
    Ok(())
}

/// Builds the content line of a payment document:
/// `支付：<project>，<type>[(<pct>%)]，(<period>--<company>)`.
/// A zero or non-finite percentage leaves the segment out.
///
/// # Errors
///
/// `Validation` for a month outside 1..=12 or a range that ends before it starts.
pub fn summarize_payment(input: &PaymentSummaryInput) -> Result<String, RegistryError> {
    check_period(&input.period)?;
    let mut summary = format!("{}：{}，{}", input.pay_or_reimburse.label(), input.project.resolve(), input.payment_type.name);
    if input.payment_type.need_percentage {
        if let Some(percentage) = input.percentage.filter(|p| p.is_finite() && *p != 0.0) {
            summary.push_str(&format!("({}%)", percentage));
        }
    }
    summary.push_str(&format!("，({}--{})", input.period, input.payee_company.resolve()));
    Ok(summary)
}
