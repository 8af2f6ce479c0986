use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

const MAX_REFERENCE_LEN: usize = 64;

fn check_reference(kind: &str, id: &str) -> Result<(), PipelineError> {
    if id.trim().is_empty() {
        return Err(PipelineError::Validation(format!("{kind} must not be empty")));
    }
    if id.len() > MAX_REFERENCE_LEN {
        return Err(PipelineError::Validation(format!(
            "{kind} longer than {MAX_REFERENCE_LEN} characters"
        )));
    }
    if id.chars().any(char::is_control) {
        return Err(PipelineError::Validation(format!(
            "{kind} contains control characters"
        )));
    }
    Ok(())
}

/// Human-readable order reference (`INV-001`). The only order key the
/// payment provider knows; Midtrans calls it `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        check_reference("order number", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern matching any order number containing this one,
    /// with the pattern metacharacters escaped.
    pub fn contains_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Provider transaction identifier. Together with the order id it forms
/// the payment-history idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        check_reference("transaction id", &id)?;
        Ok(Self(id))
    }

    /// Midtrans omits `transaction_id` on some notification kinds; the
    /// order number stands in so the history key stays stable.
    pub fn from_order_number(order_number: &OrderNumber) -> Self {
        Self(order_number.as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
