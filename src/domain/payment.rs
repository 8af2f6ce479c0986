use {
    super::error::PipelineError,
    super::id::{OrderNumber, TransactionId},
    super::money::Rupiah,
    super::order::OrderStatus,
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

/// Provider-side `transaction_status`. Values Midtrans may add later land
/// in `Other` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Capture,
    Settlement,
    Pending,
    Deny,
    Cancel,
    Expire,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Capture => "capture",
            Self::Settlement => "settlement",
            Self::Pending => "pending",
            Self::Deny => "deny",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for TransactionStatus {
    fn from(s: &str) -> Self {
        match s {
            "capture" => Self::Capture,
            "settlement" => Self::Settlement,
            "pending" => Self::Pending,
            "deny" => Self::Deny,
            "cancel" => Self::Cancel,
            "expire" => Self::Expire,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    Other(String),
}

impl From<&str> for FraudStatus {
    fn from(s: &str) -> Self {
        match s {
            "accept" => Self::Accept,
            "challenge" => Self::Challenge,
            "deny" => Self::Deny,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Internal payment outcome derived from a provider notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Success,
    /// Captured but held by the fraud screen; not final.
    Challenge,
    Failed,
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Challenge => "challenge",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }

    /// Total mapping from the provider's status pair. Unknown combinations
    /// degrade to `Pending`.
    pub fn from_provider(
        transaction: &TransactionStatus,
        fraud: Option<&FraudStatus>,
    ) -> PaymentStatus {
        match (transaction, fraud) {
            (TransactionStatus::Capture, Some(FraudStatus::Accept)) => Self::Success,
            (TransactionStatus::Capture, Some(FraudStatus::Challenge)) => Self::Challenge,
            (TransactionStatus::Settlement, _) => Self::Success,
            (TransactionStatus::Cancel | TransactionStatus::Deny | TransactionStatus::Expire, _) => {
                Self::Failed
            }
            (TransactionStatus::Pending, _) => Self::Pending,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "success" => Ok(Self::Success),
            "challenge" => Ok(Self::Challenge),
            "failed" => Ok(Self::Failed),
            "pending" => Ok(Self::Pending),
            other => Err(PipelineError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

/// A verified provider notification, reduced to what reconciliation needs.
#[derive(Debug, Clone)]
pub struct PaymentNotification {
    pub order_number: OrderNumber,
    pub transaction_id: TransactionId,
    pub amount: Rupiah,
    pub status: PaymentStatus,
    /// Untouched provider payload, stored with the payment history.
    pub raw: serde_json::Value,
}

/// What a notification asks the store to record for one order.
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub id: Uuid,
    pub transaction_id: TransactionId,
    pub payment_method: String,
    pub amount: Rupiah,
    pub status: PaymentStatus,
    pub payment_details: serde_json::Value,
}

impl NewPaymentRecord {
    pub fn new(
        transaction_id: TransactionId,
        amount: Rupiah,
        status: PaymentStatus,
        payment_details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            transaction_id,
            payment_method: "midtrans".to_string(),
            amount,
            status,
            payment_details,
        }
    }
}

/// How the order row reacted to an incoming payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Order moved to the mapped status.
    Advance,
    /// Order already carries the mapped status (redelivery).
    Unchanged,
    /// Transition not allowed from the current status; left as is.
    Anomaly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWrite {
    Inserted,
    Updated,
}

/// Result of the transactional part of reconciliation.
#[derive(Debug, Clone)]
pub struct AppliedPayment {
    pub order_id: Uuid,
    pub previous: OrderStatus,
    pub current: OrderStatus,
    pub action: StatusAction,
    pub history: HistoryWrite,
    /// This delivery won the stock gate and must decrement stock.
    pub stock_claimed: bool,
    /// When stock was (or is now being) adjusted for this order.
    pub stock_adjusted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    pub product_id: Uuid,
    pub before: i32,
    pub after: i32,
}

#[derive(Debug)]
pub struct ReconcileOutcome {
    pub order_number: OrderNumber,
    pub status: PaymentStatus,
    pub applied: AppliedPayment,
    pub stock_changes: Vec<StockChange>,
    pub stock_failures: usize,
}
