use {
    super::error::PipelineError,
    super::id::OrderNumber,
    super::money::Rupiah,
    super::payment::{PaymentStatus, StatusAction},
    serde::{Deserialize, Serialize},
    std::fmt,
    uuid::Uuid,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Unpaid,
    ToPay,
    Paid,
    Success,
    Challenge,
    Failed,
    Cancelled,
    Refunded,
    Processing,
    Shipped,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 12] = [
        Self::Pending,
        Self::Unpaid,
        Self::ToPay,
        Self::Paid,
        Self::Success,
        Self::Challenge,
        Self::Failed,
        Self::Cancelled,
        Self::Refunded,
        Self::Processing,
        Self::Shipped,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Unpaid => "unpaid",
            Self::ToPay => "to_pay",
            Self::Paid => "paid",
            Self::Success => "success",
            Self::Challenge => "challenge",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
        }
    }

    /// Still waiting for the provider to settle.
    pub fn awaiting_payment(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Unpaid | Self::ToPay | Self::Challenge
        )
    }

    /// Money has been captured for this order.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid | Self::Success)
    }

    /// Handed over to fulfilment; owners can no longer cancel.
    pub fn in_fulfillment(&self) -> bool {
        matches!(self, Self::Processing | Self::Shipped | Self::Completed)
    }

    pub fn is_cancellable(&self) -> bool {
        let allowed = matches!(
            self,
            Self::Pending | Self::Unpaid | Self::ToPay | Self::Paid | Self::Success
        );
        allowed && !self.in_fulfillment()
    }

    /// Decide how a provider status applies to an order in this status.
    /// Awaiting orders follow the provider; a failed order may still be
    /// rescued by a late success. Everything else is left alone.
    pub fn decide(&self, incoming: PaymentStatus) -> StatusAction {
        let target = OrderStatus::from(incoming);
        if *self == target || (self.is_paid() && incoming == PaymentStatus::Success) {
            return StatusAction::Unchanged;
        }
        match self {
            s if s.awaiting_payment() => StatusAction::Advance,
            Self::Failed if incoming == PaymentStatus::Success => StatusAction::Advance,
            _ => StatusAction::Anomaly,
        }
    }
}

impl From<PaymentStatus> for OrderStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Success => Self::Success,
            PaymentStatus::Challenge => Self::Challenge,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Pending => Self::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = PipelineError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == lowered)
            .ok_or_else(|| PipelineError::Validation(format!("unknown order status: {s}")))
    }
}

/// Order as seen by the cancellation flow.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_number: OrderNumber,
    pub user_id: Option<Uuid>,
    pub status: OrderStatus,
    pub total_amount: Rupiah,
}

impl Order {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}
