use {
    super::money::Rupiah,
    super::order::{Order, OrderStatus},
    uuid::Uuid,
};

#[derive(Debug, Clone)]
pub struct NewCancellation {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub refund_required: bool,
    /// Status the order had when the owner asked to cancel. The store only
    /// cancels if the row still carries it.
    pub expected_status: OrderStatus,
}

impl NewCancellation {
    pub fn for_order(order: &Order, user_id: Uuid, reason: Option<&str>) -> Self {
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("cancel");
        Self {
            id: Uuid::now_v7(),
            order_id: order.id,
            user_id,
            reason: reason.to_string(),
            refund_required: order.status.is_paid(),
            expected_status: order.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundRequestStatus {
    /// Provider accepted the refund.
    Requested,
    /// Provider refused, failed or timed out; needs follow-up.
    Pending,
}

impl RefundRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewRefundRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: Rupiah,
    pub provider: String,
    pub status: RefundRequestStatus,
    pub response: serde_json::Value,
}

impl NewRefundRequest {
    /// Record what the provider answered. Midtrans reports acceptance with
    /// `status_code: "200"` inside the body, independent of HTTP status.
    pub fn from_response(order_id: Uuid, amount: Rupiah, response: serde_json::Value) -> Self {
        let accepted = response
            .get("status_code")
            .and_then(|v| v.as_str())
            .is_some_and(|code| code == "200");
        Self {
            id: Uuid::now_v7(),
            order_id,
            amount,
            provider: "midtrans".to_string(),
            status: if accepted {
                RefundRequestStatus::Requested
            } else {
                RefundRequestStatus::Pending
            },
            response,
        }
    }

    pub fn from_failure(order_id: Uuid, amount: Rupiah, error: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id,
            amount,
            provider: "midtrans".to_string(),
            status: RefundRequestStatus::Pending,
            response: serde_json::json!({ "error": error }),
        }
    }
}

#[derive(Debug)]
pub struct CancelOutcome {
    pub order_id: Uuid,
    pub refund_required: bool,
    /// Raw provider answer, when a refund was attempted and answered.
    pub refund: Option<serde_json::Value>,
    pub refund_error: Option<String>,
}
