use {
    super::id::OrderNumber,
    super::order::OrderStatus,
    super::payment::PaymentStatus,
    uuid::Uuid,
};

/// Admin-facing event shown in the dashboard feed.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub meta: serde_json::Value,
    pub audience: String,
}

impl NewNotification {
    fn admin(kind: &str, title: &str, message: String, meta: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.to_string(),
            title: title.to_string(),
            message,
            meta,
            audience: "admin".to_string(),
        }
    }

    pub fn order_cancelled(order_id: Uuid, order_number: &OrderNumber) -> Self {
        Self::admin(
            "order_cancelled",
            "Order cancelled",
            format!("Order {order_number} was cancelled"),
            serde_json::json!({ "order_id": order_id }),
        )
    }

    pub fn payment_update(
        order_id: Uuid,
        order_number: &OrderNumber,
        old: OrderStatus,
        new: OrderStatus,
    ) -> Self {
        Self::admin(
            "payment_update",
            "Payment update",
            format!("Order {order_number} is now {new}"),
            serde_json::json!({
                "order_id": order_id,
                "old_status": old.as_str(),
                "new_status": new.as_str(),
            }),
        )
    }

    pub fn payment_anomaly(
        order_id: Uuid,
        order_number: &OrderNumber,
        current: OrderStatus,
        incoming: PaymentStatus,
    ) -> Self {
        Self::admin(
            "payment_anomaly",
            "Payment needs review",
            format!("Order {order_number} is {current} but the provider reported {incoming}"),
            serde_json::json!({
                "order_id": order_id,
                "current_status": current.as_str(),
                "incoming_status": incoming.as_str(),
                "anomaly": true,
            }),
        )
    }
}

/// Failure record for the admin team, written when reconciliation could
/// not complete.
#[derive(Debug, Clone)]
pub struct NewErrorLog {
    pub id: Uuid,
    pub source: String,
    pub message: String,
    pub details: serde_json::Value,
    pub order_number: Option<String>,
}

impl NewErrorLog {
    pub fn new(
        source: &str,
        message: impl Into<String>,
        details: serde_json::Value,
        order_number: Option<&OrderNumber>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.to_string(),
            message: message.into(),
            details,
            order_number: order_number.map(|n| n.as_str().to_string()),
        }
    }
}
