use {
    super::signature::verify_signature,
    crate::domain::{
        error::PipelineError,
        id::{OrderNumber, TransactionId},
        money::Rupiah,
        payment::{FraudStatus, PaymentNotification, PaymentStatus, TransactionStatus},
    },
    serde::{Deserialize, Deserializer},
};

/// HTTP notification body as Midtrans sends it. Every field is optional
/// here; presence is enforced by [`MidtransNotification::parse`].
#[derive(Debug, Default, Deserialize)]
pub struct RawNotification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub signature_key: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

/// Accept `"200"` as well as `200`; numbers are rendered the way the
/// provider signs them.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Signed and validated Midtrans notification.
#[derive(Debug, Clone)]
pub struct MidtransNotification {
    pub order_number: OrderNumber,
    pub transaction_status: TransactionStatus,
    pub fraud_status: Option<FraudStatus>,
    pub transaction_id: TransactionId,
    pub gross_amount: Rupiah,
    pub payment_type: Option<String>,
    pub raw: serde_json::Value,
}

impl MidtransNotification {
    /// Verify the signature, then validate the fields reconciliation
    /// needs. A body that is not JSON carries no signature to verify, so it
    /// is rejected the same way as a bad one.
    pub fn parse(body: &[u8], server_key: &str) -> Result<Self, PipelineError> {
        let raw: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
            PipelineError::WebhookSignature(format!("notification is not JSON: {e}"))
        })?;
        let fields: RawNotification = serde_json::from_value(raw.clone()).unwrap_or_default();

        if !verify_signature(
            fields.order_id.as_deref(),
            fields.status_code.as_deref(),
            fields.gross_amount.as_deref(),
            fields.signature_key.as_deref(),
            server_key,
        ) {
            return Err(PipelineError::WebhookSignature(
                "signature_key does not match".into(),
            ));
        }

        let order_number = OrderNumber::new(fields.order_id.unwrap_or_default())?;
        let transaction_status = fields
            .transaction_status
            .as_deref()
            .map(TransactionStatus::from)
            .ok_or_else(|| PipelineError::Validation("missing transaction_status".into()))?;
        let fraud_status = fields.fraud_status.as_deref().map(FraudStatus::from);
        let transaction_id = match fields.transaction_id.filter(|id| !id.is_empty()) {
            Some(id) => TransactionId::new(id)?,
            None => TransactionId::from_order_number(&order_number),
        };
        let gross_amount = Rupiah::parse(fields.gross_amount.as_deref().unwrap_or_default())?;

        Ok(Self {
            order_number,
            transaction_status,
            fraud_status,
            transaction_id,
            gross_amount,
            payment_type: fields.payment_type,
            raw,
        })
    }

    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_provider(&self.transaction_status, self.fraud_status.as_ref())
    }

    pub fn into_payment(self) -> PaymentNotification {
        let status = self.payment_status();
        PaymentNotification {
            order_number: self.order_number,
            transaction_id: self.transaction_id,
            amount: self.gross_amount,
            status,
            raw: self.raw,
        }
    }
}
