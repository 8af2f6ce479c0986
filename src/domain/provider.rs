use {
    super::error::PipelineError,
    super::id::OrderNumber,
    super::money::Rupiah,
    serde::Serialize,
    std::{future::Future, pin::Pin},
};

#[derive(Debug, Clone, Serialize)]
pub struct SnapItem {
    pub id: String,
    pub price: i64,
    pub quantity: i64,
    pub name: String,
    pub category: String,
}

/// Validated hosted-checkout request.
#[derive(Debug, Clone)]
pub struct SnapRequest {
    pub order_number: OrderNumber,
    pub gross_amount: Rupiah,
    pub customer_details: Option<serde_json::Value>,
    pub items: Option<Vec<SnapItem>>,
    pub frontend_origin: String,
}

#[derive(Debug, Clone)]
pub struct SnapSession {
    pub token: String,
    pub redirect_url: String,
}

pub trait PaymentGateway: Send + Sync {
    fn create_snap_session(
        &self,
        request: &SnapRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SnapSession, PipelineError>> + Send + '_>>;

    /// Ask the provider to refund an order. Returns whatever JSON the
    /// provider answered, success or not; transport failures and
    /// timeouts are errors.
    fn refund(
        &self,
        order_number: &OrderNumber,
        amount: Rupiah,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, PipelineError>> + Send + '_>>;
}
