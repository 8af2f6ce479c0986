use {
    crate::domain::{
        error::PipelineError,
        id::OrderNumber,
        money::Rupiah,
        provider::{PaymentGateway, SnapRequest, SnapSession},
    },
    serde::Deserialize,
    std::{future::Future, pin::Pin, time::Duration},
};

const SANDBOX_SNAP_BASE: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_SNAP_BASE: &str = "https://app.midtrans.com";
const SANDBOX_API_BASE: &str = "https://api.sandbox.midtrans.com";
const PRODUCTION_API_BASE: &str = "https://api.midtrans.com";

pub fn snap_base(is_production: bool) -> &'static str {
    if is_production {
        PRODUCTION_SNAP_BASE
    } else {
        SANDBOX_SNAP_BASE
    }
}

pub fn api_base(is_production: bool) -> &'static str {
    if is_production {
        PRODUCTION_API_BASE
    } else {
        SANDBOX_API_BASE
    }
}

#[derive(Debug, Deserialize)]
struct SnapResponse {
    token: Option<String>,
    redirect_url: Option<String>,
    #[serde(default)]
    error_messages: Vec<String>,
}

pub struct MidtransGateway {
    http: reqwest::Client,
    server_key: String,
    snap_base: String,
    api_base: String,
}

impl MidtransGateway {
    pub fn new(
        server_key: &str,
        is_production: bool,
        timeout: Duration,
    ) -> Result<Self, PipelineError> {
        Self::with_endpoints(
            server_key,
            snap_base(is_production),
            api_base(is_production),
            timeout,
        )
    }

    /// Point the gateway at explicit hosts (sandbox mirrors, test servers).
    pub fn with_endpoints(
        server_key: &str,
        snap_base: &str,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Gateway(format!("http client: {e}")))?;
        Ok(Self {
            http,
            server_key: server_key.to_string(),
            snap_base: snap_base.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn create_snap_session_inner(
        &self,
        request: &SnapRequest,
    ) -> Result<SnapSession, PipelineError> {
        let body = snap_body(request);
        tracing::debug!(order_number = %request.order_number, "requesting snap token");

        let response = self
            .http
            .post(format!("{}/snap/v1/transactions", self.snap_base))
            .basic_auth(&self.server_key, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let parsed: SnapResponse = serde_json::from_str(&text).map_err(|_| {
            PipelineError::Gateway(format!("snap answered {status} with a non-JSON body"))
        })?;

        if !status.is_success() {
            return Err(PipelineError::Gateway(format!(
                "snap answered {status}: {}",
                parsed.error_messages.join("; ")
            )));
        }

        let token = parsed
            .token
            .ok_or_else(|| PipelineError::Gateway("snap response without token".into()))?;
        let redirect_url = parsed
            .redirect_url
            .unwrap_or_else(|| vtweb_url(&self.snap_base, &token));
        Ok(SnapSession {
            token,
            redirect_url,
        })
    }

    async fn refund_inner(
        &self,
        order_number: &OrderNumber,
        amount: Rupiah,
    ) -> Result<serde_json::Value, PipelineError> {
        let body = serde_json::json!({
            "refund_key": format!("cancel_{order_number}"),
            "amount": amount.value(),
        });

        let response = self
            .http
            .post(format!("{}/v2/{}/refund", self.api_base, order_number))
            .basic_auth(&self.server_key, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| {
            serde_json::json!({
                "http_status": status.as_u16(),
                "body": text,
            })
        }))
    }
}

impl PaymentGateway for MidtransGateway {
    fn create_snap_session(
        &self,
        request: &SnapRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SnapSession, PipelineError>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move { self.create_snap_session_inner(&request).await })
    }

    fn refund(
        &self,
        order_number: &OrderNumber,
        amount: Rupiah,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, PipelineError>> + Send + '_>> {
        let order_number = order_number.clone();
        Box::pin(async move { self.refund_inner(&order_number, amount).await })
    }
}

/// Snap transaction body: amounts as integers, 3-D Secure on, and the
/// storefront pages the hosted checkout returns to.
pub fn snap_body(request: &SnapRequest) -> serde_json::Value {
    let origin = request.frontend_origin.trim_end_matches('/');
    let mut body = serde_json::json!({
        "transaction_details": {
            "order_id": request.order_number.as_str(),
            "gross_amount": request.gross_amount.value(),
        },
        "credit_card": { "secure": true },
        "callbacks": {
            "finish": format!("{origin}/payment-success.html"),
            "error": format!("{origin}/checkout.html"),
        },
    });
    if let Some(customer) = &request.customer_details {
        body["customer_details"] = customer.clone();
    }
    if let Some(items) = &request.items {
        body["item_details"] = serde_json::json!(items);
    }
    body
}

pub fn vtweb_url(snap_base: &str, token: &str) -> String {
    format!("{}/snap/v2/vtweb/{token}", snap_base.trim_end_matches('/'))
}
