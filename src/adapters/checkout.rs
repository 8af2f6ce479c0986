use {
    crate::{
        AppState,
        adapters::api_errors::{ApiError, RawBody},
        domain::{
            error::PipelineError,
            id::OrderNumber,
            money::Rupiah,
            provider::{SnapItem, SnapRequest},
        },
    },
    axum::{Json, extract::State},
    serde::Deserialize,
};

/// Storefront clients send amounts as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// Integer value, truncating any fraction.
    pub fn to_i64(&self, field: &str) -> Result<i64, PipelineError> {
        let invalid = || PipelineError::Validation(format!("{field} is not a number"));
        match self {
            Self::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(invalid),
            Self::Text(s) => {
                let s = s.trim();
                let whole = s.split_once('.').map_or(s, |(whole, _)| whole);
                whole.parse().map_err(|_| invalid())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionDetails {
    pub order_id: Option<String>,
    pub gross_amount: Option<Amount>,
}

#[derive(Debug, Deserialize)]
pub struct ItemDetail {
    pub id: Option<serde_json::Value>,
    pub price: Option<Amount>,
    pub quantity: Option<Amount>,
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SnapTokenRequest {
    pub transaction_details: Option<TransactionDetails>,
    pub customer_details: Option<serde_json::Value>,
    pub item_details: Option<serde_json::Value>,
    #[serde(rename = "frontendOrigin")]
    pub frontend_origin: Option<String>,
}

impl SnapTokenRequest {
    pub fn into_snap_request(self, default_origin: &str) -> Result<SnapRequest, PipelineError> {
        let incomplete = || PipelineError::Validation("incomplete transaction details".into());
        let details = self.transaction_details.ok_or_else(incomplete)?;
        let order_id = details.order_id.filter(|id| !id.is_empty()).ok_or_else(incomplete)?;
        let gross_amount = details.gross_amount.ok_or_else(incomplete)?;
        let gross_amount = Rupiah::new(gross_amount.to_i64("gross_amount")?)?;
        if gross_amount.value() == 0 {
            return Err(incomplete());
        }

        // Anything other than an array is ignored, as Snap would reject it.
        let items = match self.item_details {
            Some(serde_json::Value::Array(raw)) => Some(
                raw.into_iter()
                    .map(|item| {
                        let item: ItemDetail = serde_json::from_value(item).map_err(|e| {
                            PipelineError::Validation(format!("invalid item: {e}"))
                        })?;
                        snap_item(item)
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };

        Ok(SnapRequest {
            order_number: OrderNumber::new(order_id)?,
            gross_amount,
            customer_details: self.customer_details,
            items,
            frontend_origin: self
                .frontend_origin
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| default_origin.to_string()),
        })
    }
}

fn snap_item(item: ItemDetail) -> Result<SnapItem, PipelineError> {
    let id = match item.id {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let price = item
        .price
        .ok_or_else(|| PipelineError::Validation("item price missing".into()))?
        .to_i64("price")?;
    let quantity = item
        .quantity
        .ok_or_else(|| PipelineError::Validation("item quantity missing".into()))?
        .to_i64("quantity")?;
    Ok(SnapItem {
        id,
        price,
        quantity,
        name: item.name.unwrap_or_default(),
        category: item
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Produk".to_string()),
    })
}

#[tracing::instrument(name = "generate_snap_token", skip_all)]
pub async fn snap_token_handler(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request: SnapTokenRequest = serde_json::from_slice(&body)
        .map_err(|e| PipelineError::Validation(format!("invalid request body: {e}")))?;
    let request = request.into_snap_request(&state.frontend_origin)?;
    tracing::info!(
        order_number = %request.order_number,
        origin = %request.frontend_origin,
        "creating snap session"
    );

    let session = state.gateway.create_snap_session(&request).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "token": session.token,
        "redirect_url": session.redirect_url,
    })))
}

pub async fn client_config_handler(
    State(state): State<AppState>,
) -> Json<crate::config::PublicMidtransConfig> {
    Json(state.client_config.as_ref().clone())
}
