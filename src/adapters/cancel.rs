use {
    crate::{
        AppState,
        adapters::api_errors::{ApiError, RawBody},
        domain::{error::PipelineError, id::OrderNumber},
        services::cancellation::cancel_order,
    },
    axum::{
        Json,
        extract::State,
        http::{HeaderMap, header::AUTHORIZATION},
    },
    serde::Deserialize,
};

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub order_number: Option<String>,
    pub reason: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[tracing::instrument(name = "cancel_order", skip_all, fields(order_number = tracing::field::Empty))]
pub async fn cancel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawBody(body): RawBody,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| PipelineError::Unauthorized("Unauthorized".into()))?;
    let user_id = state.auth.user_id(token).await?;

    let request: CancelRequest = if body.trim_ascii().is_empty() {
        CancelRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| PipelineError::Validation(format!("invalid request body: {e}")))?
    };
    let order_number = request
        .order_number
        .ok_or_else(|| PipelineError::Validation("Missing order_number".into()))?;
    let order_number = OrderNumber::new(order_number)?;
    tracing::Span::current().record("order_number", tracing::field::display(&order_number));

    let outcome = cancel_order(
        &state.store,
        state.gateway.as_ref(),
        user_id,
        &order_number,
        request.reason.as_deref(),
    )
    .await?;

    let mut body = serde_json::json!({
        "status": "success",
        "refund": outcome.refund,
    });
    if let Some(error) = outcome.refund_error {
        body["refund_error"] = serde_json::Value::String(error);
    }
    Ok(Json(body))
}
