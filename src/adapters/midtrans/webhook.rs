use {
    super::notification::MidtransNotification,
    crate::{
        AppState,
        adapters::api_errors::{ApiError, RawBody},
        services::reconciler,
    },
    axum::{Json, extract::State},
};

#[tracing::instrument(
    name = "midtrans_callback",
    skip_all,
    fields(order_number = tracing::field::Empty, transaction_status = tracing::field::Empty)
)]
pub async fn callback_handler(
    State(state): State<AppState>,
    RawBody(body): RawBody,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = match MidtransNotification::parse(&body, &state.midtrans_server_key) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "notification rejected");
            return Err(e.into());
        }
    };

    tracing::Span::current()
        .record(
            "order_number",
            tracing::field::display(&notification.order_number),
        )
        .record(
            "transaction_status",
            tracing::field::display(&notification.transaction_status),
        );
    tracing::info!(
        transaction_id = %notification.transaction_id,
        payment_type = notification.payment_type.as_deref().unwrap_or("unknown"),
        "notification received"
    );

    let outcome = reconciler::reconcile(&state.store, &notification.into_payment()).await?;
    tracing::info!(
        status = %outcome.status,
        action = ?outcome.applied.action,
        history = ?outcome.applied.history,
        stock_updates = outcome.stock_changes.len(),
        stock_failures = outcome.stock_failures,
        "notification processed"
    );

    Ok(Json(serde_json::json!({"status": "success"})))
}
