use {
    super::side_effects::notify_detached,
    crate::domain::{
        cancellation::{CancelOutcome, NewCancellation, NewRefundRequest},
        error::PipelineError,
        id::OrderNumber,
        notification::NewNotification,
        order::Order,
        provider::PaymentGateway,
        store::OrderStore,
    },
    std::sync::Arc,
    uuid::Uuid,
};

/// Cancel an order on behalf of its owner. When the order had been paid,
/// a refund is requested from the provider; the refund attempt is always
/// recorded and never fails the cancellation.
pub async fn cancel_order(
    store: &Arc<dyn OrderStore>,
    gateway: &dyn PaymentGateway,
    user_id: Uuid,
    order_number: &OrderNumber,
    reason: Option<&str>,
) -> Result<CancelOutcome, PipelineError> {
    let order = store
        .find_order(order_number)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("order {order_number}")))?;

    if !order.is_owned_by(user_id) {
        tracing::warn!(%order_number, %user_id, "cancellation by non-owner refused");
        return Err(PipelineError::Forbidden("order belongs to another user".into()));
    }

    if !order.status.is_cancellable() {
        return Err(PipelineError::NotCancellable(format!(
            "order is {}",
            order.status
        )));
    }

    let cancellation = NewCancellation::for_order(&order, user_id, reason);
    if !store.cancel_order(&cancellation).await? {
        return Err(PipelineError::NotCancellable(
            "order status changed while cancelling".into(),
        ));
    }
    tracing::info!(
        %order_number,
        previous = %order.status,
        refund_required = cancellation.refund_required,
        "order cancelled"
    );

    notify_detached(
        Arc::clone(store),
        NewNotification::order_cancelled(order.id, &order.order_number),
    );

    if !cancellation.refund_required {
        return Ok(CancelOutcome {
            order_id: order.id,
            refund_required: false,
            refund: None,
            refund_error: None,
        });
    }

    let (refund, refund_error) = request_refund(store.as_ref(), gateway, &order).await;
    Ok(CancelOutcome {
        order_id: order.id,
        refund_required: true,
        refund,
        refund_error,
    })
}

async fn request_refund(
    store: &dyn OrderStore,
    gateway: &dyn PaymentGateway,
    order: &Order,
) -> (Option<serde_json::Value>, Option<String>) {
    let (record, refund, refund_error) =
        match gateway.refund(&order.order_number, order.total_amount).await {
            Ok(response) => {
                let record =
                    NewRefundRequest::from_response(order.id, order.total_amount, response.clone());
                (record, Some(response), None)
            }
            Err(e) => {
                tracing::warn!(
                    order_number = %order.order_number,
                    error = %e,
                    "refund request failed, left pending"
                );
                let message = if matches!(e, PipelineError::GatewayTimeout) {
                    "payment provider timed out".to_string()
                } else {
                    "payment provider unavailable".to_string()
                };
                let record =
                    NewRefundRequest::from_failure(order.id, order.total_amount, &e.to_string());
                (record, None, Some(message))
            }
        };

    tracing::info!(
        order_number = %order.order_number,
        status = record.status.as_str(),
        "refund request recorded"
    );
    if let Err(e) = store.insert_refund_request(&record).await {
        tracing::error!(
            order_number = %order.order_number,
            error = %e,
            "could not persist refund request"
        );
    }
    (refund, refund_error)
}
