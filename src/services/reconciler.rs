use {
    super::side_effects::{log_error_detached, notify_detached},
    crate::domain::{
        error::PipelineError,
        id::OrderNumber,
        notification::{NewErrorLog, NewNotification},
        order::Order,
        payment::{
            NewPaymentRecord, PaymentNotification, PaymentStatus, ReconcileOutcome, StatusAction,
            StockChange,
        },
        store::OrderStore,
    },
    std::sync::Arc,
    uuid::Uuid,
};

/// Apply a verified provider notification: resolve the order, record the
/// status and payment history atomically, then adjust stock if this
/// delivery is the first to see the order succeed.
///
/// Any error means nothing authoritative was committed for this delivery
/// and the provider should retry; the steps are idempotent.
pub async fn reconcile(
    store: &Arc<dyn OrderStore>,
    notification: &PaymentNotification,
) -> Result<ReconcileOutcome, PipelineError> {
    let order = match resolve_order(store.as_ref(), &notification.order_number).await {
        Ok(order) => order,
        Err(e) => {
            record_failure(store, "order_lookup", &e, notification);
            return Err(e);
        }
    };

    let record = NewPaymentRecord::new(
        notification.transaction_id.clone(),
        notification.amount,
        notification.status,
        notification.raw.clone(),
    );

    let applied = match store.apply_payment(order.id, &record).await {
        Ok(applied) => applied,
        Err(e) => {
            record_failure(store, "payment_history", &e, notification);
            return Err(e);
        }
    };

    match applied.action {
        StatusAction::Advance => {
            tracing::info!(
                order_number = %order.order_number,
                from = %applied.previous,
                to = %applied.current,
                "order status changed"
            );
            notify_detached(
                Arc::clone(store),
                NewNotification::payment_update(
                    order.id,
                    &order.order_number,
                    applied.previous,
                    applied.current,
                ),
            );
        }
        StatusAction::Unchanged => {
            tracing::info!(
                order_number = %order.order_number,
                status = %applied.current,
                "order already in reported status"
            );
        }
        StatusAction::Anomaly => {
            tracing::warn!(
                order_number = %order.order_number,
                current = %applied.current,
                incoming = %notification.status,
                "status transition not allowed, recorded as anomaly"
            );
            notify_detached(
                Arc::clone(store),
                NewNotification::payment_anomaly(
                    order.id,
                    &order.order_number,
                    applied.current,
                    notification.status,
                ),
            );
        }
    }

    let (stock_changes, stock_failures) = if applied.stock_claimed {
        adjust_stock(store, order.id, &order.order_number).await
    } else {
        if notification.status == PaymentStatus::Success {
            tracing::info!(
                order_number = %order.order_number,
                adjusted_at = ?applied.stock_adjusted_at,
                "stock already adjusted for this order, skipping"
            );
        }
        (Vec::new(), 0)
    };

    Ok(ReconcileOutcome {
        order_number: order.order_number,
        status: notification.status,
        applied,
        stock_changes,
        stock_failures,
    })
}

/// Exact `order_number` lookup, then a substring fallback for references
/// the provider decorated or truncated.
pub async fn resolve_order(
    store: &dyn OrderStore,
    order_number: &OrderNumber,
) -> Result<Order, PipelineError> {
    if let Some(order) = store.find_order(order_number).await? {
        return Ok(order);
    }

    tracing::warn!(%order_number, "no exact order match, trying substring lookup");
    match store.find_order_fuzzy(order_number).await? {
        Some(order) => {
            tracing::warn!(
                %order_number,
                matched = %order.order_number,
                "notification matched by substring"
            );
            Ok(order)
        }
        None => {
            tracing::error!(%order_number, "notification for unknown order");
            Err(PipelineError::UnmatchedNotification(
                order_number.as_str().to_string(),
            ))
        }
    }
}

/// Decrement stock for every item of the order, one product at a time.
/// A failing product is logged and skipped.
async fn adjust_stock(
    store: &Arc<dyn OrderStore>,
    order_id: Uuid,
    order_number: &OrderNumber,
) -> (Vec<StockChange>, usize) {
    let items = match store.order_items(order_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(%order_number, error = %e, "could not load order items, stock not adjusted");
            log_error_detached(
                Arc::clone(store),
                NewErrorLog::new(
                    "stock_update",
                    e.to_string(),
                    serde_json::json!({ "order_id": order_id }),
                    Some(order_number),
                ),
            );
            return (Vec::new(), 1);
        }
    };

    if items.is_empty() {
        tracing::info!(%order_number, "order has no items, nothing to adjust");
    }

    let mut changes = Vec::with_capacity(items.len());
    let mut failures = 0;
    for item in items {
        match store.decrement_stock(item.product_id, item.quantity).await {
            Ok(change) => {
                tracing::info!(
                    product_id = %change.product_id,
                    before = change.before,
                    after = change.after,
                    "stock updated"
                );
                changes.push(change);
            }
            Err(e) => {
                failures += 1;
                tracing::error!(
                    %order_number,
                    product_id = %item.product_id,
                    error = %e,
                    "stock update failed, skipping product"
                );
            }
        }
    }
    (changes, failures)
}

fn record_failure(
    store: &Arc<dyn OrderStore>,
    source: &str,
    error: &PipelineError,
    notification: &PaymentNotification,
) {
    tracing::error!(
        order_number = %notification.order_number,
        source,
        error = %error,
        "reconciliation failed, provider will retry"
    );
    log_error_detached(
        Arc::clone(store),
        NewErrorLog::new(
            source,
            error.to_string(),
            serde_json::json!({ "notification": notification.raw }),
            Some(&notification.order_number),
        ),
    );
}
