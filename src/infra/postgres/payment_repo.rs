use {
    super::order_repo,
    crate::domain::{
        error::PipelineError,
        order::OrderStatus,
        payment::{AppliedPayment, HistoryWrite, NewPaymentRecord, PaymentStatus, StatusAction},
    },
    sqlx::PgPool,
    uuid::Uuid,
};

/// Insert the history row, or update status and payload in place when
/// this `(order_id, transaction_id)` was seen before.
pub async fn upsert_history(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
    record: &NewPaymentRecord,
) -> Result<HistoryWrite, PipelineError> {
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO payment_history
            (id, order_id, transaction_id, payment_method, amount, status, payment_details)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (order_id, transaction_id) DO UPDATE
        SET status = EXCLUDED.status,
            payment_details = EXCLUDED.payment_details,
            updated_at = now()
        RETURNING (xmax = 0) AS inserted
        "#,
    )
    .bind(record.id)
    .bind(order_id)
    .bind(record.transaction_id.as_str())
    .bind(&record.payment_method)
    .bind(record.amount.value())
    .bind(record.status.as_str())
    .bind(&record.payment_details)
    .fetch_one(&mut **tx)
    .await?;

    Ok(if inserted {
        HistoryWrite::Inserted
    } else {
        HistoryWrite::Updated
    })
}

/// Apply one notification to one order in a single transaction: lock the
/// order, move its status if the transition is allowed, upsert history,
/// and claim the stock gate when the order becomes successful.
pub async fn apply_payment(
    pool: &PgPool,
    order_id: Uuid,
    record: &NewPaymentRecord,
) -> Result<AppliedPayment, PipelineError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET LOCAL lock_timeout = '5s'")
        .execute(&mut *tx)
        .await?;

    let locked = order_repo::lock_for_update(&mut tx, order_id).await?;
    let action = locked.status.decide(record.status);

    let current = match action {
        StatusAction::Advance => {
            let next = OrderStatus::from(record.status);
            order_repo::update_status(&mut tx, order_id, next).await?;
            next
        }
        StatusAction::Unchanged | StatusAction::Anomaly => locked.status,
    };

    let history = upsert_history(&mut tx, order_id, record).await?;

    let claimed_at = if action == StatusAction::Advance
        && record.status == PaymentStatus::Success
        && locked.stock_adjusted_at.is_none()
    {
        order_repo::claim_stock_gate(&mut tx, order_id).await?
    } else {
        None
    };

    tx.commit().await?;

    Ok(AppliedPayment {
        order_id,
        previous: locked.status,
        current,
        action,
        history,
        stock_claimed: claimed_at.is_some(),
        stock_adjusted_at: claimed_at.or(locked.stock_adjusted_at),
    })
}
