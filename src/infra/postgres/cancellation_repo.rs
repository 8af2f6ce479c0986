use {
    super::order_repo,
    crate::domain::{
        cancellation::{NewCancellation, NewRefundRequest},
        error::PipelineError,
    },
    sqlx::PgPool,
};

/// Cancel the order and log the cancellation together. Returns `false`
/// without writing anything when the order left `expected_status` in the
/// meantime.
pub async fn cancel_order(
    pool: &PgPool,
    cancellation: &NewCancellation,
) -> Result<bool, PipelineError> {
    let mut tx = pool.begin().await?;

    if !order_repo::cancel_if_status(&mut tx, cancellation.order_id, cancellation.expected_status)
        .await?
    {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO cancellations (id, order_id, user_id, reason, refund_required, status)
        VALUES ($1, $2, $3, $4, $5, 'requested')
        "#,
    )
    .bind(cancellation.id)
    .bind(cancellation.order_id)
    .bind(cancellation.user_id)
    .bind(&cancellation.reason)
    .bind(cancellation.refund_required)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn insert_refund_request(
    pool: &PgPool,
    request: &NewRefundRequest,
) -> Result<(), PipelineError> {
    sqlx::query(
        r#"
        INSERT INTO refund_requests (id, order_id, amount, provider, status, response)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(request.id)
    .bind(request.order_id)
    .bind(request.amount.value())
    .bind(&request.provider)
    .bind(request.status.as_str())
    .bind(&request.response)
    .execute(pool)
    .await?;
    Ok(())
}
