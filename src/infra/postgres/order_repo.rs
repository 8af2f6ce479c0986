use {
    crate::domain::{
        error::PipelineError,
        id::OrderNumber,
        money::Rupiah,
        order::{Order, OrderItem, OrderStatus},
    },
    chrono::{DateTime, Utc},
    sqlx::PgPool,
    uuid::Uuid,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    user_id: Option<Uuid>,
    status: String,
    total_amount: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = PipelineError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |e: PipelineError| PipelineError::CorruptRow(format!("order {id}: {e}"));
        Ok(Order {
            id,
            order_number: OrderNumber::new(row.order_number).map_err(corrupt)?,
            user_id: row.user_id,
            status: OrderStatus::try_from(row.status.as_str()).map_err(corrupt)?,
            // Legacy rows stored fractional totals; they are rounded on read.
            total_amount: Rupiah::new(row.total_amount.max(0)).map_err(corrupt)?,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, order_number, user_id, status, COALESCE(ROUND(total_amount), 0)::BIGINT AS total_amount";

pub async fn find_by_number(
    pool: &PgPool,
    order_number: &OrderNumber,
) -> Result<Option<Order>, PipelineError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
    ))
    .bind(order_number.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

/// Most recent order whose number contains `order_number`.
pub async fn find_by_number_fuzzy(
    pool: &PgPool,
    order_number: &OrderNumber,
) -> Result<Option<Order>, PipelineError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number ILIKE $1 ORDER BY created_at DESC LIMIT 1"
    ))
    .bind(order_number.contains_pattern())
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

pub struct LockedOrder {
    pub status: OrderStatus,
    pub stock_adjusted_at: Option<DateTime<Utc>>,
}

/// Row-lock the order for the rest of the transaction. Concurrent
/// deliveries for the same order queue up here.
pub async fn lock_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
) -> Result<LockedOrder, PipelineError> {
    let row: Option<(String, Option<DateTime<Utc>>)> =
        sqlx::query_as("SELECT status, stock_adjusted_at FROM orders WHERE id = $1 FOR UPDATE")
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?;

    let (status, stock_adjusted_at) =
        row.ok_or_else(|| PipelineError::NotFound(format!("order {order_id}")))?;
    Ok(LockedOrder {
        status: OrderStatus::try_from(status.as_str())
            .map_err(|e| PipelineError::CorruptRow(format!("order {order_id}: {e}")))?,
        stock_adjusted_at,
    })
}

pub async fn update_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
    status: OrderStatus,
) -> Result<(), PipelineError> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Claim the one-shot stock gate. Returns the claim time for exactly one
/// caller per order, `None` for everyone else.
pub async fn claim_stock_gate(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
) -> Result<Option<DateTime<Utc>>, PipelineError> {
    let claimed_at = sqlx::query_scalar(
        r#"
        UPDATE orders SET stock_adjusted_at = now()
        WHERE id = $1 AND stock_adjusted_at IS NULL
        RETURNING stock_adjusted_at
        "#,
    )
    .bind(order_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(claimed_at)
}

/// Move the order to `cancelled` only if it still has `expected`.
pub async fn cancel_if_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
    expected: OrderStatus,
) -> Result<bool, PipelineError> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = $1, updated_at = now()
        WHERE id = $2 AND lower(status) = $3
        "#,
    )
    .bind(OrderStatus::Cancelled.as_str())
    .bind(order_id)
    .bind(expected.as_str())
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn items_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItem>, PipelineError> {
    let rows: Vec<(Uuid, i32)> =
        sqlx::query_as("SELECT product_id, quantity FROM order_items WHERE order_id = $1 ORDER BY created_at")
            .bind(order_id)
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(product_id, quantity)| OrderItem {
            product_id,
            quantity,
        })
        .collect())
}
