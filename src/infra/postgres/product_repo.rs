use {
    crate::domain::{error::PipelineError, payment::StockChange},
    sqlx::PgPool,
    uuid::Uuid,
};

/// Atomically lower stock by `quantity`, clamped at zero, and report the
/// before/after values.
pub async fn decrement_stock(
    pool: &PgPool,
    product_id: Uuid,
    quantity: i32,
) -> Result<StockChange, PipelineError> {
    let row: Option<(i32, i32)> = sqlx::query_as(
        r#"
        UPDATE products AS p
        SET stock = GREATEST(COALESCE(old.stock, 0) - $2, 0),
            updated_at = now()
        FROM (SELECT id, stock FROM products WHERE id = $1 FOR UPDATE) AS old
        WHERE p.id = old.id
        RETURNING COALESCE(old.stock, 0), p.stock
        "#,
    )
    .bind(product_id)
    .bind(quantity.max(0))
    .fetch_optional(pool)
    .await?;

    let (before, after) =
        row.ok_or_else(|| PipelineError::NotFound(format!("product {product_id}")))?;
    Ok(StockChange {
        product_id,
        before,
        after,
    })
}
