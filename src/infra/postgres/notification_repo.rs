use {
    crate::domain::{
        error::PipelineError,
        notification::{NewErrorLog, NewNotification},
    },
    sqlx::PgPool,
};

pub async fn insert_notification(
    pool: &PgPool,
    notification: &NewNotification,
) -> Result<(), PipelineError> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, type, title, message, meta, audience)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(notification.id)
    .bind(&notification.kind)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.meta)
    .bind(&notification.audience)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_error_log(pool: &PgPool, entry: &NewErrorLog) -> Result<(), PipelineError> {
    sqlx::query(
        r#"
        INSERT INTO error_logs (id, error_source, error_message, error_details, order_number)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(entry.id)
    .bind(&entry.source)
    .bind(&entry.message)
    .bind(&entry.details)
    .bind(entry.order_number.as_deref())
    .execute(pool)
    .await?;
    Ok(())
}
