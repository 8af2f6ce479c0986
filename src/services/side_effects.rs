use {
    crate::domain::{
        notification::{NewErrorLog, NewNotification},
        store::OrderStore,
    },
    std::sync::Arc,
    tokio::task::JoinHandle,
};

/// Insert an admin notification on a detached task. Failures are logged
/// and never reach the caller.
pub fn notify_detached(store: Arc<dyn OrderStore>, notification: NewNotification) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.insert_notification(&notification).await {
            tracing::warn!(kind = %notification.kind, error = %e, "admin notification dropped");
        }
    })
}

/// Record a reconciliation failure for the admin team on a detached task.
pub fn log_error_detached(store: Arc<dyn OrderStore>, entry: NewErrorLog) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.insert_error_log(&entry).await {
            tracing::warn!(source = %entry.source, error = %e, "error log dropped");
        }
    })
}
