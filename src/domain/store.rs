use {
    super::cancellation::{NewCancellation, NewRefundRequest},
    super::error::PipelineError,
    super::id::OrderNumber,
    super::notification::{NewErrorLog, NewNotification},
    super::order::{Order, OrderItem},
    super::payment::{AppliedPayment, NewPaymentRecord, StockChange},
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PipelineError>> + Send + 'a>>;

/// Everything the reconciler and the cancellation flow need from the
/// marketplace database.
pub trait OrderStore: Send + Sync {
    fn find_order(&self, order_number: &OrderNumber) -> StoreFuture<'_, Option<Order>>;

    /// Substring lookup used when the provider's reference does not match
    /// any order number exactly.
    fn find_order_fuzzy(&self, order_number: &OrderNumber) -> StoreFuture<'_, Option<Order>>;

    /// Atomically apply a notification to one order: status transition,
    /// payment-history upsert on `(order_id, transaction_id)`, and the
    /// one-shot stock gate when the order becomes successful.
    fn apply_payment(
        &self,
        order_id: Uuid,
        record: &NewPaymentRecord,
    ) -> StoreFuture<'_, AppliedPayment>;

    fn order_items(&self, order_id: Uuid) -> StoreFuture<'_, Vec<OrderItem>>;

    /// Remove `quantity` from a product's stock, never below zero.
    fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> StoreFuture<'_, StockChange>;

    /// Cancel the order if it still has `expected_status` and log the
    /// cancellation, in one transaction. Returns `false` when the status
    /// changed underneath us.
    fn cancel_order(&self, cancellation: &NewCancellation) -> StoreFuture<'_, bool>;

    fn insert_refund_request(&self, request: &NewRefundRequest) -> StoreFuture<'_, ()>;

    fn insert_notification(&self, notification: &NewNotification) -> StoreFuture<'_, ()>;

    fn insert_error_log(&self, entry: &NewErrorLog) -> StoreFuture<'_, ()>;
}
