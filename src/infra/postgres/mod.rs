pub mod cancellation_repo;
pub mod notification_repo;
pub mod order_repo;
pub mod payment_repo;
pub mod product_repo;

use {
    crate::domain::{
        cancellation::{NewCancellation, NewRefundRequest},
        id::OrderNumber,
        notification::{NewErrorLog, NewNotification},
        order::{Order, OrderItem},
        payment::{AppliedPayment, NewPaymentRecord, StockChange},
        store::{OrderStore, StoreFuture},
    },
    sqlx::PgPool,
    uuid::Uuid,
};

/// `OrderStore` backed by the marketplace Postgres database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for PgStore {
    fn find_order(&self, order_number: &OrderNumber) -> StoreFuture<'_, Option<Order>> {
        let order_number = order_number.clone();
        Box::pin(async move { order_repo::find_by_number(&self.pool, &order_number).await })
    }

    fn find_order_fuzzy(&self, order_number: &OrderNumber) -> StoreFuture<'_, Option<Order>> {
        let order_number = order_number.clone();
        Box::pin(async move { order_repo::find_by_number_fuzzy(&self.pool, &order_number).await })
    }

    fn apply_payment(
        &self,
        order_id: Uuid,
        record: &NewPaymentRecord,
    ) -> StoreFuture<'_, AppliedPayment> {
        let record = record.clone();
        Box::pin(async move { payment_repo::apply_payment(&self.pool, order_id, &record).await })
    }

    fn order_items(&self, order_id: Uuid) -> StoreFuture<'_, Vec<OrderItem>> {
        Box::pin(order_repo::items_for_order(&self.pool, order_id))
    }

    fn decrement_stock(&self, product_id: Uuid, quantity: i32) -> StoreFuture<'_, StockChange> {
        Box::pin(product_repo::decrement_stock(&self.pool, product_id, quantity))
    }

    fn cancel_order(&self, cancellation: &NewCancellation) -> StoreFuture<'_, bool> {
        let cancellation = cancellation.clone();
        Box::pin(async move { cancellation_repo::cancel_order(&self.pool, &cancellation).await })
    }

    fn insert_refund_request(&self, request: &NewRefundRequest) -> StoreFuture<'_, ()> {
        let request = request.clone();
        Box::pin(async move { cancellation_repo::insert_refund_request(&self.pool, &request).await })
    }

    fn insert_notification(&self, notification: &NewNotification) -> StoreFuture<'_, ()> {
        let notification = notification.clone();
        Box::pin(async move {
            notification_repo::insert_notification(&self.pool, &notification).await
        })
    }

    fn insert_error_log(&self, entry: &NewErrorLog) -> StoreFuture<'_, ()> {
        let entry = entry.clone();
        Box::pin(async move { notification_repo::insert_error_log(&self.pool, &entry).await })
    }
}
