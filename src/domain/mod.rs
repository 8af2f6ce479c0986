pub mod auth;
pub mod cancellation;
pub mod error;
pub mod id;
pub mod money;
pub mod notification;
pub mod order;
pub mod payment;
pub mod provider;
pub mod store;
