pub mod client;
pub mod notification;
pub mod signature;
pub mod webhook;
