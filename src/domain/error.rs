use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("webhook signature: {0}")]
    WebhookSignature(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not cancellable: {0}")]
    NotCancellable(String),

    #[error("request body too large")]
    PayloadTooLarge,

    /// A stored row holds a value the domain does not accept.
    #[error("corrupt row: {0}")]
    CorruptRow(String),

    /// The provider notified us about an order number we cannot resolve.
    /// Surfaced as a server error so the provider redelivers.
    #[error("unmatched notification for order {0}")]
    UnmatchedNotification(String),

    #[error("payment gateway: {0}")]
    Gateway(String),

    #[error("payment gateway timed out")]
    GatewayTimeout,
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::GatewayTimeout
        } else {
            Self::Gateway(err.to_string())
        }
    }
}
