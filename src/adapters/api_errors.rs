use crate::domain::error::PipelineError;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype so the domain error can become an axum response.
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PipelineError::Validation(_) | PipelineError::NotCancellable(_) => {
                StatusCode::BAD_REQUEST
            }
            PipelineError::WebhookSignature(_) | PipelineError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            PipelineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            PipelineError::Gateway(_) => StatusCode::BAD_GATEWAY,
            PipelineError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
            PipelineError::UnmatchedNotification(_)
            | PipelineError::CorruptRow(_)
            | PipelineError::Database(_)
            | PipelineError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the provider or the end user.
    fn public_message(&self) -> String {
        match &self.0 {
            PipelineError::Validation(msg) => msg.clone(),
            PipelineError::NotCancellable(_) => "Order is not cancellable".to_string(),
            PipelineError::WebhookSignature(_) => "Invalid signature".to_string(),
            PipelineError::Forbidden(_) => "Forbidden".to_string(),
            PipelineError::Unauthorized(msg) => msg.clone(),
            PipelineError::NotFound(_) => "Order not found".to_string(),
            PipelineError::UnmatchedNotification(_) => "Order not found".to_string(),
            PipelineError::PayloadTooLarge => "Request body too large".to_string(),
            PipelineError::Gateway(_) => "Payment provider error".to_string(),
            PipelineError::GatewayTimeout => "Payment provider timed out".to_string(),
            PipelineError::CorruptRow(_)
            | PipelineError::Database(_)
            | PipelineError::Serialization(_) => "Internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self.0);
        }

        let body = serde_json::json!({
            "status": "error",
            "message": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Raw request body whose rejections (oversized, unreadable) are answered
/// with the same JSON error shape as every other failure.
pub struct RawBody(pub Bytes);

impl<S: Send + Sync> FromRequest<S> for RawBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                PipelineError::PayloadTooLarge
            } else {
                PipelineError::Validation(rejection.body_text())
            }
        })?;
        Ok(Self(bytes))
    }
}
