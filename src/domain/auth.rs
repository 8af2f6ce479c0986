use {
    super::error::PipelineError,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

/// Resolves an end-user bearer token to the user it belongs to.
pub trait AuthVerifier: Send + Sync {
    fn user_id(
        &self,
        token: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Uuid, PipelineError>> + Send + '_>>;
}
