use {
    crate::domain::{auth::AuthVerifier, error::PipelineError},
    serde::Deserialize,
    std::{future::Future, pin::Pin, time::Duration},
    uuid::Uuid,
};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

/// Validates end-user access tokens against Supabase Auth
/// (`GET /auth/v1/user`).
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Gateway(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn user_id_inner(&self, token: &str) -> Result<Uuid, PipelineError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::NOT_FOUND
        {
            return Err(PipelineError::Unauthorized("Invalid token".into()));
        }
        if !status.is_success() {
            return Err(PipelineError::Gateway(format!("auth answered {status}")));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|_| PipelineError::Unauthorized("Invalid token".into()))?;
        Ok(user.id)
    }
}

impl AuthVerifier for SupabaseAuth {
    fn user_id(
        &self,
        token: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Uuid, PipelineError>> + Send + '_>> {
        let token = token.to_string();
        Box::pin(async move { self.user_id_inner(&token).await })
    }
}
