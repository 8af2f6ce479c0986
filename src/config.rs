use {
    serde::Serialize,
    std::{env, net::SocketAddr, time::Duration},
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub server_key: String,
    pub client_key: Option<String>,
    pub merchant_id: Option<String>,
    pub is_production: bool,
    /// Upper bound for every outbound Midtrans call.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub run_migrations: bool,
    /// Storefront origin used for Snap callbacks when the client sends none.
    pub frontend_origin: String,
    pub midtrans: MidtransConfig,
    pub supabase: SupabaseConfig,
}

/// Values the storefront needs to load Snap; never includes the server key.
#[derive(Debug, Clone, Serialize)]
pub struct PublicMidtransConfig {
    pub client_key: Option<String>,
    pub merchant_id: Option<String>,
    pub is_production: bool,
    pub snap_js_url: String,
}

impl Config {
    /// Read configuration from the process environment, after loading a
    /// `.env` file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let supabase_key = get("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| get("SUPABASE_KEY"))
            .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 20)?,
            bind_addr: parse_or(
                get("BIND_ADDR"),
                "BIND_ADDR",
                SocketAddr::from(([0, 0, 0, 0], 3000)),
            )?,
            request_timeout: Duration::from_secs(parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                30,
            )?),
            run_migrations: parse_flag(get("RUN_MIGRATIONS")),
            frontend_origin: get("FRONTEND_ORIGIN")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            midtrans: MidtransConfig {
                server_key: required("MIDTRANS_SERVER_KEY")?,
                client_key: get("MIDTRANS_CLIENT_KEY"),
                merchant_id: get("MIDTRANS_MERCHANT_ID"),
                is_production: parse_flag(get("MIDTRANS_IS_PRODUCTION")),
                timeout: Duration::from_secs(parse_or(
                    get("MIDTRANS_TIMEOUT_SECS"),
                    "MIDTRANS_TIMEOUT_SECS",
                    10,
                )?),
            },
            supabase: SupabaseConfig {
                url: required("SUPABASE_URL")?,
                service_key: supabase_key,
            },
        })
    }
}

impl MidtransConfig {
    pub fn public(&self) -> PublicMidtransConfig {
        let snap_host = crate::adapters::midtrans::client::snap_base(self.is_production);
        PublicMidtransConfig {
            client_key: self.client_key.clone(),
            merchant_id: self.merchant_id.clone(),
            is_production: self.is_production,
            snap_js_url: format!("{snap_host}/snap/snap.js"),
        }
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    raw.is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}
