use anyhow::Context;
use tracing::warn;

const DEFAULT_SECRET_KEY: &str = "change-this-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let secret_key =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        if secret_key == DEFAULT_SECRET_KEY {
            warn!("SECRET_KEY not set; running with the default development secret");
        }
        Ok(Self {
            database_url,
            secret_key,
        })
    }
}
