use serde::Deserialize;
use std::time::Duration;

/// Immutable application configuration, loaded once at startup and handed
/// to the store and the submission service at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Business messaging recipient (country code + area code + number, digits only).
    pub contact_number: String,
    /// Name quoted in the outreach message.
    pub business_name: String,
    pub db_max_connections: u32,
    /// Bounded wait for a connection or a write lock before failing.
    pub db_busy_timeout_secs: u64,
    /// Milliseconds to regain one request of the per-IP quota.
    pub rate_limit_replenish_ms: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("DB_URL"))
            .unwrap_or_else(|_| "sqlite://leads.db".to_string());
        let business_name =
            std::env::var("BUSINESS_NAME").unwrap_or_else(|_| "Help Bank".to_string());
        if business_name.trim().is_empty() {
            anyhow::bail!("BUSINESS_NAME cannot be empty");
        }

        let config = Self {
            database_url: validate_database_url(database_url)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            contact_number: std::env::var("CONTACT_NUMBER")
                .or_else(|_| std::env::var("WHATSAPP_NUMBER"))
                .map_err(|_| {
                    anyhow::anyhow!("CONTACT_NUMBER or WHATSAPP_NUMBER environment variable required")
                })
                .and_then(validate_contact_number)?,
            business_name,
            db_max_connections: positive_var("DB_MAX_CONNECTIONS", 5)?,
            db_busy_timeout_secs: positive_var("DB_BUSY_TIMEOUT_SECS", 10)?,
            rate_limit_replenish_ms: positive_var("RATE_LIMIT_REPLENISH_MS", 100)?,
            rate_limit_burst: positive_var("RATE_LIMIT_BURST", 20)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database URL: {}", config.database_url);
        tracing::debug!("Contact number: {}", config.contact_number);
        tracing::debug!(
            "DB pool: {} connections, {}s busy timeout",
            config.db_max_connections,
            config.db_busy_timeout_secs
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.db_busy_timeout_secs)
    }
}

fn validate_database_url(url: String) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("DATABASE_URL cannot be empty");
    }
    if !url.starts_with("sqlite:") {
        anyhow::bail!("DATABASE_URL must start with sqlite:");
    }
    Ok(url)
}

fn validate_contact_number(number: String) -> anyhow::Result<String> {
    let number = number.trim().to_string();
    if number.is_empty() {
        anyhow::bail!("CONTACT_NUMBER cannot be empty");
    }
    if !number.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("CONTACT_NUMBER must contain digits only (e.g. 5581999999999)");
    }
    Ok(number)
}

fn positive_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    let value = match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a positive integer", name))?,
        Err(_) => default,
    };
    if value < T::from(1) {
        anyhow::bail!("{} must be at least 1", name);
    }
    Ok(value)
}
