use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub upload_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub static_dir: String,
    /// Raw JWT secret. `None` disables authentication.
    pub secret_key: Option<String>,
    pub token_ttl: Duration,
    pub bootstrap_email: Option<String>,
    pub bootstrap_password_hash: Option<String>,
    pub fixed_expense_interval: Duration,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid {name}: '{value}' is not a valid number")),
        None => Ok(default),
    }
}

fn env_number<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_number(name, std::env::var(name).ok(), default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("SEPTIC_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid SEPTIC_LISTEN_ADDR")?;
        let cors_allow = env_or("SEPTIC_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_number("SEPTIC_REQUEST_TIMEOUT_MS", 30_000)?;
        let ttl_minutes: u64 = env_number("SEPTIC_TOKEN_TTL_MINUTES", 720)?;
        let interval_secs: u64 = env_number("SEPTIC_FIXED_EXPENSE_INTERVAL_SECS", 3600)?;
        let max_upload_bytes: usize = env_number("SEPTIC_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        Ok(Self {
            listen_addr,
            db_path: env_or("SEPTIC_DB_PATH", "./db/app.db"),
            upload_dir: env_or("SEPTIC_UPLOAD_DIR", "./uploads"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            max_upload_bytes,
            static_dir: env_or("SEPTIC_STATIC_DIR", "dist"),
            secret_key: env_opt("SEPTIC_SECRET_KEY"),
            token_ttl: Duration::from_secs(ttl_minutes * 60),
            bootstrap_email: env_opt("SEPTIC_BOOTSTRAP_EMAIL"),
            bootstrap_password_hash: env_opt("SEPTIC_BOOTSTRAP_PASSWORD_HASH"),
            fixed_expense_interval: Duration::from_secs(interval_secs.max(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_fall_back_only_when_unset() {
        assert_eq!(parse_number::<u64>("N", None, 30).unwrap(), 30);
        assert_eq!(parse_number::<u64>("N", Some("  ".into()), 30).unwrap(), 30);
        assert_eq!(parse_number::<u64>("N", Some(" 45 ".into()), 30).unwrap(), 45);
    }

    #[test]
    fn malformed_numbers_name_the_variable() {
        let err = parse_number::<u64>("SEPTIC_TOKEN_TTL_MINUTES", Some("12h".into()), 720)
            .unwrap_err();
        assert!(err.to_string().contains("SEPTIC_TOKEN_TTL_MINUTES"));
        assert!(err.to_string().contains("'12h'"));
    }
}
