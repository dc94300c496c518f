//! Environment-driven configuration.

use std::time::Duration;

use mercado_mail::SmtpConfig;

use crate::error::AppError;

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Kafka bootstrap brokers, comma-separated.
    pub kafka_brokers: String,
    /// Kafka client id.
    pub kafka_client_id: String,
    /// SMTP settings.
    pub smtp: SmtpConfig,
    /// Outbox sweep cadence.
    pub sweep_interval: Duration,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

impl Config {
    /// Reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// `AppError::Config` when `DATABASE_URL` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let smtp_port: u16 = env_or("SMTP_PORT", "587")
            .parse()
            .map_err(|e| AppError::Config(format!("SMTP_PORT must be a valid u16: {e}")))?;
        let sweep_seconds: u64 = env_or("OUTBOX_SWEEP_SECONDS", "30")
            .parse()
            .map_err(|e| AppError::Config(format!("OUTBOX_SWEEP_SECONDS must be a number: {e}")))?;

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            database_url,
            kafka_brokers: env_or("KAFKA_BROKERS", "localhost:9092"),
            kafka_client_id: env_or("KAFKA_CLIENT_ID", "mercado-service"),
            smtp: SmtpConfig {
                host: env_or("SMTP_HOST", "smtp.ethereal.email"),
                port: smtp_port,
                username: env_or("SMTP_USER", ""),
                password: env_or("SMTP_PASS", ""),
                from: env_or("SMTP_FROM", "Mercado <no-reply@mercado.test>"),
            },
            sweep_interval: Duration::from_secs(sweep_seconds),
        })
    }
}
