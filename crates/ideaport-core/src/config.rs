//! Configuration module
//!
//! Application configuration loaded from the environment, covering the
//! server, database, object storage, virus scanning, task queue, retention
//! sweep, and SMTP notification settings.

use std::env;

// Common defaults
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_DOCUMENT_SIZE_MB: usize = 10;
const DOCUMENT_RETENTION_DAYS: i64 = 30;
const RETENTION_SWEEP_INTERVAL_SECS: u64 = 86_400;
const TASK_QUEUE_MAX_WORKERS: usize = 4;
const TASK_QUEUE_POLL_INTERVAL_MS: u64 = 1000;
const TASK_QUEUE_DEFAULT_TIMEOUT_SECS: i32 = 300;
const TASK_QUEUE_MAX_RETRIES: i32 = 3;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    // Storage configuration (S3-compatible)
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    // Document upload configuration
    pub max_document_size_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    // ClamAV configuration
    pub clamav_host: String,
    pub clamav_port: u16,
    pub clamav_timeout_secs: u64,
    // Task queue configuration
    pub task_queue_max_workers: usize,
    pub task_queue_poll_interval_ms: u64,
    pub task_queue_default_timeout_seconds: i32,
    pub task_queue_max_retries: i32,
    // Retention sweep configuration
    pub document_retention_days: i64,
    pub retention_sweep_interval_secs: u64,
    // Email notifications (optional; disabled when SMTP_HOST is unset)
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_document_size_mb = env::var("MAX_DOCUMENT_SIZE_MB")
            .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_DOCUMENT_SIZE_MB);

        let document_allowed_extensions = env::var("DOCUMENT_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "pdf,doc,docx,xls,xlsx,ppt,pptx,txt,jpg,jpeg,png".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            s3_bucket: env::var("S3_BUCKET")
                .map_err(|_| anyhow::anyhow!("S3_BUCKET must be set"))?,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .map_err(|_| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?,
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            max_document_size_bytes: max_document_size_mb * 1024 * 1024,
            document_allowed_extensions,
            clamav_host: env::var("CLAMAV_HOST").unwrap_or_else(|_| "localhost".to_string()),
            clamav_port: env::var("CLAMAV_PORT")
                .unwrap_or_else(|_| "3310".to_string())
                .parse()
                .unwrap_or(3310),
            clamav_timeout_secs: env::var("CLAMAV_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            task_queue_max_workers: env::var("TASK_QUEUE_MAX_WORKERS")
                .unwrap_or_else(|_| TASK_QUEUE_MAX_WORKERS.to_string())
                .parse()
                .unwrap_or(TASK_QUEUE_MAX_WORKERS),
            task_queue_poll_interval_ms: env::var("TASK_QUEUE_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| TASK_QUEUE_POLL_INTERVAL_MS.to_string())
                .parse()
                .unwrap_or(TASK_QUEUE_POLL_INTERVAL_MS),
            task_queue_default_timeout_seconds: env::var("TASK_QUEUE_DEFAULT_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| TASK_QUEUE_DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(TASK_QUEUE_DEFAULT_TIMEOUT_SECS),
            task_queue_max_retries: env::var("TASK_QUEUE_MAX_RETRIES")
                .unwrap_or_else(|_| TASK_QUEUE_MAX_RETRIES.to_string())
                .parse()
                .unwrap_or(TASK_QUEUE_MAX_RETRIES),
            document_retention_days: env::var("DOCUMENT_RETENTION_DAYS")
                .unwrap_or_else(|_| DOCUMENT_RETENTION_DAYS.to_string())
                .parse()
                .unwrap_or(DOCUMENT_RETENTION_DAYS),
            retention_sweep_interval_secs: env::var("RETENTION_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| RETENTION_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(RETENTION_SWEEP_INTERVAL_SECS),
            smtp_host: env::var("SMTP_HOST").ok().filter(|s| !s.is_empty()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0),
            smtp_user: env::var("SMTP_USER").ok().filter(|s| !s.is_empty()),
            smtp_password: env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty()),
            smtp_from: env::var("SMTP_FROM").ok().filter(|s| !s.is_empty()),
            smtp_tls: env::var("SMTP_TLS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be greater than 0"));
        }

        if self.document_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "DOCUMENT_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.document_retention_days <= 0 {
            return Err(anyhow::anyhow!(
                "DOCUMENT_RETENTION_DAYS must be greater than 0"
            ));
        }

        if self.smtp_host.is_some() && self.smtp_from.is_none() {
            return Err(anyhow::anyhow!("SMTP_HOST requires SMTP_FROM to be set"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/ideaport".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_expiry_hours: 24,
            s3_bucket: "ideaport-test".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            max_document_size_bytes: 10 * 1024 * 1024,
            document_allowed_extensions: vec!["pdf".to_string(), "txt".to_string()],
            clamav_host: "localhost".to_string(),
            clamav_port: 3310,
            clamav_timeout_secs: 30,
            task_queue_max_workers: 4,
            task_queue_poll_interval_ms: 1000,
            task_queue_default_timeout_seconds: 300,
            task_queue_max_retries: 3,
            document_retention_days: 30,
            retention_sweep_interval_secs: 86_400,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn short_jwt_secret_rejected() {
        let mut config = test_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_postgres_database_url_rejected() {
        let mut config = test_config();
        config.database_url = "mysql://localhost/ideaport".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn smtp_host_without_from_rejected() {
        let mut config = test_config();
        config.smtp_host = Some("smtp.example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retention_rejected() {
        let mut config = test_config();
        config.document_retention_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn is_production_matches_environment() {
        let mut config = test_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
