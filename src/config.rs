use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub static_dir: PathBuf,
    pub qr_size: u32,
    pub log_level: String,
    pub oauth: OAuthConfig,
    pub mail: MailConfig,
}

/// Credentials for the OAuth2 client that owns the sending mailbox.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let oauth = OAuthConfig {
            client_id: env_required("CLIENT_ID")?,
            client_secret: env_required("CLIENT_SECRET")?,
            redirect_uri: env_required("REDIRECT_URI")?,
            refresh_token: env_required("REFRESH_TOKEN")?,
            token_url: env_or("QRPASS_TOKEN_URL", "https://oauth2.googleapis.com/token"),
        };

        let from = env_required("QRPASS_MAIL_FROM")?;

        let host: IpAddr = env_or("QRPASS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_HOST: {e}"))?;

        let port: u16 = env_or("QRPASS_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_PORT: {e}"))?;

        let smtp_port: u16 = env_or("QRPASS_SMTP_PORT", "465")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_SMTP_PORT: {e}"))?;

        let timeout_secs: u64 = env_or("QRPASS_MAIL_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_MAIL_TIMEOUT_SECS: {e}"))?;

        let mail = MailConfig {
            smtp_host: env_or("QRPASS_SMTP_HOST", "smtp.gmail.com"),
            smtp_port,
            from,
            timeout: Duration::from_secs(timeout_secs),
        };

        let db_max_connections: u32 = env_or("QRPASS_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_DB_MAX_CONNECTIONS: {e}"))?;

        // 10 MiB, same ceiling the registration form has always had
        let max_body_size: usize = env_or("QRPASS_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_MAX_BODY_SIZE: {e}"))?;

        let qr_size: u32 = env_or("QRPASS_QR_SIZE", "256")
            .parse()
            .map_err(|e| format!("Invalid QRPASS_QR_SIZE: {e}"))?;

        let static_dir = PathBuf::from(env_or("QRPASS_STATIC_DIR", "static"));
        let log_level = env_or("QRPASS_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            static_dir,
            qr_size,
            log_level,
            oauth,
            mail,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
