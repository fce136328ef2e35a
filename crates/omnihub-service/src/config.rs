//! Service configuration.

use omnihub_core::CostTable;
use omnihub_tools::{EyeconAuth, ToolsConfig};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the `RocksDB` data directory (default: "/data/omnihub").
    pub data_dir: String,

    /// HS256 secret for signing session tokens.
    pub jwt_secret: String,

    /// Session token lifetime in minutes (default: 1440).
    pub token_expiry_minutes: i64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Whole-request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Upper bound on one external adapter call, in seconds. An elapsed
    /// timeout is treated as an adapter failure.
    pub adapter_timeout_seconds: u64,

    /// Bootstrap admin email.
    pub admin_email: String,

    /// Bootstrap admin password.
    pub admin_password: String,

    /// Credits granted to the bootstrap admin on first boot.
    pub admin_bootstrap_credits: i64,

    /// Per-tool credit costs.
    pub costs: CostTable,

    /// Tool adapter endpoints and credentials.
    pub tools: ToolsConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = ToolsConfig::default();
        let tools = ToolsConfig {
            phone_base_url: env_or("PHONE_API_URL", &defaults.phone_base_url),
            eyecon_base_url: env_or("EYECON_API_URL", &defaults.eyecon_base_url),
            eyecon_auth: load_eyecon_auth(),
            tempmail_base_url: env_or("TEMPMAIL_API_URL", &defaults.tempmail_base_url),
            oembed_base_url: env_or("OEMBED_API_URL", &defaults.oembed_base_url),
        };

        Self {
            listen_addr: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
            data_dir: env_or("DATA_DIR", "/data/omnihub"),
            jwt_secret: env_or("JWT_SECRET", "omnihub_secret_key"),
            token_expiry_minutes: env_parsed("ACCESS_TOKEN_EXPIRE_MINUTES", 1440),
            cors_origins: env_or("CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parsed("MAX_BODY_BYTES", 1024 * 1024),
            request_timeout_seconds: env_parsed("REQUEST_TIMEOUT_SECONDS", 60),
            adapter_timeout_seconds: env_parsed("ADAPTER_TIMEOUT_SECONDS", 30),
            admin_email: env_or("ADMIN_EMAIL", "admin@omnihub.com"),
            admin_password: env_or("ADMIN_PASSWORD", "Admin@123"),
            admin_bootstrap_credits: env_parsed("ADMIN_BOOTSTRAP_CREDITS", 999_999),
            costs: CostTable::default(),
            tools,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Read the Eyecon auth header set from the environment. All four values must
/// be present and real for the headers to be sent at all.
fn load_eyecon_auth() -> Option<EyeconAuth> {
    let read = |key: &str| {
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty() && v != "REPLACE_ME")
    };

    Some(EyeconAuth {
        auth_v: read("EYECON_E_AUTH_V")?,
        auth: read("EYECON_E_AUTH")?,
        auth_c: read("EYECON_E_AUTH_C")?,
        auth_k: read("EYECON_E_AUTH_K")?,
    })
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/omnihub".into(),
            jwt_secret: "omnihub_secret_key".into(),
            token_expiry_minutes: 1440,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 60,
            adapter_timeout_seconds: 30,
            admin_email: "admin@omnihub.com".into(),
            admin_password: "Admin@123".into(),
            admin_bootstrap_credits: 999_999,
            costs: CostTable::default(),
            tools: ToolsConfig::default(),
        }
    }
}
