//! Console configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("LISTEN_ADDR is invalid: {0}")]
    ListenAddr(#[from] std::net::AddrParseError),

    /// `BACKEND_URL` is not an absolute URL.
    #[error("BACKEND_URL is invalid: {0}")]
    BackendUrl(String),
}

/// Top-level console configuration.
///
/// Loaded once at startup via [`ConsoleConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Base URL of the scheduling API.
    pub backend_url: Url,

    /// Per-request timeout for scheduling API calls.
    pub backend_timeout: Duration,

    /// Directory holding per-profile selection records.
    pub storage_dir: PathBuf,

    /// Lifetime of an operator session.
    pub session_ttl: chrono::Duration,

    /// Name of the session cookie.
    pub session_cookie: String,

    /// Name of the client-profile cookie.
    pub profile_cookie: String,

    /// Whether cookies carry the `Secure` attribute.
    pub cookie_secure: bool,

    /// Public origin used to build share links.
    pub public_base_url: String,

    /// Capacity of the selection EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Maximum number of client profiles kept in memory.
    pub profile_cache_capacity: usize,

    /// Idle time after which a cached profile is evicted.
    pub profile_idle_ttl: chrono::Duration,

    /// Log output format.
    pub log_format: LogFormat,
}

impl ConsoleConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` or `BACKEND_URL` is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let backend_url = parse_backend_url(
            &std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
        )?;
        let backend_timeout = Duration::from_secs(parse_env("BACKEND_TIMEOUT_SECS", 15));

        let storage_dir = std::env::var("STORAGE_DIR")
            .map_or_else(|_| PathBuf::from("./data/profiles"), PathBuf::from);

        let session_ttl = chrono::Duration::seconds(parse_env("SESSION_TTL_SECS", 43_200));
        let session_cookie =
            std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "rota_session".to_string());
        let profile_cookie =
            std::env::var("PROFILE_COOKIE").unwrap_or_else(|_| "rota_profile".to_string());
        let cookie_secure = parse_env_bool("COOKIE_SECURE", false);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1_024);
        let profile_cache_capacity = parse_env("PROFILE_CACHE_CAPACITY", 10_000);
        let profile_idle_ttl = chrono::Duration::seconds(parse_env("PROFILE_IDLE_SECS", 3_600));

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            backend_url,
            backend_timeout,
            storage_dir,
            session_ttl,
            session_cookie,
            profile_cookie,
            cookie_secure,
            public_base_url,
            event_bus_capacity,
            profile_cache_capacity,
            profile_idle_ttl,
            log_format,
        })
    }
}

/// Parses the scheduling API base URL. Only `http` and `https` are allowed.
fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::BackendUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::BackendUrl(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }
    Ok(url)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
