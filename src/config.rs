use std::env;
use std::path::PathBuf;

/// Environment variable holding the `env_logger` filter.
pub const LOG_ENV: &str = "CHESS_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

const BIND_ENV: &str = "CHESS_BIND_ADDR";
const STATIC_DIR_ENV: &str = "CHESS_STATIC_DIR";

/// Server settings, read from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory served under `/static`; skipped when missing.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            bind_addr: non_empty(BIND_ENV).unwrap_or(defaults.bind_addr),
            static_dir: non_empty(STATIC_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}
