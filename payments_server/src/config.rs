use std::{
    env::{self, VarError},
    path::PathBuf,
    str::FromStr,
};

use actix_web::http::{Method, Uri};
use log::*;

const DEFAULT_PAYMENTS_HOST: &str = "127.0.0.1";
const DEFAULT_PAYMENTS_PORT: u16 = 8556;
const DEFAULT_DATABASE_URL: &str = "sqlite://payments.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIRROR_PATH: &str = "payments.json";
const DEFAULT_CORS_ORIGINS: &str = "*";
const DEFAULT_CORS_METHODS: &str = "GET,POST,PUT,DELETE";
const DEFAULT_BROADCAST_CAPACITY: usize = 256;

/// Every environment variable the server reads.
pub const ENV_VARS: [&str; 9] = [
    "RUST_LOG",
    "PAYMENTS_HOST",
    "PAYMENTS_PORT",
    "PAYMENTS_DATABASE_URL",
    "PAYMENTS_DB_MAX_CONNECTIONS",
    "PAYMENTS_MIRROR_PATH",
    "PAYMENTS_CORS_ORIGINS",
    "PAYMENTS_CORS_METHODS",
    "PAYMENTS_BROADCAST_CAPACITY",
];

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Where the JSON mirror of the payments table is written. `None` disables the mirror.
    pub mirror_path: Option<PathBuf>,
    pub cors: CorsConfig,
    /// The number of events buffered for each push subscriber. A subscriber that falls further behind than this will
    /// miss events until the next full-set update.
    pub broadcast_capacity: usize,
}

#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Allowed origins. A single `*` entry allows any origin.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PAYMENTS_HOST.to_string(),
            port: DEFAULT_PAYMENTS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            mirror_path: Some(PathBuf::from(DEFAULT_MIRROR_PATH)),
            cors: CorsConfig::default(),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: parse_list(DEFAULT_CORS_ORIGINS), allowed_methods: parse_list(DEFAULT_CORS_METHODS) }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PAYMENTS_HOST").ok().unwrap_or_else(|| DEFAULT_PAYMENTS_HOST.into());
        let port = parse_env_or_default("PAYMENTS_PORT", DEFAULT_PAYMENTS_PORT);
        let database_url = env::var("PAYMENTS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ PAYMENTS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let db_max_connections = parse_env_or_default("PAYMENTS_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let mirror_path = parse_mirror_path(
            env::var("PAYMENTS_MIRROR_PATH").ok().unwrap_or_else(|| DEFAULT_MIRROR_PATH.into()).as_str(),
        );
        if mirror_path.is_none() {
            info!(
                "🪛️ The JSON mirror is disabled. If this is not what you want, set PAYMENTS_MIRROR_PATH to the file the \
                 mirror should be written to."
            );
        }
        let allowed_origins = parse_origins(
            env::var("PAYMENTS_CORS_ORIGINS").ok().unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()).as_str(),
        );
        let allowed_methods = parse_methods(
            env::var("PAYMENTS_CORS_METHODS").ok().unwrap_or_else(|| DEFAULT_CORS_METHODS.into()).as_str(),
        );
        let cors = if allowed_origins.is_empty() || allowed_methods.is_empty() {
            warn!("🪛️ The CORS configuration is empty. Reverting to the default configuration.");
            CorsConfig::default()
        } else {
            CorsConfig { allowed_origins, allowed_methods }
        };
        let broadcast_capacity = parse_env_or_default("PAYMENTS_BROADCAST_CAPACITY", DEFAULT_BROADCAST_CAPACITY);
        Self { host, port, database_url, db_max_connections, mirror_path, cors, broadcast_capacity }
    }
}

fn parse_env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma-separated list, trimming whitespace and dropping empty entries.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Parses a comma-separated list of HTTP methods, dropping (and logging) anything that is not a valid method.
pub fn parse_methods(s: &str) -> Vec<String> {
    parse_list(s)
        .into_iter()
        .map(|m| m.to_uppercase())
        .filter(|m| match Method::from_str(m) {
            Ok(_) => true,
            Err(e) => {
                warn!("🪛️ Ignoring invalid HTTP method ({m}) in PAYMENTS_CORS_METHODS: {e}");
                false
            },
        })
        .collect()
}

/// Parses a comma-separated list of origins. Each entry must be `*` or a `scheme://host[:port]` URI. Anything else is
/// logged and dropped.
pub fn parse_origins(s: &str) -> Vec<String> {
    parse_list(s)
        .into_iter()
        .filter(|o| {
            if o == "*" {
                return true;
            }
            match Uri::from_str(o) {
                Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => true,
                Ok(_) => {
                    warn!("🪛️ Ignoring origin ({o}) in PAYMENTS_CORS_ORIGINS. It needs a scheme and a host");
                    false
                },
                Err(e) => {
                    warn!("🪛️ Ignoring invalid origin ({o}) in PAYMENTS_CORS_ORIGINS: {e}");
                    false
                },
            }
        })
        .collect()
}

/// The current value of each of [`ENV_VARS`], for the help text.
pub fn env_values() -> Vec<(&'static str, String)> {
    ENV_VARS
        .iter()
        .map(|&name| {
            let val = match env::var(name) {
                Ok(s) => s,
                Err(VarError::NotPresent) => "Not set".into(),
                Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
            };
            (name, val)
        })
        .collect()
}

/// `none`, `false`, `0` or an empty value disable the mirror.
pub fn parse_mirror_path(s: &str) -> Option<PathBuf> {
    let s = s.trim();
    if s.is_empty() || ["none", "false", "0"].contains(&s.to_lowercase().as_str()) {
        None
    } else {
        Some(PathBuf::from(s))
    }
}
