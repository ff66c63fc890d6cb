//! # Controller Configuration
//!
//! Controller-level configuration loaded from environment variables.
//!
//! All configuration has defaults and can be overridden via environment
//! variables, typically populated from a ConfigMap with `envFrom`.

mod controller;
mod duration;
mod server;

pub use controller::{ControllerConfig, ProbeMode};
pub use duration::parse_kubernetes_duration;
pub use server::ServerConfig;

/// Load configuration from environment variables with defaults
pub fn load_config() -> (ControllerConfig, ServerConfig) {
    (ControllerConfig::from_env(), ServerConfig::from_env())
}

/// Read a variable through `lookup` or return the default value
fn var_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{}' for {}, using default", raw, key);
            default
        }),
    }
}
