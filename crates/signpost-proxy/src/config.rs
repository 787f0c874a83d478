//! Application configuration loaded from environment variables.

use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Postgres connection URL.
    pub database_url: String,

    /// Upper bound on each resolver store lookup. A lookup that exceeds it
    /// is treated as not-found, never retried.
    pub resolve_timeout: Duration,

    /// Port for the Prometheus /metrics server. Disabled when unset.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `PROXY_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `DATABASE_URL`: Postgres URL (default: "postgres://localhost:5432/signpost")
    /// - `PROXY_RESOLVE_TIMEOUT_MS`: Resolver lookup bound in ms (default: 1500)
    /// - `PROXY_METRICS_PORT`: Prometheus exporter port (default: disabled)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("PROXY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/signpost".to_string());

        let resolve_timeout_ms: u64 = std::env::var("PROXY_RESOLVE_TIMEOUT_MS")
            .unwrap_or_else(|_| "1500".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PROXY_RESOLVE_TIMEOUT_MS: {e}"))?;

        let metrics_port = match std::env::var("PROXY_METRICS_PORT") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid PROXY_METRICS_PORT: {e}"))?,
            ),
            _ => None,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            resolve_timeout_ms = resolve_timeout_ms,
            metrics_port = ?metrics_port,
            "proxy configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            resolve_timeout: Duration::from_millis(resolve_timeout_ms),
            metrics_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PROXY_BIND_ADDR",
        "DATABASE_URL",
        "PROXY_RESOLVE_TIMEOUT_MS",
        "PROXY_METRICS_PORT",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.database_url, "postgres://localhost:5432/signpost");
            assert_eq!(config.resolve_timeout, Duration::from_millis(1500));
            assert!(config.metrics_port.is_none());
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("PROXY_BIND_ADDR", "127.0.0.1:9090"),
                ("DATABASE_URL", "postgres://db:5432/signpost"),
                ("PROXY_RESOLVE_TIMEOUT_MS", "250"),
                ("PROXY_METRICS_PORT", "9091"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.database_url, "postgres://db:5432/signpost");
                assert_eq!(config.resolve_timeout, Duration::from_millis(250));
                assert_eq!(config.metrics_port, Some(9091));
            },
        );
    }

    #[test]
    fn config_bad_timeout_rejected() {
        with_env_vars(&[("PROXY_RESOLVE_TIMEOUT_MS", "soon")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_empty_metrics_port_disabled() {
        with_env_vars(&[("PROXY_METRICS_PORT", "")], || {
            let config = Config::from_env().unwrap();
            assert!(config.metrics_port.is_none());
        });
    }

    #[test]
    fn config_bad_metrics_port_rejected() {
        with_env_vars(&[("PROXY_METRICS_PORT", "not-a-port")], || {
            assert!(Config::from_env().is_err());
        });
    }
}
