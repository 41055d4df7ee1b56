//! Process configuration loaded from environment variables.
//!
//! A `.env` file is loaded by `main` before [`AppConfig::from_env`] runs;
//! variables already present in the environment take precedence.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use url::Url;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// One or more required variables are unset or empty.
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Minimum log level, as accepted in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    ///
    /// `panic` and `fatal` have no `tracing` equivalent and collapse to `error`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Panic | LogLevel::Fatal => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(format!(
                "expected one of debug, info, warn, error, panic, fatal; got {other:?}"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Human-readable output instead of JSON lines.
    pub develop_mode: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Always `postgres`.
    pub driver: String,
    pub dsn: String,
    pub max_open_conns: u32,
    /// Connections the pool keeps open even when idle (sqlx
    /// `min_connections`). Not a cap on idle connections.
    pub max_idle_conns: u32,
    pub conn_max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn pool_settings(&self) -> idm_db::PoolSettings {
        idm_db::PoolSettings {
            max_connections: self.max_open_conns,
            min_connections: self.max_idle_conns,
            max_lifetime: self.conn_max_lifetime,
            ..idm_db::PoolSettings::default()
        }
    }
}

/// PEM files used for TLS termination.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwks_url: Url,
    /// Expected `iss`; unchecked when `None`.
    pub issuer: Option<String>,
    /// Expected `aud`; unchecked when `None`.
    pub audience: Option<String>,
    /// Age after which the cached key set is refetched.
    pub jwks_refresh_interval: Duration,
    /// Lower bound between refetches triggered by an unknown `kid`.
    pub jwks_min_refetch_interval: Duration,
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub tls: TlsConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Required | Default   |
    /// |-----------------------------|----------|-----------|
    /// | `DB_DRIVER_NAME`            | **yes**  | --        |
    /// | `DB_DSN`                    | **yes**  | --        |
    /// | `APP_NAME`                  | **yes**  | --        |
    /// | `APP_VERSION`               | **yes**  | --        |
    /// | `LOG_DEVELOP_MODE`          | **yes**  | --        |
    /// | `SSL_SERT`                  | **yes**  | --        |
    /// | `SSL_KEY`                   | **yes**  | --        |
    /// | `JWKS_URL`                  | **yes**  | --        |
    /// | `LOG_LEVEL`                 | no       | `info`    |
    /// | `HOST`                      | no       | `0.0.0.0` |
    /// | `PORT`                      | no       | `8443`    |
    /// | `REQUEST_TIMEOUT_SECS`      | no       | `30`      |
    /// | `CORS_ORIGINS`              | no       | (none)    |
    /// | `JWT_ISSUER`                | no       | (none)    |
    /// | `JWT_AUDIENCE`              | no       | (none)    |
    /// | `JWKS_REFRESH_SECS`         | no       | `300`     |
    /// | `JWKS_MIN_REFETCH_SECS`     | no       | `10`      |
    /// | `DB_MAX_OPEN_CONNS`         | no       | `20`      |
    /// | `DB_MAX_IDLE_CONNS`         | no       | `5`       |
    /// | `DB_CONN_MAX_LIFETIME_SECS` | no       | `1800`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader {
            lookup,
            missing: Vec::new(),
        };

        let driver = env.required("DB_DRIVER_NAME");
        let dsn = env.required("DB_DSN");
        let name = env.required("APP_NAME");
        let version = env.required("APP_VERSION");
        let develop_mode = env.required("LOG_DEVELOP_MODE");
        let cert_path = env.required("SSL_SERT");
        let key_path = env.required("SSL_KEY");
        let jwks_url = env.required("JWKS_URL");

        if !env.missing.is_empty() {
            return Err(ConfigError::Missing(env.missing));
        }

        if !driver.eq_ignore_ascii_case("postgres") {
            return Err(ConfigError::Invalid {
                var: "DB_DRIVER_NAME",
                reason: format!("unsupported driver {driver:?}, expected \"postgres\""),
            });
        }

        let jwks_url = Url::parse(&jwks_url).map_err(|e| ConfigError::Invalid {
            var: "JWKS_URL",
            reason: e.to_string(),
        })?;
        if !matches!(jwks_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                var: "JWKS_URL",
                reason: format!("unsupported scheme {:?}", jwks_url.scheme()),
            });
        }

        let cors_origins = env.list("CORS_ORIGINS");
        if let Some(bad) = cors_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::Invalid {
                var: "CORS_ORIGINS",
                reason: format!("{bad:?} is not a valid origin"),
            });
        }

        Ok(Self {
            name,
            version,
            host: env.optional("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env.parsed("PORT", 8443)?,
            cors_origins,
            request_timeout_secs: env.parsed("REQUEST_TIMEOUT_SECS", 30)?,
            database: DatabaseConfig {
                driver: driver.to_ascii_lowercase(),
                dsn,
                max_open_conns: env.parsed("DB_MAX_OPEN_CONNS", 20)?,
                max_idle_conns: env.parsed("DB_MAX_IDLE_CONNS", 5)?,
                conn_max_lifetime: Duration::from_secs(
                    env.parsed("DB_CONN_MAX_LIFETIME_SECS", 1800)?,
                ),
            },
            log: LogConfig {
                level: env.parsed("LOG_LEVEL", LogLevel::Info)?,
                develop_mode: parse_flag("LOG_DEVELOP_MODE", &develop_mode)?,
            },
            tls: TlsConfig {
                cert_path: PathBuf::from(cert_path),
                key_path: PathBuf::from(key_path),
            },
            auth: AuthConfig {
                jwks_url,
                issuer: env.optional("JWT_ISSUER"),
                audience: env.optional("JWT_AUDIENCE"),
                jwks_refresh_interval: Duration::from_secs(env.parsed("JWKS_REFRESH_SECS", 300)?),
                jwks_min_refetch_interval: Duration::from_secs(
                    env.parsed("JWKS_MIN_REFETCH_SECS", 10)?,
                ),
            },
        })
    }
}

struct EnvReader<F> {
    lookup: F,
    missing: Vec<&'static str>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value of `var`, trimmed.
    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, var: &'static str) -> String {
        match self.optional(var) {
            Some(value) => value,
            None => {
                self.missing.push(var);
                String::new()
            }
        }
    }

    fn parsed<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(var) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: format!("{raw:?}: {e}"),
            }),
        }
    }

    fn list(&self, var: &str) -> Vec<String> {
        self.optional(var)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid {
            var,
            reason: format!("{raw:?} is not a boolean"),
        }),
    }
}
