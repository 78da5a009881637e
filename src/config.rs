/*
 * Responsibility
 * - 環境変数の読み込み (PORT, DASHBOARD_TOKEN, SESSION_SECRET など)
 * - 起動時に一度だけ組み立て、以降は不変 (gate / session へ参照で渡す)
 * - 値が存在するのに不正な場合は起動失敗
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEV_DASHBOARD_TOKEN: &str = "dev-token";
pub const DEV_SESSION_SECRET: &str = "dev-session-secret";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_SESSION_LEEWAY_SECONDS: u64 = 60;
// Browsers cap cookie Max-Age at 400 days.
const MAX_SESSION_TTL_SECONDS: u64 = 400 * 24 * 60 * 60;
const MAX_SESSION_LEEWAY_SECONDS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub dashboard_token: String,
    pub session_secret: String,
    pub session_ttl_seconds: u64,
    pub session_leeway_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets stay out of logs
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("session_leeway_seconds", &self.session_leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let dashboard_token = get("DASHBOARD_TOKEN").unwrap_or_else(|| {
            if app_env.is_production() {
                tracing::warn!("DASHBOARD_TOKEN is not set; using the development fallback");
            }
            DEV_DASHBOARD_TOKEN.to_string()
        });

        let session_secret = get("SESSION_SECRET").unwrap_or_else(|| {
            if app_env.is_production() {
                tracing::warn!("SESSION_SECRET is not set; using the development fallback");
            }
            DEV_SESSION_SECRET.to_string()
        });

        let session_ttl_seconds = parse_bounded(
            get("SESSION_TTL_SECONDS"),
            "SESSION_TTL_SECONDS",
            DEFAULT_SESSION_TTL_SECONDS,
            MAX_SESSION_TTL_SECONDS,
        )?;
        let session_leeway_seconds = parse_bounded(
            get("SESSION_LEEWAY_SECONDS"),
            "SESSION_LEEWAY_SECONDS",
            DEFAULT_SESSION_LEEWAY_SECONDS,
            MAX_SESSION_LEEWAY_SECONDS,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            dashboard_token,
            session_secret,
            session_ttl_seconds,
            session_leeway_seconds,
        })
    }
}

fn parse_bounded(
    raw: Option<String>,
    key: &'static str,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let Some(v) = raw else {
        return Ok(default);
    };
    match v.trim().parse::<u64>() {
        Ok(value) if value <= max => Ok(value),
        _ => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.dashboard_token, DEV_DASHBOARD_TOKEN);
        assert_eq!(config.session_secret, DEV_SESSION_SECRET);
        assert_eq!(config.session_ttl_seconds, 2_592_000);
        assert_eq!(config.session_leeway_seconds, 60);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("APP_ENV", "prod"),
            ("DASHBOARD_TOKEN", "svc-token"),
            ("SESSION_SECRET", "signing-key"),
            ("SESSION_TTL_SECONDS", "600"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.dashboard_token, "svc-token");
        assert_eq!(config.session_secret, "signing-key");
        assert_eq!(config.session_ttl_seconds, 600);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn empty_secret_counts_as_absent() {
        let config = config_from(&[("DASHBOARD_TOKEN", ""), ("SESSION_SECRET", "  ")]).unwrap();
        assert_eq!(config.dashboard_token, DEV_DASHBOARD_TOKEN);
        assert_eq!(config.session_secret, DEV_SESSION_SECRET);
    }

    #[test]
    fn invalid_numbers_fail_startup() {
        assert_eq!(
            config_from(&[("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            config_from(&[("SESSION_TTL_SECONDS", "-1")]).unwrap_err(),
            ConfigError::Invalid("SESSION_TTL_SECONDS")
        );
    }

    #[test]
    fn out_of_range_session_lifetimes_fail_startup() {
        for ttl in ["9223372036854775807", "18446744073709551615", "34560001"] {
            assert_eq!(
                config_from(&[("SESSION_TTL_SECONDS", ttl)]).unwrap_err(),
                ConfigError::Invalid("SESSION_TTL_SECONDS"),
                "{ttl}"
            );
        }
        assert_eq!(
            config_from(&[("SESSION_LEEWAY_SECONDS", "18446744073709551615")]).unwrap_err(),
            ConfigError::Invalid("SESSION_LEEWAY_SECONDS")
        );

        let config = config_from(&[("SESSION_TTL_SECONDS", "34560000")]).unwrap();
        assert_eq!(config.session_ttl_seconds, 34_560_000);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = config_from(&[("DASHBOARD_TOKEN", "t0ken"), ("SESSION_SECRET", "k3y")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("t0ken"));
        assert!(!printed.contains("k3y"));
    }
}
