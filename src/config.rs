/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, JWT_SECRET, provider token mode など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 署名シークレットはここで読み込み、AuthGateway の生成時に注入する (グローバルに置かない)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const MIN_PRODUCTION_SECRET_BYTES: usize = 32;
// 30 days
const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How opaque provider-reference credentials are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderTokens {
    /// Only signed tokens are accepted.
    Disabled,
    /// Development placeholder: the reference itself is taken as the subject id.
    Passthrough,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub database_url: String,
    pub db_max_connections: u32,

    pub jwt_secret: String,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,
    pub access_token_ttl_seconds: u64,
    pub provider_tokens: ProviderTokens,

    pub auth_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the database url or the signing secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("auth_issuer", &self.auth_issuer)
            .field("auth_audience", &self.auth_audience)
            .field("provider_tokens", &self.provider_tokens)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (env, tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if app_env.is_production() && jwt_secret.len() < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let auth_issuer = lookup("AUTH_ISSUER").filter(|s| !s.trim().is_empty());
        let auth_audience = lookup("AUTH_AUDIENCE").filter(|s| !s.trim().is_empty());

        let access_token_leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let access_token_ttl_seconds = match lookup("ACCESS_TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ttl| (1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(ttl))
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?,
            None => 3600,
        };

        let provider_tokens = match lookup("PROVIDER_TOKENS")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "" | "disabled" => ProviderTokens::Disabled,
            "passthrough" => ProviderTokens::Passthrough,
            _ => return Err(ConfigError::Invalid("PROVIDER_TOKENS")),
        };
        // The passthrough mode performs no verification at all.
        if app_env.is_production() && provider_tokens == ProviderTokens::Passthrough {
            return Err(ConfigError::Invalid("PROVIDER_TOKENS"));
        }

        let auth_timeout = Duration::from_millis(
            lookup("AUTH_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5_000),
        );

        let request_timeout = Duration::from_secs(
            lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        Ok(Self {
            addr,
            app_env,
            database_url,
            db_max_connections,
            jwt_secret,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            access_token_ttl_seconds,
            provider_tokens,
            auth_timeout,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/app"),
        ("JWT_SECRET", "dev-secret"),
    ];

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup_from(BASE)).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.access_token_ttl_seconds, 3600);
        assert_eq!(config.provider_tokens, ProviderTokens::Disabled);
        assert_eq!(config.auth_timeout, Duration::from_secs(5));
        assert!(config.auth_issuer.is_none());
    }

    #[test]
    fn secret_is_required() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]))
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", ""),
        ]))
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn production_rejects_short_secret_and_passthrough() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "short"),
            ("APP_ENV", "production"),
        ]))
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::Invalid("JWT_SECRET"));

        let long_secret = "x".repeat(48);
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", long_secret.as_str()),
            ("APP_ENV", "prod"),
            ("PROVIDER_TOKENS", "passthrough"),
        ]))
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::Invalid("PROVIDER_TOKENS"));
    }

    #[test]
    fn passthrough_is_allowed_in_development() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PROVIDER_TOKENS", "Passthrough"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.provider_tokens, ProviderTokens::Passthrough);
    }

    #[test]
    fn unknown_provider_mode_and_bad_port_are_invalid() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PROVIDER_TOKENS", "firebase"));
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).err(),
            Some(ConfigError::Invalid("PROVIDER_TOKENS"))
        );

        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)).err(),
            Some(ConfigError::Invalid("PORT"))
        );
    }

    #[test]
    fn access_token_ttl_must_be_within_bounds() {
        for raw in ["0", "-1", "abc", "18446744073709551615", "9223372036854775807", "2592001"] {
            let mut pairs = BASE.to_vec();
            pairs.push(("ACCESS_TOKEN_TTL_SECONDS", raw));
            assert_eq!(
                Config::from_lookup(lookup_from(&pairs)).err(),
                Some(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS")),
                "ttl {raw}"
            );
        }

        let mut pairs = BASE.to_vec();
        pairs.push(("ACCESS_TOKEN_TTL_SECONDS", "2592000"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.access_token_ttl_seconds, 2_592_000);
    }
}
