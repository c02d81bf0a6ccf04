use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://tasks.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Settings used to issue and verify bearer tokens and to hash passwords.
///
/// Shared with handlers and `AuthMiddleware` through `web::Data<AuthSettings>`.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub expire_minutes: i64,
    pub bcrypt_cost: u32,
}

pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthSettings,
}

impl Config {
    /// Reads settings from the process environment.
    ///
    /// `SECRET_KEY`, `ALGORITHM` and `ACCESS_TOKEN_EXPIRE_MINUTES` are required;
    /// their absence is reported as `AppError::Configuration`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a `Config` from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth = AuthSettings {
            secret_key: required(&lookup, "SECRET_KEY")?,
            algorithm: parse_algorithm(&required(&lookup, "ALGORITHM")?)?,
            expire_minutes: parse_expire_minutes(&required(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
            )?)?,
            bcrypt_cost: parsed_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parsed_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            server_port: parsed_or(&lookup, "SERVER_PORT", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            auth,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

/// Only HMAC algorithms work with a shared secret.
fn parse_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    match Algorithm::from_str(raw.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(AppError::Configuration(format!(
            "ALGORITHM must be one of HS256, HS384, HS512 (got {})",
            raw
        ))),
    }
}

fn parse_expire_minutes(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(AppError::Configuration(
            "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive number".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const TOKEN_VARS: [(&str, &str); 3] = [
        ("SECRET_KEY", "test-secret"),
        ("ALGORITHM", "HS256"),
        ("ACCESS_TOKEN_EXPIRE_MINUTES", "30"),
    ];

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&TOKEN_VARS)).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
        assert_eq!(config.auth.secret_key, "test-secret");
        assert_eq!(config.auth.algorithm, Algorithm::HS256);
        assert_eq!(config.auth.expire_minutes, 30);
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_config_custom_values() {
        let mut pairs = TOKEN_VARS.to_vec();
        pairs.extend([
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("BCRYPT_COST", "4"),
            ("ALGORITHM", "HS512"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.auth.bcrypt_cost, 4);
        assert_eq!(config.auth.algorithm, Algorithm::HS512);
    }

    #[test]
    fn test_missing_token_settings_are_fatal() {
        for missing in ["SECRET_KEY", "ALGORITHM", "ACCESS_TOKEN_EXPIRE_MINUTES"] {
            let pairs: Vec<_> = TOKEN_VARS
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            match Config::from_lookup(lookup_from(&pairs)) {
                Err(AppError::Configuration(msg)) => assert!(msg.contains(missing)),
                Err(e) => panic!("unexpected error: {:?}", e),
                Ok(_) => panic!("config without {} should fail", missing),
            }
        }
    }

    #[test]
    fn test_rejects_unusable_token_settings() {
        let mut pairs = TOKEN_VARS.to_vec();
        pairs.push(("ALGORITHM", "RS256"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());

        let mut pairs = TOKEN_VARS.to_vec();
        pairs.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "-5"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());

        let mut pairs = TOKEN_VARS.to_vec();
        pairs.push(("SERVER_PORT", "eighty"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }
}
