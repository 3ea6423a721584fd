//! Settings read from the environment.

use crate::error::ConfigError;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

pub const DEFAULT_POOL_SIZE: usize = 16;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `DATABASE_URL`, required.
    pub database_url: String,
    /// `PONDOK_POOL_SIZE`, maximum pooled connections.
    pub pool_size: usize,
    /// `PONDOK_PAGE_SIZE`, documents per listing page.
    pub page_size: usize,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a key to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(Self {
            database_url,
            pool_size: positive(&lookup, "PONDOK_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            page_size: positive(&lookup, "PONDOK_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
        value,
    })
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    let value = try_load(lookup, key, default)?;
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            message: "must be at least 1".to_owned(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let vars = lookup(&[("DATABASE_URL", "postgres://localhost/pondok")]);
        let config = Config::from_lookup(vars).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/pondok");
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/pondok"),
            ("PONDOK_POOL_SIZE", "4"),
            ("PONDOK_PAGE_SIZE", " 25 "),
        ]))
        .unwrap();
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/pondok"),
            ("PONDOK_POOL_SIZE", "many"),
        ]))
        .unwrap_err();
        insta::assert_snapshot!(err, @r#"invalid PONDOK_POOL_SIZE="many": invalid digit found in string"#);

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/pondok"),
            ("PONDOK_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        insta::assert_snapshot!(err, @r#"invalid PONDOK_PAGE_SIZE="0": must be at least 1"#);
    }
}
