use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

/// Shortest secret accepted for signing and encrypting the session cookie.
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Unset means the seeded in-memory directory is used.
    pub database_url: Option<String>,
    pub log_dir: String,

    // Paging
    pub default_page_size: u32,
    pub max_page_size: u32,

    // Rate limiting
    pub rate_per_min: u32,

    pub session_key: Option<String>,
    pub cookie_secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            database_url: None,
            log_dir: "logs".to_string(),
            default_page_size: 5,
            max_page_size: 100,
            rate_per_min: 600,
            session_key: None,
            cookie_secure: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, falling back to the
    /// defaults for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),

            default_page_size: parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", defaults.max_page_size)?,

            rate_per_min: parse_or(&lookup, "RATE_PER_MIN", defaults.rate_per_min)?,

            session_key: lookup("SESSION_KEY").filter(|key| !key.is_empty()),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", defaults.cookie_secure)?,
        };

        if config.rate_per_min == 0 {
            bail!("RATE_PER_MIN must be at least 1");
        }
        if config.default_page_size == 0 {
            bail!("DEFAULT_PAGE_SIZE must be at least 1");
        }
        if config.default_page_size > config.max_page_size {
            bail!(
                "DEFAULT_PAGE_SIZE ({}) must not exceed MAX_PAGE_SIZE ({})",
                config.default_page_size,
                config.max_page_size
            );
        }
        if let Some(key) = &config.session_key
            && key.len() < MIN_SESSION_KEY_LEN
        {
            bail!("SESSION_KEY must be at least {} bytes", MIN_SESSION_KEY_LEN);
        }

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.database_url, None);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_ADDR", "0.0.0.0:9000"),
            ("DATABASE_URL", "mysql://hr@localhost/portal"),
            ("DEFAULT_PAGE_SIZE", "10"),
            ("RATE_PER_MIN", "60"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9000");
        assert_eq!(config.database_url.as_deref(), Some("mysql://hr@localhost/portal"));
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.rate_per_min, 60);
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("MAX_PAGE_SIZE", "lots")])).unwrap_err();
        assert!(err.to_string().contains("MAX_PAGE_SIZE"));
    }

    #[test]
    fn inconsistent_paging_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("DEFAULT_PAGE_SIZE", "0")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[
                ("DEFAULT_PAGE_SIZE", "50"),
                ("MAX_PAGE_SIZE", "20"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn short_session_key_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("SESSION_KEY", "too-short")])).is_err());
        let long = "k".repeat(MIN_SESSION_KEY_LEN);
        let config = Config::from_lookup(lookup_from(&[("SESSION_KEY", long.as_str())])).unwrap();
        assert_eq!(config.session_key, Some(long));
    }
}
