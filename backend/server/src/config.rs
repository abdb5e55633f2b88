use std::{collections::HashMap, env, fmt::Display, fs::read_to_string, str::FromStr};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub port: u16,
    pub redis_url: Option<String>,
    pub invite_codes: HashMap<String, String>,
    pub admin_key: String,
    pub enforce_invite_code: bool,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8080"),
            redis_url: secret_or_var("REDIS_URL"),
            invite_codes: parse_invite_codes(&var("INVITE_CODES_JSON").unwrap_or_default()),
            admin_key: secret_or_var("ADMIN_KEY").unwrap_or_default(),
            enforce_invite_code: try_load("ENFORCE_INVITE_CODE", "false"),
            cors_origin: var("CORS_ORIGIN").ok().filter(|origin| !origin.is_empty()),
        }
    }

    pub fn redis_url(&self) -> Result<&str, AppError> {
        self.redis_url.as_deref().ok_or_else(|| {
            AppError::Configuration("Missing REDIS_URL. Set it in the environment.".to_string())
        })
    }

    /// Trimmed access code for `slug`, if one is configured.
    pub fn expected_code(&self, slug: &str) -> Option<&str> {
        self.invite_codes.get(slug).map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            redis_url: None,
            invite_codes: HashMap::new(),
            admin_key: String::new(),
            enforce_invite_code: false,
            cors_origin: None,
        }
    }
}

/// Malformed input yields an empty map rather than an error.
pub fn parse_invite_codes(raw: &str) -> HashMap<String, String> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };

    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("INVITE_CODES_JSON is not an object, ignoring");
            return HashMap::new();
        }
        Err(e) => {
            warn!("Invalid INVITE_CODES_JSON: {e}");
            return HashMap::new();
        }
    };

    parsed
        .into_iter()
        .filter_map(|(slug, code)| match code {
            Value::String(code) if !code.trim().is_empty() => Some((slug, code.trim().to_string())),
            _ => None,
        })
        .collect()
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default: {default}");
        default
            .parse()
            .map_err(|_| ())
            .expect("Environment misconfigured!")
    })
}

fn secret_or_var(name: &str) -> Option<String> {
    let path = format!("/run/secrets/{name}");

    match read_to_string(&path) {
        Ok(secret) => Some(secret.trim().to_string()),
        Err(_) => var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        let codes = parse_invite_codes(r#"{"peruth-innocent": " WED2025 ", "other": "ABC"}"#);

        assert_eq!(codes.len(), 2);
        assert_eq!(codes["peruth-innocent"], "WED2025");
        assert_eq!(codes["other"], "ABC");
    }

    #[test]
    fn test_malformed_codes() {
        assert!(parse_invite_codes("{not json").is_empty());
        assert!(parse_invite_codes("[1, 2]").is_empty());
        assert!(parse_invite_codes("\"WED2025\"").is_empty());
        assert!(parse_invite_codes("").is_empty());
    }

    #[test]
    fn test_blank_and_non_string_codes() {
        let codes = parse_invite_codes(r#"{"a": "   ", "b": 42, "c": null, "d": "ok"}"#);

        assert_eq!(codes.len(), 1);
        assert_eq!(codes["d"], "ok");
    }

    #[test]
    fn test_missing_redis_url() {
        let config = Config::default();

        assert!(matches!(config.redis_url(), Err(AppError::Configuration(_))));
    }
}
