//! # Access Codes
//!
//! Server side of the shared invite code.
//!
//! Codes come from `INVITE_CODES_JSON`, one per slug. Comparison here is exact after trimming
//! the supplied value. The invite page gate in [`crate::gate`] compares case-insensitively, so
//! `wed2025` opens the dialogs but is rejected here for `WED2025`.
//!
//! Intake does not call into this module unless `ENFORCE_INVITE_CODE` is set.
use axum::http::HeaderMap;

use crate::{config::Config, error::AppError};

pub const INVITE_CODE_HEADER: &str = "x-invite-code";

const NO_CODE_CONFIGURED: &str = "No access code configured for this event.";
const CODE_REQUIRED: &str = "Code is required.";
const INVALID_CODE: &str = "Invalid access code.";

fn expected_code<'a>(config: &'a Config, slug: &str) -> Result<&'a str, AppError> {
    config
        .expected_code(slug)
        .ok_or_else(|| AppError::Configuration(NO_CODE_CONFIGURED.to_string()))
}

pub fn verify(config: &Config, slug: &str, supplied: &str) -> Result<(), AppError> {
    let expected = expected_code(config, slug)?;

    let supplied = supplied.trim();
    if supplied.is_empty() {
        return Err(AppError::validation(CODE_REQUIRED));
    }

    if supplied != expected {
        return Err(AppError::Unauthorized(INVALID_CODE.to_string()));
    }

    Ok(())
}

/// Header variant used to guard intake. A missing header counts as a mismatch.
pub fn require_invite_code(
    config: &Config,
    slug: &str,
    headers: &HeaderMap,
) -> Result<(), AppError> {
    let expected = expected_code(config, slug)?;

    let supplied = headers
        .get(INVITE_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .trim();

    if supplied != expected {
        return Err(AppError::Unauthorized(INVALID_CODE.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::config::parse_invite_codes;

    fn config() -> Config {
        Config {
            invite_codes: parse_invite_codes(r#"{"peruth-innocent": "WED2025"}"#),
            ..Config::default()
        }
    }

    #[test]
    fn test_exact_match() {
        assert!(verify(&config(), "peruth-innocent", "WED2025").is_ok());
        assert!(verify(&config(), "peruth-innocent", "  WED2025 ").is_ok());
    }

    #[test]
    fn test_case_mismatch_rejected() {
        let err = verify(&config(), "peruth-innocent", "wed2025").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_empty_code() {
        let err = verify(&config(), "peruth-innocent", "   ").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unconfigured_slug() {
        for code in ["WED2025", "anything", ""] {
            let err = verify(&config(), "someone-else", code).unwrap_err();
            assert!(matches!(err, AppError::Configuration(_)));
        }
    }

    #[test]
    fn test_header_check() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            require_invite_code(&config(), "peruth-innocent", &headers),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(INVITE_CODE_HEADER, HeaderValue::from_static(" WED2025 "));
        assert!(require_invite_code(&config(), "peruth-innocent", &headers).is_ok());
        assert!(matches!(
            require_invite_code(&config(), "unknown", &headers),
            Err(AppError::Configuration(_))
        ));
    }
}
