//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum length for item and image URLs.
pub const MAX_URL_LENGTH: usize = 2048;

/// Validates that a reveal date lies in the future.
///
/// Called from handler code rather than a derive, since the check
/// involves the clock.
pub fn validate_future_date(date: DateTime<Utc>) -> Result<(), ValidationError> {
    if date > Utc::now() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_not_future");
        err.message = Some("Reveal date must be in the future".into());
        Err(err)
    }
}

/// Validates that a URL is http(s) and within the length limit.
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if url.len() > MAX_URL_LENGTH {
        let mut err = ValidationError::new("url_too_long");
        err.message = Some("URL must be at most 2048 characters".into());
        return Err(err);
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("url_scheme");
        err.message = Some("URL must use http or https".into());
        Err(err)
    }
}

/// Validates an ISO 4217 style currency code (three uppercase letters).
pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_code");
        err.message = Some("Currency must be a three-letter code".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_future_date() {
        let tomorrow = Utc::now() + Duration::days(1);
        assert!(validate_future_date(tomorrow).is_ok());

        let yesterday = Utc::now() - Duration::days(1);
        assert!(validate_future_date(yesterday).is_err());

        let just_passed = Utc::now() - Duration::seconds(1);
        assert!(validate_future_date(just_passed).is_err());
    }

    #[test]
    fn test_validate_future_date_error_message() {
        let past = Utc::now() - Duration::hours(1);
        let err = validate_future_date(past).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Reveal date must be in the future"
        );
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com/item").is_ok());
        assert!(validate_http_url("http://example.com").is_ok());
        assert!(validate_http_url("ftp://example.com").is_err());
        assert!(validate_http_url("javascript:alert(1)").is_err());
        assert!(validate_http_url("example.com").is_err());
    }

    #[test]
    fn test_validate_http_url_length() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(validate_http_url(&long).is_err());
    }

    #[test]
    fn test_validate_currency() {
        assert!(validate_currency("USD").is_ok());
        assert!(validate_currency("EUR").is_ok());
        assert!(validate_currency("usd").is_err());
        assert!(validate_currency("DOLLARS").is_err());
        assert!(validate_currency("").is_err());
    }
}
