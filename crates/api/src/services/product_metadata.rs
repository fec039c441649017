//! Product metadata fetch service.
//!
//! Fetches a product page and extracts Open Graph metadata (title,
//! price, image) for item pre-fill. The fetch is the one outbound HTTP
//! call in the system, so it carries its own bounded timeout and an
//! SSRF guard rejecting private-network hosts.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MetadataConfig;
use domain::models::metadata::ProductMetadata;

/// Errors from metadata fetching.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("URL must use http or https")]
    InvalidScheme,

    #[error("Host not allowed")]
    BlockedHost,

    #[error("Request failed: {0}")]
    FetchFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Response is not an HTML page")]
    NotHtml,
}

lazy_static! {
    static ref OG_TAG: Regex = Regex::new(
        r#"(?is)<meta[^>]+property\s*=\s*["']og:([a-z:_]+)["'][^>]+content\s*=\s*["']([^"']*)["']"#
    )
    .unwrap();
    static ref OG_TAG_REVERSED: Regex = Regex::new(
        r#"(?is)<meta[^>]+content\s*=\s*["']([^"']*)["'][^>]+property\s*=\s*["']og:([a-z:_]+)["']"#
    )
    .unwrap();
    static ref TITLE_TAG: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
}

/// Service for fetching product page metadata.
#[derive(Clone)]
pub struct ProductMetadataService {
    client: reqwest::Client,
    config: Arc<MetadataConfig>,
}

impl ProductMetadataService {
    /// Creates a new service with the configured fetch timeout.
    pub fn new(config: MetadataConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(concat!("under-wraps/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Fetch a product page and extract its metadata.
    pub async fn fetch(&self, url: &str) -> Result<ProductMetadata, MetadataError> {
        validate_target_url(url)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MetadataError::Timeout
            } else {
                MetadataError::FetchFailed(e.to_string())
            }
        })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("text/html") {
            warn!(url = %url, content_type = %content_type, "Non-HTML response for metadata fetch");
            return Err(MetadataError::NotHtml);
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetadataError::FetchFailed(e.to_string()))?;

        let truncated = truncate_on_char_boundary(&body, self.config.max_body_bytes);

        let metadata = extract_metadata(truncated);
        debug!(url = %url, ?metadata, "Extracted product metadata");
        Ok(metadata)
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Validate the target URL: http(s) only, no private-network hosts.
fn validate_target_url(url: &str) -> Result<(), MetadataError> {
    let rest = if let Some(rest) = url.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        return Err(MetadataError::InvalidScheme);
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    // Strip userinfo and port.
    let host = authority
        .rsplit('@')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim_start_matches('[')
        .trim_end_matches(']');

    if host.is_empty() {
        return Err(MetadataError::FetchFailed("Missing host".to_string()));
    }

    if is_blocked_host(host) {
        return Err(MetadataError::BlockedHost);
    }

    Ok(())
}

/// Reject hosts that resolve into private or local address space by name.
fn is_blocked_host(host: &str) -> bool {
    let lowered = host.to_ascii_lowercase();
    if lowered == "localhost" || lowered.ends_with(".localhost") || lowered.ends_with(".local") {
        return true;
    }

    if let Ok(ip) = lowered.parse::<IpAddr>() {
        return is_private_ip(&ip);
    }

    false
}

/// Check whether an IP address belongs to private, loopback, or
/// link-local ranges.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                // Carrier-grade NAT range 100.64.0.0/10
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0b1100_0000) == 64)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                // Unique local fc00::/7 and link-local fe80::/10
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Extract Open Graph (falling back to the title tag) metadata from HTML.
fn extract_metadata(html: &str) -> ProductMetadata {
    let mut metadata = ProductMetadata::default();

    let mut apply = |key: &str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match key {
            "title" if metadata.title.is_none() => {
                metadata.title = Some(decode_entities(value));
            }
            "image" if metadata.image_url.is_none() => {
                metadata.image_url = Some(value.to_string());
            }
            "price:amount" if metadata.price.is_none() => {
                metadata.price = value.parse::<f64>().ok().filter(|p| *p >= 0.0);
            }
            "price:currency" if metadata.currency.is_none() => {
                metadata.currency = Some(value.to_uppercase());
            }
            _ => {}
        }
    };

    for capture in OG_TAG.captures_iter(html) {
        apply(&capture[1].to_lowercase(), &capture[2]);
    }
    for capture in OG_TAG_REVERSED.captures_iter(html) {
        let value = capture[1].to_string();
        let key = capture[2].to_lowercase();
        apply(&key, &value);
    }

    if metadata.title.is_none() {
        if let Some(capture) = TITLE_TAG.captures(html) {
            let title = decode_entities(capture[1].trim());
            if !title.is_empty() {
                metadata.title = Some(title);
            }
        }
    }

    metadata
}

/// Decode the handful of HTML entities that show up in titles.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_target_url_schemes() {
        assert!(validate_target_url("https://shop.example.com/item").is_ok());
        assert!(validate_target_url("http://shop.example.com").is_ok());
        assert!(matches!(
            validate_target_url("ftp://shop.example.com"),
            Err(MetadataError::InvalidScheme)
        ));
        assert!(matches!(
            validate_target_url("file:///etc/passwd"),
            Err(MetadataError::InvalidScheme)
        ));
    }

    #[test]
    fn test_validate_target_url_blocks_private_hosts() {
        assert!(matches!(
            validate_target_url("http://localhost:8080/admin"),
            Err(MetadataError::BlockedHost)
        ));
        assert!(matches!(
            validate_target_url("http://127.0.0.1/"),
            Err(MetadataError::BlockedHost)
        ));
        assert!(matches!(
            validate_target_url("http://10.1.2.3/internal"),
            Err(MetadataError::BlockedHost)
        ));
        assert!(matches!(
            validate_target_url("http://192.168.0.10/"),
            Err(MetadataError::BlockedHost)
        ));
        assert!(matches!(
            validate_target_url("http://169.254.169.254/latest/meta-data"),
            Err(MetadataError::BlockedHost)
        ));
        assert!(matches!(
            validate_target_url("http://[::1]/"),
            Err(MetadataError::BlockedHost)
        ));
    }

    #[test]
    fn test_validate_target_url_allows_public_hosts() {
        assert!(validate_target_url("https://93.184.216.34/").is_ok());
        assert!(validate_target_url("https://shop.example.com:8443/item?id=1").is_ok());
    }

    #[test]
    fn test_is_private_ip_ranges() {
        assert!(is_private_ip(&"172.16.0.1".parse().unwrap()));
        assert!(is_private_ip(&"100.64.0.1".parse().unwrap()));
        assert!(is_private_ip(&"fe80::1".parse().unwrap()));
        assert!(is_private_ip(&"fc00::1".parse().unwrap()));
        assert!(!is_private_ip(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_ip(&"2001:4860:4860::8888".parse().unwrap()));
    }

    #[test]
    fn test_extract_metadata_og_tags() {
        let html = r#"
            <html><head>
            <meta property="og:title" content="Mechanical Keyboard" />
            <meta property="og:image" content="https://cdn.example.com/kb.jpg" />
            <meta property="og:price:amount" content="129.99" />
            <meta property="og:price:currency" content="eur" />
            <title>Fallback title</title>
            </head><body></body></html>
        "#;
        let metadata = extract_metadata(html);
        assert_eq!(metadata.title.as_deref(), Some("Mechanical Keyboard"));
        assert_eq!(
            metadata.image_url.as_deref(),
            Some("https://cdn.example.com/kb.jpg")
        );
        assert_eq!(metadata.price, Some(129.99));
        assert_eq!(metadata.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_extract_metadata_title_fallback() {
        let html = "<html><head><title>Gift Shop &amp; More</title></head></html>";
        let metadata = extract_metadata(html);
        assert_eq!(metadata.title.as_deref(), Some("Gift Shop & More"));
        assert!(metadata.price.is_none());
    }

    #[test]
    fn test_extract_metadata_reversed_attribute_order() {
        let html = r#"<meta content="Desk Lamp" property="og:title" />"#;
        let metadata = extract_metadata(html);
        assert_eq!(metadata.title.as_deref(), Some("Desk Lamp"));
    }

    #[test]
    fn test_extract_metadata_rejects_negative_price() {
        let html = r#"<meta property="og:price:amount" content="-5.00" />"#;
        let metadata = extract_metadata(html);
        assert!(metadata.price.is_none());
    }

    #[test]
    fn test_extract_metadata_empty_html() {
        let metadata = extract_metadata("");
        assert_eq!(metadata, ProductMetadata::default());
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate_on_char_boundary("hello", 10), "hello");
        assert_eq!(truncate_on_char_boundary("hello", 3), "hel");
        // Multi-byte character straddling the cut point is dropped whole.
        let s = "ab\u{00e9}cd";
        assert_eq!(truncate_on_char_boundary(s, 3), "ab");
    }
}
