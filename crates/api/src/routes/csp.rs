//! CSP violation report sink.
//!
//! Browsers POST reports here per the Content-Security-Policy header
//! the frontend serves. The endpoint always answers 204: report
//! delivery must never fail visibly, whatever the payload looks like.

use axum::{body::Bytes, http::StatusCode};
use serde::Deserialize;
use tracing::warn;

/// The report-uri payload wrapper.
#[derive(Debug, Deserialize)]
struct CspReportBody {
    #[serde(rename = "csp-report")]
    csp_report: Option<CspReport>,
}

#[derive(Debug, Deserialize)]
struct CspReport {
    #[serde(rename = "document-uri")]
    document_uri: Option<String>,
    #[serde(rename = "violated-directive")]
    violated_directive: Option<String>,
    #[serde(rename = "blocked-uri")]
    blocked_uri: Option<String>,
    #[serde(rename = "source-file")]
    source_file: Option<String>,
}

/// Schemes injected by browser extensions; violations they cause are
/// noise, not signal.
const EXTENSION_SCHEMES: &[&str] = &[
    "chrome-extension://",
    "moz-extension://",
    "safari-extension://",
    "safari-web-extension://",
];

fn is_extension_noise(report: &CspReport) -> bool {
    let from_extension = |value: &Option<String>| {
        value
            .as_deref()
            .map(|v| EXTENSION_SCHEMES.iter().any(|s| v.starts_with(s)))
            .unwrap_or(false)
    };
    from_extension(&report.source_file) || from_extension(&report.blocked_uri)
}

/// POST /api/csp-report
///
/// Accepts CSP violation reports and responds 204 regardless of parse
/// outcome.
pub async fn csp_report(body: Bytes) -> StatusCode {
    if let Ok(parsed) = serde_json::from_slice::<CspReportBody>(&body) {
        if let Some(report) = parsed.csp_report {
            if !is_extension_noise(&report) {
                warn!(
                    document_uri = ?report.document_uri,
                    violated_directive = ?report.violated_directive,
                    blocked_uri = ?report.blocked_uri,
                    source_file = ?report.source_file,
                    "CSP violation reported"
                );
            }
        }
    }

    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_csp_report_accepts_garbage() {
        let status = csp_report(Bytes::from_static(b"not json at all")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_csp_report_accepts_valid_report() {
        let body = serde_json::json!({
            "csp-report": {
                "document-uri": "https://app.example.com/",
                "violated-directive": "script-src",
                "blocked-uri": "https://evil.example.com/x.js"
            }
        });
        let status = csp_report(Bytes::from(body.to_string())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_extension_noise_filter() {
        let noisy = CspReport {
            document_uri: None,
            violated_directive: Some("script-src".to_string()),
            blocked_uri: None,
            source_file: Some("chrome-extension://abcdef/content.js".to_string()),
        };
        assert!(is_extension_noise(&noisy));

        let real = CspReport {
            document_uri: Some("https://app.example.com/".to_string()),
            violated_directive: Some("script-src".to_string()),
            blocked_uri: Some("https://evil.example.com/x.js".to_string()),
            source_file: None,
        };
        assert!(!is_extension_noise(&real));
    }
}
