//! HTTP status classification shared by all adapters
//!
//! Maps backend HTTP responses onto the provider error taxonomy: 429 is
//! rate limiting, 5xx is a server fault (both retryable), 401/403 is an
//! auth failure and other 4xx a bad request (neither retried).

use airelay_domain::error::{Error, ProviderErrorKind, Result};
use airelay_domain::value_objects::ProviderId;
use reqwest::{Response, StatusCode};

/// Classify a non-success status into a provider error
pub fn classify_status(provider: ProviderId, status: StatusCode, body: &str) -> Error {
    let kind = if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderErrorKind::RateLimited
    } else if status.is_server_error() {
        ProviderErrorKind::Server
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ProviderErrorKind::Auth
    } else {
        ProviderErrorKind::BadRequest
    };

    // Bodies can be large HTML error pages; keep the message bounded
    let detail: String = body.chars().take(300).collect();
    Error::provider(
        provider.as_str(),
        format!("HTTP {}: {}", status.as_u16(), detail),
        kind,
    )
}

/// Check the response status and parse the JSON body
pub async fn check_and_parse(provider: ProviderId, response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(provider, status, &body));
    }

    response.json().await.map_err(|e| {
        Error::provider(
            provider.as_str(),
            format!("invalid JSON response: {}", e),
            ProviderErrorKind::Server,
        )
    })
}

/// Map a reqwest transport error onto the taxonomy
pub fn transport_error(provider: ProviderId, err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout
    } else {
        ProviderErrorKind::Server
    };
    Error::provider(
        provider.as_str(),
        format!("HTTP request failed: {}", err),
        kind,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let cases = [
            (StatusCode::TOO_MANY_REQUESTS, ProviderErrorKind::RateLimited),
            (StatusCode::INTERNAL_SERVER_ERROR, ProviderErrorKind::Server),
            (StatusCode::BAD_GATEWAY, ProviderErrorKind::Server),
            (StatusCode::UNAUTHORIZED, ProviderErrorKind::Auth),
            (StatusCode::FORBIDDEN, ProviderErrorKind::Auth),
            (StatusCode::BAD_REQUEST, ProviderErrorKind::BadRequest),
            (StatusCode::NOT_FOUND, ProviderErrorKind::BadRequest),
        ];
        for (status, expected) in cases {
            match classify_status(ProviderId::OpenAi, status, "boom") {
                Error::Provider { kind, .. } => assert_eq!(kind, expected, "{}", status),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
