//! Login rate limiting backed by the session store.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{RATE_LIMIT_LOGIN_ATTEMPTS, RATE_LIMIT_LOGIN_WINDOW_SECONDS};

/// Rate limit error response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from(self.retry_after));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many login attempts. Please try again later.",
        )
            .into_response()
    }
}

fn forwarded_address(request: &Request) -> Option<String> {
    let headers = request.headers();
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("X-Real-IP")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
}

/// Client address for rate limiting.
///
/// The socket peer is used unless `trust_proxy` is set; forwarding headers
/// are client-controlled when no proxy rewrites them.
pub fn client_identifier(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = forwarded_address(request) {
            return ip;
        }
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Limit credential submissions per client.
///
/// Only POSTs count, so the login form itself always renders. When the
/// store cannot be reached the attempt is refused.
pub async fn login_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let client_id = client_identifier(&request, state.config.trust_proxy_headers);
    let key = format!("login:{}", client_id);

    let (count, allowed) = match state
        .sessions
        .check_rate_limit(&key, RATE_LIMIT_LOGIN_ATTEMPTS, RATE_LIMIT_LOGIN_WINDOW_SECONDS)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Login rate limit check failed, denying request");
            return Err(RateLimitError {
                retry_after: RATE_LIMIT_LOGIN_WINDOW_SECONDS,
            });
        }
    };

    if !allowed {
        tracing::warn!(client = %client_id, count, "Login rate limit exceeded");
        return Err(RateLimitError {
            retry_after: RATE_LIMIT_LOGIN_WINDOW_SECONDS,
        });
    }

    let mut response = next.run(request).await;
    let remaining = RATE_LIMIT_LOGIN_ATTEMPTS.saturating_sub(count);
    response
        .headers_mut()
        .insert("X-RateLimit-Limit", HeaderValue::from(RATE_LIMIT_LOGIN_ATTEMPTS));
    response
        .headers_mut()
        .insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_rate_limit_error_response() {
        let response = RateLimitError { retry_after: 300 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "300");
    }

    fn request_from(peer: &str) -> Request {
        let mut request = Request::builder()
            .header("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .header("X-Real-IP", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    #[test]
    fn test_client_identifier_ignores_headers_by_default() {
        let request = request_from("192.0.2.10:50000");
        assert_eq!(client_identifier(&request, false), "192.0.2.10");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identifier(&bare, false), "unknown");
    }

    #[test]
    fn test_client_identifier_behind_trusted_proxy() {
        let request = request_from("10.0.0.1:443");
        assert_eq!(client_identifier(&request, true), "203.0.113.7");

        let mut real_ip_only = Request::builder()
            .header("X-Real-IP", "198.51.100.4")
            .body(Body::empty())
            .unwrap();
        real_ip_only
            .extensions_mut()
            .insert(ConnectInfo("10.0.0.1:443".parse::<SocketAddr>().unwrap()));
        assert_eq!(client_identifier(&real_ip_only, true), "198.51.100.4");
    }
}
