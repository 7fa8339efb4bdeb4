//! Same-origin reverse proxy to the REST backend
//!
//! The browser only talks to this server. Requests under the proxy prefix are
//! forwarded to the backend with their cookies and bearer token, so the
//! HTTP-only refresh cookie stays first-party.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, RawQuery, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;

use crate::core::config::Config;
use crate::core::validation::MAX_PHOTO_BYTES;

/// Largest request body forwarded: a full-size photo plus multipart framing
pub const MAX_PROXY_BODY_BYTES: usize = MAX_PHOTO_BYTES as usize + 1024 * 1024;

/// Request headers passed through to the backend
pub const FORWARDED_REQUEST_HEADERS: [header::HeaderName; 4] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::CONTENT_TYPE,
    header::ACCEPT,
];

/// Response headers passed back to the browser
pub const FORWARDED_RESPONSE_HEADERS: [header::HeaderName; 3] = [
    header::CONTENT_TYPE,
    header::SET_COOKIE,
    header::CACHE_CONTROL,
];

#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    upstream: Arc<str>,
    prefix: Arc<str>,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.proxy_timeout())
            .build()?;
        Ok(Self {
            client,
            upstream: Arc::from(config.api_upstream_url.as_str()),
            prefix: Arc::from(config.api_proxy_prefix.as_str()),
        })
    }
}

/// Router serving the proxy under the configured prefix
pub fn proxy_router(config: &Config) -> Result<Router, reqwest::Error> {
    let state = ProxyState::new(config)?;
    Ok(Router::new()
        .route(&config.proxy_route(), any(proxy_handler))
        .layer(DefaultBodyLimit::max(MAX_PROXY_BODY_BYTES))
        .with_state(state))
}

/// Path below the proxy prefix, still percent-encoded.
///
/// `None` when a segment decodes to `.` or `..`, since the backend URL would
/// resolve outside the upstream base.
pub fn proxied_path<'a>(uri_path: &'a str, prefix: &str) -> Option<&'a str> {
    let path = uri_path.strip_prefix(prefix)?.trim_start_matches('/');
    let escapes = path.split('/').any(|segment| {
        let decoded = urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        decoded == "." || decoded == ".."
    });
    (!escapes).then_some(path)
}

/// Backend URL for a proxied path and raw query string
pub fn upstream_url(upstream: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{}",
        upstream.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Drop the `Domain` attribute so the cookie binds to this origin
pub fn rewrite_set_cookie(value: &str) -> String {
    value
        .split(';')
        .map(str::trim)
        .filter(|part| !part.to_ascii_lowercase().starts_with("domain="))
        .collect::<Vec<_>>()
        .join("; ")
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        serde_json::json!({ "message": message }).to_string(),
    )
        .into_response()
}

fn bad_gateway(message: &str) -> Response {
    json_error(StatusCode::BAD_GATEWAY, message)
}

pub async fn proxy_handler(
    State(state): State<ProxyState>,
    uri: Uri,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(path) = proxied_path(uri.path(), &state.prefix) else {
        tracing::warn!(%method, path = uri.path(), "Rejected proxy path");
        return json_error(StatusCode::BAD_REQUEST, "Chemin invalide");
    };
    let url = upstream_url(&state.upstream, path, query.as_deref());
    tracing::debug!(%method, %url, "Proxying request");

    let mut request = state.client.request(method.clone(), &url);
    for name in FORWARDED_REQUEST_HEADERS {
        for value in headers.get_all(&name) {
            request = request.header(name.clone(), value.clone());
        }
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(%method, %url, "Backend unreachable: {}", e);
            return bad_gateway("Service indisponible");
        }
    };

    let status = upstream.status();
    let mut response_headers = HeaderMap::new();
    for name in FORWARDED_RESPONSE_HEADERS {
        for value in upstream.headers().get_all(&name) {
            let value = if name == header::SET_COOKIE {
                value
                    .to_str()
                    .ok()
                    .and_then(|v| HeaderValue::from_str(&rewrite_set_cookie(v)).ok())
                    .unwrap_or_else(|| value.clone())
            } else {
                value.clone()
            };
            response_headers.append(name.clone(), value);
        }
    }

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(%url, "Failed to read backend response: {}", e);
            return bad_gateway("Réponse du serveur illisible");
        }
    };

    if status.is_server_error() {
        tracing::warn!(%method, %url, status = status.as_u16(), "Backend error");
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_url() {
        assert_eq!(
            upstream_url("http://localhost:3000/api/", "pollution/3", None),
            "http://localhost:3000/api/pollution/3"
        );
        assert_eq!(
            upstream_url(
                "http://localhost:3000/api",
                "pollution",
                Some("type=Eau&dateFrom=2024-01-01")
            ),
            "http://localhost:3000/api/pollution?type=Eau&dateFrom=2024-01-01"
        );
        assert_eq!(
            upstream_url("http://b/api", "users", Some("")),
            "http://b/api/users"
        );
    }

    #[test]
    fn test_rewrite_set_cookie_strips_domain() {
        assert_eq!(
            rewrite_set_cookie(
                "refreshToken=abc; Domain=backend.internal; Path=/; HttpOnly; SameSite=Strict"
            ),
            "refreshToken=abc; Path=/; HttpOnly; SameSite=Strict"
        );
        assert_eq!(rewrite_set_cookie("a=b; HttpOnly"), "a=b; HttpOnly");
    }

    #[test]
    fn test_bad_gateway_status() {
        assert_eq!(bad_gateway("x").status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_router_builds_from_config() {
        let config = Config::from_lookup(|_| None);
        assert!(proxy_router(&config).is_ok());
    }

    #[test]
    fn test_proxied_path_keeps_encoding() {
        assert_eq!(proxied_path("/api/pollution/3", "/api"), Some("pollution/3"));
        assert_eq!(
            proxied_path("/api/users/jean%20dupont", "/api"),
            Some("users/jean%20dupont")
        );
        assert_eq!(proxied_path("/other/users", "/api"), None);
    }

    #[test]
    fn test_proxied_path_rejects_dot_segments() {
        assert_eq!(proxied_path("/api/%2E%2E/admin", "/api"), None);
        assert_eq!(proxied_path("/api/pollution/%2e/3", "/api"), None);
        assert_eq!(proxied_path("/api/pollution/../users", "/api"), None);
        assert_eq!(proxied_path("/api/.%2E/x", "/api"), None);
        assert_eq!(proxied_path("/api/files/..hidden", "/api"), Some("files/..hidden"));
    }

    /// Upstream that answers with the size of the body it received
    async fn spawn_echo_upstream() -> String {
        let app = Router::new()
            .route(
                "/api/{*path}",
                any(|body: Bytes| async move { body.len().to_string() }),
            )
            .layer(DefaultBodyLimit::disable());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{addr}/api")
    }

    async fn spawn_proxy(upstream: &str) -> String {
        let upstream = upstream.to_string();
        let config = Config::from_lookup(move |key| {
            (key == "API_UPSTREAM_URL").then(|| upstream.clone())
        });
        let app = proxy_router(&config).unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        format!("http://{addr}")
    }

    #[test]
    fn test_body_limit_fits_a_full_size_photo() {
        assert!(MAX_PROXY_BODY_BYTES as u64 > MAX_PHOTO_BYTES);
    }

    #[tokio::test]
    async fn test_forwards_photo_sized_bodies() {
        let upstream = spawn_echo_upstream().await;
        let proxy = spawn_proxy(&upstream).await;
        let photo = vec![0u8; 3 * 1024 * 1024];

        let response = reqwest::Client::new()
            .post(format!("{proxy}/api/pollution/upload-photo"))
            .body(photo.clone())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), photo.len().to_string());
    }
}
