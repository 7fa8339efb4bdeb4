//! HTTP transport abstraction
//!
//! The API client builds platform-neutral requests and hands them to an
//! [`HttpTransport`]. The browser build sends them with `gloo-net`, the server
//! build with `reqwest`; tests plug in an in-memory transport.

use std::future::Future;

use serde::Serialize;

use crate::core::error::ApiError;

#[cfg(feature = "hydrate")]
mod browser;
#[cfg(feature = "ssr")]
mod native;

#[cfg(feature = "hydrate")]
pub use browser::BrowserTransport;
#[cfg(feature = "ssr")]
pub use native::ReqwestTransport;

/// Transport used by the UI for the current build target
#[cfg(feature = "hydrate")]
pub type PlatformTransport = BrowserTransport;
#[cfg(all(feature = "ssr", not(feature = "hydrate")))]
pub type PlatformTransport = ReqwestTransport;

/// Paths that carry their own credentials (cookie or password) and must never
/// be retried through a token refresh
pub const AUTH_ENDPOINTS: [&str; 4] = ["/login", "/register", "/refresh-token", "/logout"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A file sent as one multipart field
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// Request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the API base, e.g. `/pollution/12`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    /// Add a query pair; empty values are skipped
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.query.push((key.to_string(), value));
        }
        self
    }

    pub fn is_auth_endpoint(&self) -> bool {
        AUTH_ENDPOINTS.iter().any(|suffix| self.path.ends_with(suffix))
    }

    /// Absolute (or origin-relative) URL with an encoded query string
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Bind to a base URL and an optional bearer token
    pub fn prepare(&self, base_url: &str, bearer: Option<&str>) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: self.url(base_url),
            bearer: bearer.map(str::to_string),
            body: self.body.clone(),
        }
    }
}

/// Fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn authorization_header(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}

/// Raw response: status and body text
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends prepared requests. Cookies (the refresh token) are always included.
pub trait HttpTransport {
    fn send(&self, request: HttpRequest) -> impl Future<Output = Result<ApiResponse, ApiError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_with_query() {
        let request = ApiRequest::get("/pollution")
            .query("type", "Dépôt sauvage")
            .query("niveau", "")
            .query("dateFrom", "2024-01-01");

        assert_eq!(
            request.url("/api/"),
            "/api/pollution?type=D%C3%A9p%C3%B4t%20sauvage&dateFrom=2024-01-01"
        );
        assert_eq!(ApiRequest::get("/users/3").url("/api"), "/api/users/3");
    }

    #[test]
    fn test_auth_endpoint_detection() {
        assert!(ApiRequest::post("/users/login").is_auth_endpoint());
        assert!(ApiRequest::post("/users/register").is_auth_endpoint());
        assert!(ApiRequest::post("/users/refresh-token").is_auth_endpoint());
        assert!(ApiRequest::post("/users/logout").is_auth_endpoint());
        assert!(!ApiRequest::get("/users").is_auth_endpoint());
        assert!(!ApiRequest::get("/pollution/4").is_auth_endpoint());
    }

    #[test]
    fn test_prepare_sets_bearer() {
        let prepared = ApiRequest::delete("/pollution/4").prepare("http://api", Some("abc"));

        assert_eq!(prepared.method, Method::Delete);
        assert_eq!(prepared.url, "http://api/pollution/4");
        assert_eq!(prepared.authorization_header().as_deref(), Some("Bearer abc"));
        assert_eq!(
            ApiRequest::get("/x").prepare("", None).authorization_header(),
            None
        );
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/users/login")
            .json(&serde_json::json!({ "identifiant": "jd" }))
            .unwrap();
        assert_eq!(
            request.body,
            RequestBody::Json(serde_json::json!({ "identifiant": "jd" }))
        );
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(401, "").is_success());
    }
}
