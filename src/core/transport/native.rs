//! Native transport built on `reqwest`, used by the server build

use std::time::Duration;

use super::{ApiResponse, HttpRequest, HttpTransport, Method, RequestBody};
use crate::core::config::Config;
use crate::core::error::ApiError;

/// Sends requests with a cookie-aware `reqwest` client.
///
/// Cloning shares the underlying connection pool, so the server builds one at
/// startup and hands clones to each render.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// `None` when no client was configured; every send fails
    client: Option<reqwest::Client>,
    origin: String,
}

impl ReqwestTransport {
    pub fn new(origin: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client: Some(client),
            origin: origin.into().trim_end_matches('/').to_string(),
        })
    }

    /// Transport for renders without a configured one, such as route
    /// discovery. Builds nothing and fails every request.
    pub fn unconfigured() -> Self {
        Self {
            client: None,
            origin: String::new(),
        }
    }

    /// Resolves relative URLs against the configured site origin
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(config.site_origin.as_str(), config.proxy_timeout())
    }

    pub(crate) fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.origin, url)
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let Some(client) = &self.client else {
            return Err(ApiError::Network("no HTTP client configured".to_string()));
        };
        let url = self.resolve(&request.url);
        let mut builder = match request.method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
            Method::Put => client.put(&url),
            Method::Delete => client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(part) => {
                let file = reqwest::multipart::Part::bytes(part.bytes)
                    .file_name(part.file_name)
                    .mime_str(&part.content_type)
                    .map_err(|e| ApiError::Network(e.to_string()))?;
                builder.multipart(reqwest::multipart::Form::new().part(part.field, file))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_urls() {
        let transport =
            ReqwestTransport::new("http://localhost:4200/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            transport.resolve("/api/pollution"),
            "http://localhost:4200/api/pollution"
        );
        assert_eq!(
            transport.resolve("https://backend.example/api/users"),
            "https://backend.example/api/users"
        );
    }

    #[test]
    fn test_from_config_uses_site_origin() {
        let config = Config::from_lookup(|key| {
            (key == "SITE_ORIGIN").then(|| "https://pollution.example/".to_string())
        });
        let transport = ReqwestTransport::from_config(&config).unwrap();
        assert_eq!(
            transport.resolve("/api/users"),
            "https://pollution.example/api/users"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_transport_fails_without_sending() {
        let transport = ReqwestTransport::unconfigured();
        let request = HttpRequest {
            method: Method::Get,
            url: "/api/pollution".to_string(),
            bearer: None,
            body: RequestBody::Empty,
        };
        assert!(matches!(
            transport.send(request).await,
            Err(ApiError::Network(_))
        ));
    }
}
