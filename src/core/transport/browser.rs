//! Browser transport built on `gloo-net`

use gloo_net::http::{Request, RequestBuilder};
use web_sys::RequestCredentials;

use super::{ApiResponse, FilePart, HttpRequest, HttpTransport, Method, RequestBody};
use crate::core::error::ApiError;

/// Sends requests with `fetch`, always including cookies so the HTTP-only
/// refresh token travels with auth calls
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

impl BrowserTransport {
    pub fn new() -> Self {
        Self
    }
}

fn builder(request: &HttpRequest) -> RequestBuilder {
    let builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
        Method::Put => Request::put(&request.url),
        Method::Delete => Request::delete(&request.url),
    };
    let builder = builder.credentials(RequestCredentials::Include);
    match request.authorization_header() {
        Some(value) => builder.header("Authorization", &value),
        None => builder,
    }
}

fn form_data(part: &FilePart) -> Result<web_sys::FormData, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{:?}", e));

    let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&bytes);

    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&part.content_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err)?;

    let form = web_sys::FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename(&part.field, &blob, &part.file_name)
        .map_err(js_err)?;
    Ok(form)
}

impl HttpTransport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let builder = builder(&request);
        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            // The browser sets the multipart boundary itself
            RequestBody::Multipart(part) => builder.body(form_data(part)?),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(ApiResponse { status, body })
    }
}
