//! HTTP transport implementation using `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportConfig, TransportError};

/// Counter for tagging requests in logs.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// A [`HttpTransport`] backed by a pooled `reqwest::Client`.
///
/// Cheap to clone: `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base: String,
}

impl ReqwestTransport {
    /// Builds a transport from the given config.
    ///
    /// # Errors
    /// - [`TransportError::InvalidUrl`] if `base_url` isn't an absolute URL
    /// - [`TransportError::Setup`] if the TLS backend can't be initialised
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Setup)?;

        tracing::info!(base_url = %parsed, "HTTP transport ready");
        Ok(Self {
            client,
            base: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent relative to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Joins a request path onto the base URL.
    ///
    /// Plain concatenation rather than `Url::join`, so a base of
    /// `http://host/api` keeps its `/api` prefix for `/login`.
    fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        };
        Url::parse(&joined).map_err(|e| TransportError::InvalidUrl(format!("{joined}: {e}")))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_header_map(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(name.to_string()))?;
        map.append(name, value);
    }
    Ok(map)
}

fn classify(e: reqwest::Error, receiving: bool) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if receiving {
        TransportError::ReceiveFailed(e)
    } else {
        TransportError::SendFailed(e)
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let url = self.url_for(&request.path)?;
        let headers = to_header_map(&request.headers)?;

        tracing::debug!(request_id = id, method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(e, false))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| classify(e, true))?;

        tracing::debug!(request_id = id, status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(TransportConfig {
            base_url: base.to_string(),
            ..TransportConfig::default()
        })
        .expect("should build")
    }

    #[test]
    fn test_new_rejects_relative_base_url() {
        let result = ReqwestTransport::new(TransportConfig {
            base_url: "not a url".into(),
            ..TransportConfig::default()
        });

        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let t = transport("http://localhost:5000/api/");

        let url = t.url_for("/admin/services").unwrap();

        assert_eq!(url.as_str(), "http://localhost:5000/api/admin/services");
    }

    #[test]
    fn test_url_for_accepts_path_without_leading_slash() {
        let t = transport("http://localhost:5000");

        let url = t.url_for("login").unwrap();

        assert_eq!(url.as_str(), "http://localhost:5000/login");
    }

    #[test]
    fn test_to_header_map_rejects_newline_in_value() {
        let headers = vec![("Authorization".to_string(), "Bearer a\nb".to_string())];

        let result = to_header_map(&headers);

        assert!(matches!(result, Err(TransportError::InvalidHeader(_))));
    }
}
