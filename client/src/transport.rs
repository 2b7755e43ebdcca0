//! HTTP transport seam.
//!
//! Every request is described by an immutable [`HttpRequest`] value that
//! carries its own content type, accept type and bearer token. Nothing about
//! a request lives on the shared client, so one transport serves concurrent
//! create → publish sequences.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP method of a repository request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request, fully described.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    /// `Content-Type` of the body.
    pub content_type: Option<&'static str>,
    /// `Accept` header.
    pub accept: Option<&'static str>,
    /// Bearer token for `Authorization`.
    pub bearer: Option<String>,
    /// Request body.
    pub body: Option<String>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .field("accept", &self.accept)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body_len", &self.body.as_ref().map(String::len))
            .finish()
    }
}

impl HttpRequest {
    /// A request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            content_type: None,
            accept: None,
            bearer: None,
            body: None,
        }
    }

    /// Sets the body and its media type.
    #[must_use]
    pub fn with_body(mut self, content_type: &'static str, body: impl Into<String>) -> Self {
        self.content_type = Some(content_type);
        self.body = Some(body.into());
        self
    }

    /// Sets the `Accept` header.
    #[must_use]
    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A response as the client needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers, names lower-cased.
    pub headers: Vec<(String, String)>,
    /// Response body text.
    pub body: String,
}

impl HttpResponse {
    /// A response with `status` and no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Sends requests to the repository.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Sends `request` and returns whatever response arrives. Non-2xx
    /// statuses are responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Transport`](crate::ErrorKind::Transport)
    /// error when no response is received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the HTTP client with the configured timeout, user agent and
    /// certificate policy.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Transport`](crate::ErrorKind::Transport)
    /// error if the TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| ClientError::transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
            Method::Put => self.http.put(&request.url),
            Method::Delete => self.http.delete(&request.url),
        };
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let body = response.text().await?;
        debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(201).with_header("Location", "https://e.org/dataset/1");
        assert_eq!(response.header("location"), Some("https://e.org/dataset/1"));
        assert_eq!(response.header("LOCATION"), Some("https://e.org/dataset/1"));
        assert!(response.is_success());
        assert!(!HttpResponse::new(500).is_success());
    }

    #[test]
    fn request_debug_hides_token() {
        let request = HttpRequest::new(Method::Post, "https://e.org/dataset")
            .with_bearer("secret-token")
            .with_body("text/turtle", "<a> <b> <c> .");
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("secret-token"));
        assert_eq!(request.content_type, Some("text/turtle"));
    }
}
