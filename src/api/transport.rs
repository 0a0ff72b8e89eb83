//! HTTP transport abstraction.
//!
//! The client never talks to the network directly. Every request goes through a
//! [`Transport`], which lets callers decorate requests (authentication, retries,
//! timeouts) and lets tests substitute a stub.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ApiError;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    /// A GET request without headers or body.
    pub fn get() -> Self {
        Self {
            method: Method::Get,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    pub fn post_json(body: &serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body.to_string()),
        }
    }

    /// Sets a header, replacing any header of the same name (case-insensitive).
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response returned by a [`Transport`].
///
/// The status is kept for diagnostics only; callers of the client do not get
/// special handling for error statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Parse {
            url: self.url.clone(),
            status: self.status,
            message: e.to_string(),
        })
    }
}

/// Something that can perform HTTP requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, request: Request) -> Result<Response, ApiError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a 30 second request timeout.
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str, request: Request) -> Result<Response, ApiError> {
        let transport_error = |e: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        tracing::trace!(url, status, "response received");
        Ok(Response::new(url, status, body))
    }
}
