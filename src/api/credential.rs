//! PAT-based authentication for Azure DevOps.
//!
//! Azure DevOps accepts a Personal Access Token (PAT) as the password of a
//! Basic authentication header with an empty user name. [`AuthenticatedTransport`]
//! decorates any [`Transport`] with that header and an `Accept` header.

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

use super::transport::{Request, Response, Transport};
use crate::error::{ApiError, ValidationError};

/// Transport decorator that authenticates every request with a PAT.
///
/// # Example
///
/// ```rust,no_run
/// use kanban_report::api::{AuthenticatedTransport, ReqwestTransport};
/// use secrecy::SecretString;
///
/// let inner = ReqwestTransport::new().unwrap();
/// let pat = SecretString::from("your-pat-token".to_string());
/// let transport = AuthenticatedTransport::new(inner, pat).unwrap();
/// ```
pub struct AuthenticatedTransport<T> {
    inner: T,
    pat: SecretString,
}

impl<T: Transport> AuthenticatedTransport<T> {
    /// Wraps `inner` so that its requests carry the PAT.
    ///
    /// Fails when the PAT is empty.
    pub fn new(inner: T, pat: SecretString) -> Result<Self, ValidationError> {
        if pat.expose_secret().is_empty() {
            return Err(ValidationError::NotDefined {
                name: "personalAccessToken".to_string(),
            });
        }
        Ok(Self { inner, pat })
    }

    fn authorization(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!(":{}", self.pat.expose_secret()));
        format!("Basic {encoded}")
    }
}

impl<T> std::fmt::Debug for AuthenticatedTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("pat", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthenticatedTransport<T> {
    async fn fetch(&self, url: &str, request: Request) -> Result<Response, ApiError> {
        let request = request
            .with_header("Accept", "application/json")
            .with_header("Authorization", self.authorization());
        self.inner.fetch(url, request).await
    }
}
