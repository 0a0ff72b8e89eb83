//! Connection options shared by every query.

use std::fmt;
use std::sync::Arc;

use url::Url;

use super::transport::Transport;
use crate::error::ValidationError;

/// Base URL of the Azure DevOps services.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Default limit on concurrent requests during a fan-out.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Validated, immutable connection options.
#[derive(Clone)]
pub struct ConnectionOptions {
    organization: String,
    project: String,
    transport: Arc<dyn Transport>,
    base_url: String,
    max_concurrent_requests: usize,
}

impl ConnectionOptions {
    /// Starts building options.
    pub fn builder() -> ConnectionOptionsBuilder {
        ConnectionOptionsBuilder::default()
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Upper bound on requests issued concurrently by one call.
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Builds `{base}/{segments...}`, percent-encoding every segment.
    ///
    /// Falls back to plain joining when the base URL cannot be parsed, so that
    /// the transport reports the problem with the URL it was given.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> String {
        if let Ok(mut url) = Url::parse(&self.base_url) {
            let extended = match url.path_segments_mut() {
                Ok(mut path) => {
                    path.pop_if_empty().extend(segments);
                    true
                }
                Err(()) => false,
            };
            if extended {
                return url.to_string();
            }
        }
        let mut joined = self.base_url.clone();
        for segment in segments {
            joined.push('/');
            joined.push_str(segment);
        }
        joined
    }

    /// Endpoint below `{base}/{organization}/{project}`.
    pub(crate) fn project_endpoint(&self, segments: &[&str]) -> String {
        let mut all = vec![self.organization.as_str(), self.project.as_str()];
        all.extend_from_slice(segments);
        self.endpoint(&all)
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("base_url", &self.base_url)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish_non_exhaustive()
    }
}

/// Raw options, validated by [`ConnectionOptionsBuilder::build`].
#[derive(Default, Clone)]
pub struct ConnectionOptionsBuilder {
    organization: Option<String>,
    project: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    base_url: Option<String>,
    max_concurrent_requests: Option<usize>,
}

impl ConnectionOptionsBuilder {
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Base URL of the server; defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = Some(limit);
        self
    }

    /// Validates the options.
    ///
    /// Checks run in order: organization, project, transport, url, concurrency.
    /// The first failure is returned.
    pub fn build(self) -> Result<ConnectionOptions, ValidationError> {
        let organization = require_property("organization", self.organization)?;
        let project = require_property("project", self.project)?;
        let transport = self
            .transport
            .ok_or_else(|| ValidationError::PropertyNotDefined {
                property: "transport".to_string(),
            })?;

        let base_url = match self.base_url {
            Some(url) if url.is_empty() => {
                return Err(ValidationError::PropertyEmpty {
                    property: "url".to_string(),
                });
            }
            Some(url) => url.trim_end_matches('/').to_string(),
            None => DEFAULT_BASE_URL.to_string(),
        };

        let max_concurrent_requests = self
            .max_concurrent_requests
            .unwrap_or(DEFAULT_MAX_CONCURRENT_REQUESTS);
        if max_concurrent_requests == 0 {
            return Err(ValidationError::TooSmall {
                name: "maxConcurrentRequests".to_string(),
                minimum: 1,
            });
        }

        Ok(ConnectionOptions {
            organization,
            project,
            transport,
            base_url,
            max_concurrent_requests,
        })
    }
}

fn require_property(property: &str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::PropertyNotDefined {
            property: property.to_string(),
        }),
        Some(v) if v.is_empty() => Err(ValidationError::PropertyEmpty {
            property: property.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

/// Validates a required string argument such as a team name.
pub(crate) fn require_argument(name: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            name: name.to_string(),
        });
    }
    Ok(())
}
