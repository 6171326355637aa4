//! Client configuration.

use crate::error::Result;
use std::time::Duration;
use url::Url;

/// Default Admin API address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:2525";

/// Settings for building a [`crate::Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the Admin API; operation paths are appended to its path.
    pub base_url: Url,
    /// Transport-level timeout applied to every request. Per-call deadlines
    /// go through [`crate::Context`] instead.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: None,
            user_agent: concat!("rift-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Validate a base URL string.
    pub fn parse_url(url: &str) -> Result<Url> {
        Ok(Url::parse(url)?)
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
