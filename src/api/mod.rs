//! HTTP client for the school platform.
//!
//! Two blocking calls, made with the synchronous `ureq` client and never
//! retried:
//!
//! - **Sign-in**: Basic credentials in, bearer token out ([`auth`]).
//! - **Record fetch**: one GraphQL query with the bearer token ([`graphql`]).

pub mod auth;
pub mod graphql;
pub mod query;

use std::time::Duration;

use crate::config::schema::ApiConfig;

/// Synchronous platform client.
///
/// Built from the resolved `[api]` config and used for a single pipeline
/// run.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    graphql_url: String,
    auth_url: String,
    timeout: Duration,
}

impl PlatformClient {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            graphql_url: config.graphql_url.trim().to_string(),
            auth_url: config.auth_url.trim().to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }
}

/// Read a response body, falling back to an empty string.
fn body_text(response: ureq::Response) -> String {
    response.into_string().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = PlatformClient::from_config(&ApiConfig::default());
        assert!(client.graphql_url().ends_with("/api/graphql-engine/v1/graphql"));
        assert!(client.auth_url().ends_with("/api/auth/signin"));
        assert_eq!(client.timeout, Duration::from_millis(15_000));
    }
}
