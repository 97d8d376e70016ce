//! Endpoint catalog for the store API
//!
//! [`Endpoints`] maps the logical operations of the negotiation protocol
//! (token request, token exchange, who-am-i) to concrete URL paths and
//! builds the token-request payload. Paths are configuration data: the
//! default catalog matches the public package store, and deployments with
//! different path layouts construct their own catalog with
//! [`Endpoints::new`].

use serde_json::json;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// URL paths for the store operations used by the client.
///
/// All paths are relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    tokens: String,
    tokens_exchange: String,
    whoami: String,
}

impl Endpoints {
    /// The default package store catalog.
    pub fn package_store() -> Self {
        Self {
            tokens: "/v2/tokens".to_string(),
            tokens_exchange: "/v2/tokens/exchange".to_string(),
            whoami: "/v2/tokens/whoami".to_string(),
        }
    }

    /// A catalog with custom paths.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Path of the token-request endpoint.
    /// * `tokens_exchange` - Path of the token-exchange endpoint.
    /// * `whoami` - Path of the who-am-i endpoint.
    pub fn new(
        tokens: impl Into<String>,
        tokens_exchange: impl Into<String>,
        whoami: impl Into<String>,
    ) -> Self {
        Self {
            tokens: tokens.into(),
            tokens_exchange: tokens_exchange.into(),
            whoami: whoami.into(),
        }
    }

    /// Path of the token-request endpoint.
    pub fn tokens(&self) -> &str {
        &self.tokens
    }

    /// Path of the token-exchange endpoint.
    pub fn tokens_exchange(&self) -> &str {
        &self.tokens_exchange
    }

    /// Path of the who-am-i endpoint.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }

    /// Builds the token-request payload.
    ///
    /// The field set is part of the external API contract: `ttl` travels
    /// as a string of seconds, not a number.
    ///
    /// # Arguments
    ///
    /// * `permissions` - Permissions to grant the login, see
    ///   [`crate::attenuations`] for the known vocabulary.
    /// * `description` - Client description shown by the store for audit.
    /// * `ttl` - Time to live in seconds, as a string.
    pub fn token_request(
        &self,
        permissions: &[String],
        description: &str,
        ttl: &str,
    ) -> serde_json::Value {
        json!({
            "permissions": permissions,
            "description": description,
            "ttl": ttl,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::package_store()
    }
}
