//! Store client and credential negotiation
//!
//! [`StoreClient`] is the high-level façade: it owns the transport, the
//! endpoint catalog, the credential coordinator, and the discharge
//! acquirer, and sequences the three-call login protocol:
//!
//! 1. POST the token request; extract the root macaroon.
//! 2. Resolve the root's third-party caveats through the discharge
//!    authority and encode the proof bundle.
//! 3. POST the bundle to the token-exchange endpoint (in the
//!    `Macaroons` header, a separate channel from the bearer header);
//!    extract the store-authorized macaroon and persist it.
//!
//! Each stage maps one immutable value to the next; nothing is written
//! to the credential store until the whole sequence has succeeded, so a
//! failed login leaves any earlier credential untouched.
//!
//! # Examples
//!
//! ```no_run
//! use xzstore::{attenuations, Endpoints, StoreClient};
//!
//! # async fn example() -> xzstore::Result<()> {
//! let client = StoreClient::new(
//!     "https://api.store.example",
//!     Endpoints::package_store(),
//!     "example-app",
//!     "example-app/1.0",
//!     None,
//! )?;
//!
//! client
//!     .login(&[attenuations::PACKAGE_MANAGE.to_string()], "CI", "3600")
//!     .await?;
//! let identity = client.whoami().await?;
//! client.logout()?;
//! # let _ = identity;
//! # Ok(())
//! # }
//! ```

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Response};
use url::Url;

use crate::auth::{Auth, CredentialStore};
use crate::candid::{self, CandidAcquirer, DischargeAcquirer, Macaroon};
use crate::endpoints::Endpoints;
use crate::error::{Result, StoreError};
use crate::models::WhoAmi;
use crate::transport::HttpTransport;

/// Header carrying the discharge bundle during token exchange.
///
/// Distinct from `Authorization`: at exchange time the client does not
/// yet hold the store-authorized credential.
const MACAROONS_HEADER: &str = "Macaroons";

// ---------------------------------------------------------------------------
// StoreClient
// ---------------------------------------------------------------------------

/// Client for a macaroon-authenticated store API.
///
/// Holds no credential state of its own: every authorized request
/// re-reads the persisted record, so rotation or external invalidation
/// takes effect immediately.
pub struct StoreClient {
    base_url: Url,
    endpoints: Endpoints,
    transport: HttpTransport,
    auth: Auth,
    acquirer: Box<dyn DischargeAcquirer>,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Creates a client for the store at `base_url`.
    ///
    /// The credential record is keyed by (`application_name`, host of
    /// `base_url`) and lives in the OS keyring unless `environment_auth`
    /// names a set environment variable (see [`Auth::new`]).
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the store API.
    /// * `endpoints` - Endpoint catalog for this store.
    /// * `application_name` - Keyring namespace for stored credentials.
    /// * `user_agent` - `User-Agent` header for all requests.
    /// * `environment_auth` - Optional credential bootstrap variable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when `base_url` cannot be parsed
    /// or has no host.
    pub fn new(
        base_url: &str,
        endpoints: Endpoints,
        application_name: &str,
        user_agent: &str,
        environment_auth: Option<&str>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Config(format!("invalid base URL {base_url}: {e}")))?;
        let host = base_url
            .host_str()
            .ok_or_else(|| StoreError::Config(format!("base URL {base_url} has no host")))?
            .to_string();

        let transport = HttpTransport::new(user_agent)?;
        let acquirer = Box::new(CandidAcquirer::new(transport.client()));
        let auth = Auth::new(application_name, &host, environment_auth)?;

        Ok(Self {
            base_url,
            endpoints,
            transport,
            auth,
            acquirer,
        })
    }

    /// Replaces the discharge acquirer.
    ///
    /// Interactive or cached resolution strategies plug in here without
    /// touching the negotiation sequence.
    pub fn with_acquirer(mut self, acquirer: Box<dyn DischargeAcquirer>) -> Self {
        self.acquirer = acquirer;
        self
    }

    /// Replaces the credential storage backend.
    ///
    /// Tests and keyring-less deployments use this with
    /// [`crate::auth::MemoryStore`].
    pub fn with_credential_store(mut self, store: Box<dyn CredentialStore>) -> Self {
        self.auth = Auth::with_store(store);
        self
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    /// Obtains credentials to perform authenticated requests.
    ///
    /// Runs the full negotiation and persists the resulting authorized
    /// credential. On any failure nothing is persisted and a credential
    /// from a prior successful login remains usable.
    ///
    /// # Arguments
    ///
    /// * `permissions` - Permissions to grant the login, see
    ///   [`crate::attenuations`].
    /// * `description` - Client description to refer to from the store.
    /// * `ttl` - How long until the credential expires, in seconds,
    ///   expressed as a string per the store API contract.
    ///
    /// # Errors
    ///
    /// [`StoreError::Network`] / [`StoreError::StoreServer`] from either
    /// store call, [`StoreError::Discharge`] when a caveat cannot be
    /// resolved, [`StoreError::MalformedResponse`] when a 2xx response
    /// violates the protocol contract.
    pub async fn login(&self, permissions: &[String], description: &str, ttl: &str) -> Result<()> {
        let root = self.get_token(permissions, description, ttl).await?;
        let bundle = self.discharge(&root).await?;
        let authorized = self.exchange_token(&bundle).await?;

        self.auth.set_credentials(&authorized)?;
        tracing::debug!("login complete");
        Ok(())
    }

    /// Requests a root macaroon scoped by the login parameters.
    async fn get_token(
        &self,
        permissions: &[String],
        description: &str,
        ttl: &str,
    ) -> Result<Macaroon> {
        let payload = self.endpoints.token_request(permissions, description, ttl);
        let url = self.url_for(self.endpoints.tokens());

        let response = self
            .transport
            .request(Method::POST, &url, None, None, Some(&payload))
            .await?;

        let raw = extract_macaroon(response).await?;
        Macaroon::from_json(&raw)
    }

    /// Resolves third-party caveats and encodes the discharge bundle.
    async fn discharge(&self, root: &Macaroon) -> Result<String> {
        let proofs = candid::discharge_all(root, self.acquirer.as_ref()).await?;
        candid::encode_discharge_bundle(&proofs)
    }

    /// Exchanges the discharge bundle for the store-authorized macaroon.
    async fn exchange_token(&self, bundle: &str) -> Result<String> {
        let mut headers = HeaderMap::new();
        headers.insert(
            MACAROONS_HEADER,
            HeaderValue::from_str(bundle).map_err(|e| {
                StoreError::Discharge(format!("discharge bundle is not header-safe: {e}"))
            })?,
        );

        let url = self.url_for(self.endpoints.tokens_exchange());
        let response = self
            .transport
            .request(Method::POST, &url, None, Some(headers), None)
            .await?;

        extract_macaroon(response).await
    }

    // -----------------------------------------------------------------------
    // Authorized requests
    // -----------------------------------------------------------------------

    /// Performs an authenticated request.
    ///
    /// Reads the stored credential and injects it as `Authorization:
    /// Macaroon <credential>`. Caller-supplied headers are preserved,
    /// except `Authorization`, which is always overwritten so callers
    /// cannot substitute their own credential.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method used for the request.
    /// * `url` - Absolute URL to request.
    /// * `params` - Query parameters to send along with the request.
    /// * `headers` - Headers to send along with the request.
    /// * `body` - Optional JSON body.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotLoggedIn`] when no credential is stored (no
    /// network call is made), otherwise the transport's errors
    /// unchanged.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        params: Option<&[(String, String)]>,
        headers: Option<HeaderMap>,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let credentials = self.auth.get_credentials()?;

        let mut headers = headers.unwrap_or_default();
        let value = HeaderValue::from_str(&format!("Macaroon {credentials}"))
            .map_err(|e| StoreError::Config(format!("stored credential is not header-safe: {e}")))?;
        headers.insert(AUTHORIZATION, value);

        self.transport
            .request(method, url, params, Some(headers), body)
            .await
    }

    /// Returns the identity bound to the current credential.
    pub async fn whoami(&self) -> Result<WhoAmi> {
        let url = self.url_for(self.endpoints.whoami());
        let response = self.request(Method::GET, &url, None, None, None).await?;

        response.json().await.map_err(|e| {
            StoreError::MalformedResponse(format!("whoami response is not valid JSON: {e}")).into()
        })
    }

    /// Clears the stored credentials.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotLoggedIn`] when no credential is stored.
    pub fn logout(&self) -> Result<()> {
        self.auth.del_credentials()
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }
}

/// Extracts the `macaroon` field from a token or exchange response.
async fn extract_macaroon(response: Response) -> Result<String> {
    let body: serde_json::Value = response.json().await.map_err(|e| {
        StoreError::MalformedResponse(format!("store response is not valid JSON: {e}"))
    })?;

    body.get("macaroon")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            StoreError::MalformedResponse("response missing `macaroon` field".to_string()).into()
        })
}
