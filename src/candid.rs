//! Macaroon model and third-party caveat discharge
//!
//! A root macaroon issued by the store may embed third-party caveats:
//! restrictions that only an external discharge authority can clear by
//! issuing a proof ("discharge") per caveat. This module models the
//! serialized macaroon, enumerates its third-party caveats, resolves
//! each through a pluggable [`DischargeAcquirer`], and encodes the
//! resulting proofs into the transport form expected by the store's
//! token-exchange endpoint.
//!
//! The bundle encoding is security-sensitive: proofs are serialized in
//! resolution order, which matches caveat declaration order, and the
//! byte sequence must be reproducible. Reordering proofs produces a
//! different bundle that fails store-side signature verification.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Macaroon model
// ---------------------------------------------------------------------------

/// A single caveat embedded in a macaroon.
///
/// First-party caveats carry only `cid`. Third-party caveats also carry
/// a verification id (`vid`) and the location (`cl`) of the authority
/// that can discharge them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caveat {
    /// Caveat identifier, opaque to the client.
    pub cid: String,

    /// Verification id; present only on third-party caveats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vid: Option<String>,

    /// Location of the discharge authority for third-party caveats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cl: Option<String>,
}

impl Caveat {
    /// Whether this caveat needs a third-party discharge.
    pub fn is_third_party(&self) -> bool {
        self.vid.is_some()
    }

    /// The discharge authority location, if any.
    pub fn location(&self) -> Option<&str> {
        self.cl.as_deref()
    }
}

/// A serialized macaroon, as issued by the store or a discharge
/// authority.
///
/// The client never validates signatures; that is the store's job at
/// exchange time. The model exists so third-party caveats can be
/// enumerated and the proofs re-serialized canonically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macaroon {
    /// Location hint of the issuing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Macaroon identifier.
    pub identifier: String,

    /// Embedded caveats, in declaration order.
    #[serde(default)]
    pub caveats: Vec<Caveat>,

    /// Chained signature over identifier and caveats.
    pub signature: String,
}

impl Macaroon {
    /// Parses a macaroon from its serialized JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedResponse`]: a token response whose
    /// `macaroon` field does not parse indicates a protocol mismatch.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::MalformedResponse(format!("invalid macaroon: {e}")).into())
    }

    /// Third-party caveats in declaration order.
    pub fn third_party_caveats(&self) -> impl Iterator<Item = &Caveat> {
        self.caveats.iter().filter(|c| c.is_third_party())
    }
}

// ---------------------------------------------------------------------------
// DischargeAcquirer
// ---------------------------------------------------------------------------

/// Capability to resolve one third-party caveat into a discharge proof.
///
/// The resolution mechanism is the authority's business: it may be a
/// single headless HTTP call ([`CandidAcquirer`]) or an interactive flow
/// that suspends pending human approval. Implementations are injected
/// into the negotiation, so strategies can be swapped without touching
/// the login sequence.
#[async_trait]
pub trait DischargeAcquirer: Send + Sync {
    /// Resolves one caveat, returning the discharge proof macaroon.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Discharge`] when the authority is
    /// unreachable, denies the request, or returns an unusable proof.
    async fn acquire_discharge(&self, caveat: &Caveat) -> Result<Macaroon>;
}

/// Headless HTTP discharge acquirer.
///
/// POSTs the caveat id to the authority's discharge endpoint and expects
/// the proof in the `Macaroon` field of the JSON response.
pub struct CandidAcquirer {
    http: Arc<reqwest::Client>,
}

impl CandidAcquirer {
    /// Creates an acquirer over a shared HTTP client.
    pub fn new(http: Arc<reqwest::Client>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DischargeAcquirer for CandidAcquirer {
    async fn acquire_discharge(&self, caveat: &Caveat) -> Result<Macaroon> {
        let location = caveat.location().ok_or_else(|| {
            StoreError::Discharge("third-party caveat has no authority location".to_string())
        })?;

        let url = format!("{}/discharge", location.trim_end_matches('/'));
        let id64 = URL_SAFE_NO_PAD.encode(caveat.cid.as_bytes());

        tracing::debug!(authority = location, "requesting discharge");

        let response = self
            .http
            .post(&url)
            .form(&[("id64", id64.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Discharge(format!("authority unreachable: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::Discharge(format!(
                "authority returned {status}: {text}"
            ))
            .into());
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            StoreError::Discharge(format!("authority response is not valid JSON: {e}"))
        })?;

        let proof = body.get("Macaroon").ok_or_else(|| {
            StoreError::Discharge("missing `Macaroon` in discharge response".to_string())
        })?;

        serde_json::from_value(proof.clone())
            .map_err(|e| StoreError::Discharge(format!("unusable discharge proof: {e}")).into())
    }
}

// ---------------------------------------------------------------------------
// Discharge resolution and bundle encoding
// ---------------------------------------------------------------------------

/// Resolves every third-party caveat of `root`, in declaration order.
///
/// Round-trips to the authority are sequential; the returned proofs are
/// positionally aligned with the caveats that produced them. Any failed
/// caveat aborts the whole resolution; partial bundles are never built.
pub async fn discharge_all(
    root: &Macaroon,
    acquirer: &dyn DischargeAcquirer,
) -> Result<Vec<Macaroon>> {
    let mut proofs = Vec::new();
    for caveat in root.third_party_caveats() {
        let proof = acquirer.acquire_discharge(caveat).await?;
        proofs.push(proof);
    }

    tracing::debug!(discharges = proofs.len(), "resolved third-party caveats");
    Ok(proofs)
}

/// Encodes discharge proofs into the transport form for token exchange.
///
/// Proofs are serialized as a JSON array in the given order, UTF-8
/// encoded, then base64 URL-safe encoded. The step is not reorderable:
/// the store verifies signatures against the byte sequence.
pub fn encode_discharge_bundle(proofs: &[Macaroon]) -> Result<String> {
    let json = serde_json::to_string(proofs)
        .map_err(|e| StoreError::Discharge(format!("failed to serialize bundle: {e}")))?;
    Ok(URL_SAFE.encode(json.as_bytes()))
}
