//! XZStore - store client with delegated macaroon authentication
//!
//! This library negotiates, stores, and uses a scoped, time-limited
//! bearer credential ("macaroon") issued by a package store whose
//! identity checks are delegated to a third-party discharge authority.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: The store client: login negotiation, authorized
//!   requests, who-am-i, and logout
//! - `candid`: Macaroon model, third-party caveat discharge, and
//!   bundle encoding
//! - `auth`: Credential persistence (OS keyring, in-memory, environment
//!   bootstrap)
//! - `transport`: HTTP transport with typed error translation
//! - `endpoints`: Endpoint catalog and token-request payload building
//! - `attenuations`: Permission vocabulary constants
//! - `models`: Typed response models
//! - `error`: Error types and result alias
//!
//! # Example
//!
//! ```no_run
//! use xzstore::{attenuations, Endpoints, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StoreClient::new(
//!         "https://api.store.example",
//!         Endpoints::package_store(),
//!         "example-app",
//!         "example-app/1.0",
//!         None,
//!     )?;
//!
//!     client
//!         .login(&[attenuations::PACKAGE_VIEW.to_string()], "docs example", "3600")
//!         .await?;
//!     println!("{:?}", client.whoami().await?);
//!     Ok(())
//! }
//! ```

pub mod attenuations;
pub mod auth;
pub mod candid;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

// Re-export commonly used types
pub use auth::{Auth, CredentialStore, KeyringStore, MemoryStore};
pub use candid::{CandidAcquirer, Caveat, DischargeAcquirer, Macaroon};
pub use client::StoreClient;
pub use endpoints::Endpoints;
pub use error::{Result, StoreError};
pub use models::{Account, WhoAmi};
pub use transport::HttpTransport;
