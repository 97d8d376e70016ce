//! Credential persistence via OS keyring
//!
//! This module provides storage and retrieval of the store-authorized
//! credential using the operating system's native credential store
//! (Keychain on macOS, Secret Service on Linux, Windows Credential
//! Manager on Windows).
//!
//! Storage is a keyed capability: one record per (application name,
//! store host) pair, exposed through the [`CredentialStore`] trait so
//! alternative backends can be substituted: [`MemoryStore`] for tests
//! and CI, or anything implementing get/set/delete with same-process
//! read-after-write consistency.
//!
//! [`Auth`] coordinates a chosen backend: it base64-wraps the opaque
//! credential before storage and maps an absent record to
//! [`StoreError::NotLoggedIn`].

use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// Keyed storage capability for a single credential record.
///
/// Implementations hold the record key internally; the trait only moves
/// the opaque value. `delete` reports whether a record actually existed
/// so callers can distinguish a cleanup from a no-op.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored value, or `None` when no record exists.
    fn get(&self) -> Result<Option<String>>;

    /// Writes the value, overwriting any existing record.
    fn set(&self, value: &str) -> Result<()>;

    /// Removes the record. Returns `true` when a record was removed,
    /// `false` when none existed.
    fn delete(&self) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// KeyringStore
// ---------------------------------------------------------------------------

/// [`CredentialStore`] backed by the OS native keyring.
///
/// The keyring service is the application name and the account is the
/// store host, so each application keeps one credential per store.
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    /// Creates a store for the given application and store host.
    pub fn new(application_name: &str, host: &str) -> Self {
        Self {
            service: application_name.to_string(),
            account: host.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, &self.account)
            .map_err(StoreError::Keyring)
            .map_err(Into::into)
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keyring(e).into()),
        }
    }

    fn set(&self, value: &str) -> Result<()> {
        self.entry()?
            .set_password(value)
            .map_err(StoreError::Keyring)?;
        Ok(())
    }

    fn delete(&self) -> Result<bool> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(StoreError::Keyring(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`CredentialStore`] for tests and keyring-less environments.
#[derive(Default)]
pub struct MemoryStore {
    value: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a value.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value.lock().expect("credential store lock poisoned").clone())
    }

    fn set(&self, value: &str) -> Result<()> {
        *self.value.lock().expect("credential store lock poisoned") = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<bool> {
        Ok(self
            .value
            .lock()
            .expect("credential store lock poisoned")
            .take()
            .is_some())
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Credential coordinator for one (application, store host) pair.
///
/// Values are base64-wrapped before hitting the backend so the stored
/// record survives backends that are picky about payload bytes. The
/// credential itself stays opaque; it is never inspected.
///
/// # Examples
///
/// ```no_run
/// use xzstore::auth::Auth;
///
/// # fn example() -> xzstore::Result<()> {
/// let auth = Auth::new("example-app", "api.store.example", None)?;
/// auth.set_credentials("opaque-credential")?;
/// assert_eq!(auth.get_credentials()?, "opaque-credential");
/// auth.del_credentials()?;
/// # Ok(())
/// # }
/// ```
pub struct Auth {
    store: Box<dyn CredentialStore>,
}

impl Auth {
    /// Creates the default keyring-backed coordinator.
    ///
    /// When `environment_auth` names an environment variable and that
    /// variable is set, its value (a previously exported base64 record)
    /// seeds an in-memory store instead, useful in CI where no keyring
    /// is available.
    ///
    /// # Arguments
    ///
    /// * `application_name` - Keyring service name.
    /// * `host` - Store host, the account half of the record key.
    /// * `environment_auth` - Optional name of a bootstrap variable.
    pub fn new(application_name: &str, host: &str, environment_auth: Option<&str>) -> Result<Self> {
        if let Some(var) = environment_auth {
            if let Ok(value) = std::env::var(var) {
                tracing::debug!(variable = var, "seeding credentials from environment");
                return Ok(Self {
                    store: Box::new(MemoryStore::with_value(&value)),
                });
            }
        }

        Ok(Self {
            store: Box::new(KeyringStore::new(application_name, host)),
        })
    }

    /// Creates a coordinator over an explicit backend.
    pub fn with_store(store: Box<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Persists the authorized credential, overwriting any previous one.
    pub fn set_credentials(&self, credentials: &str) -> Result<()> {
        self.store.set(&BASE64.encode(credentials))?;
        tracing::debug!("credentials stored");
        Ok(())
    }

    /// Returns the stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotLoggedIn`] when no record exists. A
    /// record that cannot be decoded is reported the same way (the
    /// caller cannot use it either way); a warning is logged so the two
    /// cases can be told apart in logs.
    pub fn get_credentials(&self) -> Result<String> {
        let encoded = self.store.get()?.ok_or(StoreError::NotLoggedIn)?;

        let decoded = BASE64
            .decode(encoded.as_bytes())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok());

        match decoded {
            Some(credentials) => Ok(credentials),
            None => {
                tracing::warn!("stored credentials are not valid base64; treating as logged out");
                Err(StoreError::NotLoggedIn.into())
            }
        }
    }

    /// Erases the stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotLoggedIn`] when no record exists; logout
    /// is deliberately not idempotent-safe.
    pub fn del_credentials(&self) -> Result<()> {
        if self.store.delete()? {
            tracing::debug!("credentials erased");
            Ok(())
        } else {
            Err(StoreError::NotLoggedIn.into())
        }
    }
}
