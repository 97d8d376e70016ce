//! Typed response models
//!
//! Only the who-am-i payload gets a typed view; every other response is
//! returned raw so callers parse what they need. Fields the store adds
//! over time are tolerated and ignored.

use serde::{Deserialize, Serialize};

/// Account section of the who-am-i payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub id: String,

    /// Display name shown by the store.
    #[serde(
        default,
        rename = "display-name",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,

    /// Account username, when the store exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Contact email, when the store exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Identity bound to the current credential, as reported by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmi {
    /// The account the credential belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,

    /// Permissions attached to the credential.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Expiry timestamp of the credential, as reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whoami_full_payload() {
        let raw = serde_json::json!({
            "account": {
                "id": "ubuntuone:1234",
                "display-name": "Jane Doe",
                "username": "jdoe",
                "email": "jdoe@example.com"
            },
            "permissions": ["package-manage"],
            "expires": "2026-09-01T00:00:00Z"
        });

        let whoami: WhoAmi = serde_json::from_value(raw).unwrap();
        let account = whoami.account.unwrap();
        assert_eq!(account.id, "ubuntuone:1234");
        assert_eq!(account.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(whoami.permissions, vec!["package-manage"]);
    }

    #[test]
    fn test_whoami_tolerates_unknown_and_missing_fields() {
        let raw = serde_json::json!({
            "account": { "id": "acc-1", "channels": null },
            "packages": null
        });

        let whoami: WhoAmi = serde_json::from_value(raw).unwrap();
        assert_eq!(whoami.account.unwrap().id, "acc-1");
        assert!(whoami.permissions.is_empty());
        assert!(whoami.expires.is_none());
    }
}
