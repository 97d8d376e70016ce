//! Permission vocabulary for token requests
//!
//! Constants for the permission strings understood by the store. Using
//! these instead of hand-typed strings keeps login scopes in sync with
//! the store's vocabulary.
//!
//! Permissions are attenuations: each one narrows what the issued
//! credential is allowed to do.

/// Register or request a new package name in the store.
pub const ACCOUNT_REGISTER_PACKAGE: &str = "account-register-package";

/// List the packages owned by an account.
pub const ACCOUNT_VIEW_PACKAGES: &str = "account-view-packages";

/// Full management of a package.
pub const PACKAGE_MANAGE: &str = "package-manage";

/// Manage the access control list of a package.
pub const PACKAGE_MANAGE_ACL: &str = "package-manage-acl";

/// Edit package metadata.
pub const PACKAGE_MANAGE_METADATA: &str = "package-manage-metadata";

/// Release package revisions to channels.
pub const PACKAGE_MANAGE_RELEASES: &str = "package-manage-releases";

/// Upload new revisions of a package.
pub const PACKAGE_MANAGE_REVISIONS: &str = "package-manage-revisions";

/// Read-only access to a package.
pub const PACKAGE_VIEW: &str = "package-view";

/// View the access control list of a package.
pub const PACKAGE_VIEW_ACL: &str = "package-view-acl";

/// View package metadata.
pub const PACKAGE_VIEW_METADATA: &str = "package-view-metadata";

/// View package metrics.
pub const PACKAGE_VIEW_METRICS: &str = "package-view-metrics";

/// View the release history of a package.
pub const PACKAGE_VIEW_RELEASES: &str = "package-view-releases";

/// View the uploaded revisions of a package.
pub const PACKAGE_VIEW_REVISIONS: &str = "package-view-revisions";
