//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully.
//!
//! Existence lookups return `Option` rather than treating absence as an
//! error: the publish pipeline branches on whether the target repository
//! already exists, so a missing repository is a normal answer, not a
//! failure.
//!
//! # Example
//!
//! ```ignore
//! use rebrand::forge::{Forge, ForgeError};
//!
//! async fn ensure_absent(forge: &dyn Forge, org: &str, name: &str) -> Result<(), ForgeError> {
//!     if forge.find_repo(org, name).await?.is_some() {
//!         forge.delete_repo(org, name).await?;
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A repository on the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    /// Repository name (without the organization prefix)
    pub name: String,
    /// URL the repository can be cloned from (and pushed to)
    pub clone_url: String,
}

/// Collaborator permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Read-only access
    Pull,
    /// Read plus issue/PR triage
    Triage,
    /// Read and write access
    Push,
    /// Write plus repository management short of settings
    Maintain,
    /// Full administrative access
    Admin,
}

impl Permission {
    /// The permission name as the API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Pull => "pull",
            Permission::Triage => "triage",
            Permission::Push => "push",
            Permission::Maintain => "maintain",
            Permission::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The Forge trait for interacting with remote hosting services.
///
/// This is the abstraction layer for organization-level repository
/// management: the publish pipeline checks, creates, deletes, and grants
/// access through it, never through a concrete client.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthRequired` / `AuthFailed`: credentials missing or rejected
/// - `NotFound`: resource doesn't exist (lookups report this as `Ok(None)`)
/// - `RateLimited`: back off and retry
/// - `ApiError`: display error message to user
/// - `NetworkError`: check connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Look up a repository in an organization.
    ///
    /// # Returns
    ///
    /// `Some(Repo)` if it exists, `None` if it does not. Absence is not an
    /// error; only transport and authorization failures are.
    async fn find_repo(&self, org: &str, name: &str) -> Result<Option<Repo>, ForgeError>;

    /// List every repository in an organization.
    ///
    /// Pagination is handled internally; the full list is returned.
    async fn list_repos(&self, org: &str) -> Result<Vec<Repo>, ForgeError>;

    /// Create a repository in an organization.
    ///
    /// # Returns
    ///
    /// The created `Repo`, including the clone URL assigned by the host.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token lacks permission to create repositories
    /// - `ApiError` with status 422 if the name is taken or invalid
    async fn create_repo(&self, org: &str, name: &str) -> Result<Repo, ForgeError>;

    /// Delete a repository from an organization.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository doesn't exist
    /// - `AuthFailed` if the token lacks the delete scope
    async fn delete_repo(&self, org: &str, name: &str) -> Result<(), ForgeError>;

    /// Grant an account access to a repository.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository or account doesn't exist
    async fn add_collaborator(
        &self,
        org: &str,
        repo: &str,
        account: &str,
        permission: Permission,
    ) -> Result<(), ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_as_str() {
        assert_eq!(Permission::Pull.as_str(), "pull");
        assert_eq!(Permission::Triage.as_str(), "triage");
        assert_eq!(Permission::Push.as_str(), "push");
        assert_eq!(Permission::Maintain.as_str(), "maintain");
        assert_eq!(Permission::Admin.as_str(), "admin");
    }

    #[test]
    fn permission_display() {
        assert_eq!(format!("{}", Permission::Admin), "admin");
    }

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", ForgeError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("bio-agents/sample".into())),
            "not found: bio-agents/sample"
        );
        assert_eq!(format!("{}", ForgeError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "name already exists".into()
                }
            ),
            "API error: 422 - name already exists"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }
}
