//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. It covers the
//! organization-level repository operations the publish pipeline needs:
//! lookup, listing, creation, deletion, and collaborator grants.
//!
//! # Authentication
//!
//! A personal access token is supplied at construction and sent as a
//! `Bearer` header with every request. The token needs `repo` scope for
//! creation and `delete_repo` scope when reprocessing.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! `ForgeError::RateLimited` when limits are hit and does not retry;
//! backing off is the caller's responsibility.
//!
//! # Example
//!
//! ```ignore
//! use rebrand::forge::github::GitHubForge;
//! use rebrand::forge::Forge;
//!
//! let forge = GitHubForge::new("ghp_xxx");
//! if forge.find_repo("bio-agents", "sample-agent").await?.is_none() {
//!     forge.create_repo("bio-agents", "sample-agent").await?;
//! }
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{Forge, ForgeError, Permission, Repo};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "rebrand-cli";

/// Page size for list requests (GitHub's maximum).
const PER_PAGE: u32 = 100;

/// GitHub forge implementation.
///
/// Implements the `Forge` trait for GitHub using the REST API.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge with a personal access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations, or to point the forge
    /// at a test server.
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token)).expect("Invalid token format"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, org: &str, name: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, org, name)
    }

    /// Build URL for an organization endpoint.
    fn org_url(&self, org: &str, path: &str) -> String {
        format!("{}/orgs/{}/{}", self.api_base, org, path)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // Extract permission headers before consuming the response body.
        // GitHub Apps use X-Accepted-GitHub-Permissions, classic OAuth uses
        // X-Accepted-OAuth-Scopes.
        let headers = response.headers();
        let required_permissions = headers
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let required_scopes = headers
            .get("X-Accepted-OAuth-Scopes")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let granted_scopes = headers
            .get("X-OAuth-Scopes")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Try to get error message from body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);

                // For GitHub Apps, show the fine-grained permissions required
                if let Some(perms) = required_permissions {
                    if !perms.is_empty() {
                        err_msg.push_str(&format!(" [required: {}]", perms));
                    }
                }
                // For classic OAuth, show scopes
                else if let Some(scopes) = required_scopes {
                    if !scopes.is_empty() {
                        err_msg.push_str(&format!(" [required scopes: {}]", scopes));
                        if let Some(granted) = granted_scopes {
                            err_msg.push_str(&format!(" [granted: {}]", granted));
                        }
                    }
                }

                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::UNPROCESSABLE_ENTITY => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn find_repo(&self, org: &str, name: &str) -> Result<Option<Repo>, ForgeError> {
        let url = self.repo_url(org, name);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        // Absence is an answer, not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let repo: GitHubRepo = self.handle_response(response).await?;
        Ok(Some(repo.into()))
    }

    async fn list_repos(&self, org: &str) -> Result<Vec<Repo>, ForgeError> {
        let mut all_repos: Vec<Repo> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!(
                "{}?per_page={}&page={}",
                self.org_url(org, "repos"),
                PER_PAGE,
                page
            );

            let response = self
                .client
                .get(&url)
                .headers(self.headers())
                .send()
                .await
                .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

            let page_repos: Vec<GitHubRepo> = self.handle_response(response).await?;
            let page_count = page_repos.len();

            all_repos.extend(page_repos.into_iter().map(Into::into));

            if page_count < PER_PAGE as usize {
                break;
            }
            page += 1;
        }

        Ok(all_repos)
    }

    async fn create_repo(&self, org: &str, name: &str) -> Result<Repo, ForgeError> {
        let url = self.org_url(org, "repos");
        let body = CreateRepoBody { name };

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let repo: GitHubRepo = self.handle_response(response).await?;
        Ok(repo.into())
    }

    async fn delete_repo(&self, org: &str, name: &str) -> Result<(), ForgeError> {
        let url = self.repo_url(org, name);

        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response, status).await
        }
    }

    async fn add_collaborator(
        &self,
        org: &str,
        repo: &str,
        account: &str,
        permission: Permission,
    ) -> Result<(), ForgeError> {
        let url = format!("{}/collaborators/{}", self.repo_url(org, repo), account);
        let body = AddCollaboratorBody {
            permission: permission.as_str(),
        };

        let response = self
            .client
            .put(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        // 201 when an invitation is created, 204 when access already exists.
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response, status).await
        }
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a repository.
#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
}

/// Request body for adding a collaborator.
#[derive(Serialize)]
struct AddCollaboratorBody<'a> {
    permission: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub repository response format (subset of the full payload).
#[derive(Deserialize)]
struct GitHubRepo {
    name: String,
    clone_url: String,
}

impl From<GitHubRepo> for Repo {
    fn from(repo: GitHubRepo) -> Self {
        Repo {
            name: repo.name,
            clone_url: repo.clone_url,
        }
    }
}
