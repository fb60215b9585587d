//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge`
//! trait for use in tests. It stores repositories in memory per
//! organization, records every call for verification, and allows
//! configuring failure scenarios.
//!
//! # Example
//!
//! ```
//! use rebrand::forge::mock::MockForge;
//! use rebrand::forge::Forge;
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//!
//! let repo = forge.create_repo("bio-agents", "sample-agent").await.unwrap();
//! assert_eq!(repo.name, "sample-agent");
//!
//! let found = forge.find_repo("bio-agents", "sample-agent").await.unwrap();
//! assert!(found.is_some());
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Forge, ForgeError, Permission, Repo};

/// Default base for fabricated clone URLs.
const DEFAULT_CLONE_URL_BASE: &str = "https://github.com";

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Stored repositories by organization, in insertion order.
    repos: HashMap<String, Vec<Repo>>,
    /// Base used when fabricating clone URLs for created repositories.
    clone_url_base: String,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail find_repo with the given error.
    FindRepo(ForgeError),
    /// Fail list_repos with the given error.
    ListRepos(ForgeError),
    /// Fail create_repo with the given error.
    CreateRepo(ForgeError),
    /// Fail delete_repo with the given error.
    DeleteRepo(ForgeError),
    /// Fail add_collaborator with the given error.
    AddCollaborator(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    FindRepo {
        org: String,
        name: String,
    },
    ListRepos {
        org: String,
    },
    CreateRepo {
        org: String,
        name: String,
    },
    DeleteRepo {
        org: String,
        name: String,
    },
    AddCollaborator {
        org: String,
        repo: String,
        account: String,
        permission: String,
    },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                repos: HashMap::new(),
                clone_url_base: DEFAULT_CLONE_URL_BASE.to_string(),
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Seed an organization with repositories, preserving list order.
    ///
    /// # Example
    ///
    /// ```
    /// use rebrand::forge::mock::MockForge;
    /// use rebrand::forge::Repo;
    ///
    /// let forge = MockForge::new().with_repos(
    ///     "bio-tools",
    ///     vec![Repo {
    ///         name: "SampleTool".to_string(),
    ///         clone_url: "https://github.com/bio-tools/SampleTool.git".to_string(),
    ///     }],
    /// );
    /// ```
    pub fn with_repos(self, org: impl Into<String>, repos: Vec<Repo>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.repos.insert(org.into(), repos);
        }
        self
    }

    /// Set the base used when fabricating clone URLs for created
    /// repositories. Pointing this at a local directory lets integration
    /// tests push to bare repositories on disk.
    pub fn with_clone_url_base(self, base: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.clone_url_base = base.into();
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use rebrand::forge::mock::{FailOn, MockForge};
    /// use rebrand::forge::ForgeError;
    ///
    /// let forge = MockForge::new().fail_on(FailOn::CreateRepo(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying the mock was called correctly.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Get an organization's repository names (for test verification).
    pub fn repo_names(&self, org: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .repos
            .get(org)
            .map(|repos| repos.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail<T>(&self, expected: &str) -> Option<Result<T, ForgeError>> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::FindRepo(e)) if expected == "find_repo" => Some(Err(e.clone())),
            Some(FailOn::ListRepos(e)) if expected == "list_repos" => Some(Err(e.clone())),
            Some(FailOn::CreateRepo(e)) if expected == "create_repo" => Some(Err(e.clone())),
            Some(FailOn::DeleteRepo(e)) if expected == "delete_repo" => Some(Err(e.clone())),
            Some(FailOn::AddCollaborator(e)) if expected == "add_collaborator" => {
                Some(Err(e.clone()))
            }
            _ => None,
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn find_repo(&self, org: &str, name: &str) -> Result<Option<Repo>, ForgeError> {
        self.record(MockOperation::FindRepo {
            org: org.to_string(),
            name: name.to_string(),
        });

        if let Some(result) = self.check_fail("find_repo") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        let repo = inner
            .repos
            .get(org)
            .and_then(|repos| repos.iter().find(|r| r.name == name))
            .cloned();
        Ok(repo)
    }

    async fn list_repos(&self, org: &str) -> Result<Vec<Repo>, ForgeError> {
        self.record(MockOperation::ListRepos {
            org: org.to_string(),
        });

        if let Some(result) = self.check_fail("list_repos") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.repos.get(org).cloned().unwrap_or_default())
    }

    async fn create_repo(&self, org: &str, name: &str) -> Result<Repo, ForgeError> {
        self.record(MockOperation::CreateRepo {
            org: org.to_string(),
            name: name.to_string(),
        });

        if let Some(result) = self.check_fail("create_repo") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        if inner
            .repos
            .get(org)
            .is_some_and(|repos| repos.iter().any(|r| r.name == name))
        {
            return Err(ForgeError::ApiError {
                status: 422,
                message: format!("name already exists on this account: {}", name),
            });
        }

        let repo = Repo {
            name: name.to_string(),
            clone_url: format!("{}/{}/{}.git", inner.clone_url_base, org, name),
        };
        inner
            .repos
            .entry(org.to_string())
            .or_default()
            .push(repo.clone());
        Ok(repo)
    }

    async fn delete_repo(&self, org: &str, name: &str) -> Result<(), ForgeError> {
        self.record(MockOperation::DeleteRepo {
            org: org.to_string(),
            name: name.to_string(),
        });

        if let Some(result) = self.check_fail::<()>("delete_repo") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        let repos = inner
            .repos
            .get_mut(org)
            .ok_or_else(|| ForgeError::NotFound(format!("{}/{}", org, name)))?;
        let before = repos.len();
        repos.retain(|r| r.name != name);
        if repos.len() == before {
            return Err(ForgeError::NotFound(format!("{}/{}", org, name)));
        }
        Ok(())
    }

    async fn add_collaborator(
        &self,
        org: &str,
        repo: &str,
        account: &str,
        permission: Permission,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::AddCollaborator {
            org: org.to_string(),
            repo: repo.to_string(),
            account: account.to_string(),
            permission: permission.as_str().to_string(),
        });

        if let Some(result) = self.check_fail::<()>("add_collaborator") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        let exists = inner
            .repos
            .get(org)
            .is_some_and(|repos| repos.iter().any(|r| r.name == repo));
        if !exists {
            return Err(ForgeError::NotFound(format!("{}/{}", org, repo)));
        }
        Ok(())
    }
}
