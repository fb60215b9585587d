//! Integration tests for the GitHub forge against a local mock server.
//!
//! Every test stands up a wiremock server, points the forge at it, and
//! verifies request shape and response handling. No real GitHub traffic.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rebrand::forge::{Forge, ForgeError, GitHubForge, Permission};

fn forge(server: &MockServer) -> GitHubForge {
    GitHubForge::with_api_base("test-token", server.uri())
}

fn repo_payload(name: &str) -> serde_json::Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("bio-agents/{}", name),
        "private": false,
        "clone_url": format!("https://github.com/bio-agents/{}.git", name),
    })
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn find_repo_parses_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_payload("sample-agent")))
        .mount(&server)
        .await;

    let repo = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(repo.name, "sample-agent");
    assert_eq!(
        repo.clone_url,
        "https://github.com/bio-agents/sample-agent.git"
    );
}

#[tokio::test]
async fn find_repo_treats_404_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let found = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn requests_carry_auth_and_version_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_payload("sample-agent")))
        .expect(1)
        .mount(&server)
        .await;

    let found = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap();
    assert!(found.is_some());
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn list_repos_follows_pagination() {
    let server = MockServer::start().await;

    // A full first page means there might be more.
    let page1: Vec<_> = (0..100).map(|i| repo_payload(&format!("repo-{}", i))).collect();
    Mock::given(method("GET"))
        .and(path("/orgs/bio-tools/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(page1)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/bio-tools/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_payload("repo-100")])))
        .mount(&server)
        .await;

    let repos = forge(&server).list_repos("bio-tools").await.unwrap();

    assert_eq!(repos.len(), 101);
    assert_eq!(repos[0].name, "repo-0");
    assert_eq!(repos[100].name, "repo-100");
}

#[tokio::test]
async fn list_repos_stops_after_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/bio-tools/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_payload("SampleTool"),
            repo_payload("OtherTool"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = forge(&server).list_repos("bio-tools").await.unwrap();
    assert_eq!(repos.len(), 2);
}

// =============================================================================
// Creation and Deletion
// =============================================================================

#[tokio::test]
async fn create_repo_posts_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orgs/bio-agents/repos"))
        .and(body_json(json!({"name": "sample-agent"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_payload("sample-agent")))
        .expect(1)
        .mount(&server)
        .await;

    let repo = forge(&server)
        .create_repo("bio-agents", "sample-agent")
        .await
        .unwrap();
    assert_eq!(
        repo.clone_url,
        "https://github.com/bio-agents/sample-agent.git"
    );
}

#[tokio::test]
async fn create_repo_name_taken_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orgs/bio-agents/repos"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "name already exists on this account"})),
        )
        .mount(&server)
        .await;

    let err = forge(&server)
        .create_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();

    match err {
        ForgeError::ApiError { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("already exists"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn delete_repo_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    forge(&server)
        .delete_repo("bio-agents", "sample-agent")
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_missing_repo_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = forge(&server)
        .delete_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::NotFound(_)));
}

// =============================================================================
// Collaborators
// =============================================================================

#[tokio::test]
async fn add_collaborator_sends_admin_permission() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/bio-agents/sample-agent/collaborators/octocat"))
        .and(body_json(json!({"permission": "admin"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    forge(&server)
        .add_collaborator("bio-agents", "sample-agent", "octocat", Permission::Admin)
        .await
        .unwrap();
}

#[tokio::test]
async fn add_collaborator_accepts_no_content() {
    // 204 means the account already had access.
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/bio-agents/sample-agent/collaborators/octocat"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    forge(&server)
        .add_collaborator("bio-agents", "sample-agent", "octocat", Permission::Push)
        .await
        .unwrap();
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn bad_credentials_fail_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let err = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::AuthFailed(_)));
}

#[tokio::test]
async fn forbidden_reports_required_permissions() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("X-Accepted-GitHub-Permissions", "administration=write")
                .set_body_json(json!({"message": "Must have admin rights to Repository."})),
        )
        .mount(&server)
        .await;

    let err = forge(&server)
        .delete_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();

    match err {
        ForgeError::AuthFailed(message) => {
            assert!(message.contains("administration=write"));
        }
        other => panic!("expected AuthFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let err = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::RateLimited));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/bio-agents/sample-agent"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let err = forge(&server)
        .find_repo("bio-agents", "sample-agent")
        .await
        .unwrap_err();

    match err {
        ForgeError::ApiError { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}
