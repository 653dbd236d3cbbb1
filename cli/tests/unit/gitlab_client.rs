//! GitLab client against a mock HTTP server.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use fct_cli::application::ports::{ProjectHost, RepositoryHost, ServiceClient};
use fct_cli::domain::config;
use fct_cli::domain::{AccessLevel, Created, Membership, Settings, ToolbeltError};
use fct_cli::infra::gitlab::GitLabClient;
use mockito::Matcher;
use serde_json::json;

fn client(url: &str) -> GitLabClient {
    GitLabClient::connect(&Settings::from_pairs([
        (config::GITLAB_URL, url),
        (config::GITLAB_TOKEN, "tok"),
    ]))
    .expect("connect")
}

fn users_query(email: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("search".into(), email.into()),
        Matcher::UrlEncoded("per_page".into(), "100".into()),
    ])
}

#[test]
fn test_connect_requires_token() {
    let err = GitLabClient::connect(&Settings::from_pairs([(config::GITLAB_URL, "https://git.example.com")]))
        .err()
        .expect("missing token");
    assert!(matches!(
        err.downcast_ref::<ToolbeltError>(),
        Some(ToolbeltError::Configuration { key, .. }) if key == config::GITLAB_TOKEN
    ));
}

#[test]
fn test_clone_and_web_urls_follow_host_and_namespace() {
    let gitlab = GitLabClient::connect(&Settings::from_pairs([
        (config::GITLAB_URL, "https://git.example.com/"),
        (config::GITLAB_TOKEN, "tok"),
        (config::GITLAB_NAMESPACE, "team"),
    ]))
    .expect("connect");

    assert_eq!(gitlab.clone_url("shop"), "git@git.example.com:team/shop.git");
    assert_eq!(gitlab.web_url("shop"), "https://git.example.com/team/shop");
}

#[test]
fn test_create_project_new() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v4/projects")
        .match_header("PRIVATE-TOKEN", "tok")
        .match_body(Matcher::PartialJson(json!({ "name": "Shop", "path": "shop" })))
        .with_status(201)
        .with_body(r#"{"id": 5, "path_with_namespace": "shop"}"#)
        .create();

    let created = client(&server.url())
        .create_project("shop", Some("Shop"))
        .expect("create");

    mock.assert();
    assert_eq!(created, Created::New("shop".to_string()));
}

#[test]
fn test_create_project_conflict_is_already_exists() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/v4/projects")
        .with_status(409)
        .with_body(r#"{"message": "conflict"}"#)
        .create();

    let created = client(&server.url()).create_project("shop", None).expect("create");

    assert_eq!(created, Created::AlreadyExists);
}

#[test]
fn test_create_project_path_taken_is_already_exists() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/v4/projects")
        .with_status(400)
        .with_body(r#"{"message": {"path": ["has already been taken"]}}"#)
        .create();

    let created = client(&server.url()).create_project("shop", None).expect("create");

    assert_eq!(created, Created::AlreadyExists);
}

#[test]
fn test_create_project_other_error_is_remote_service() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/v4/projects")
        .with_status(500)
        .with_body("boom\n  again")
        .create();

    let err = client(&server.url()).create_project("shop", None).expect_err("server error");

    match err.downcast_ref::<ToolbeltError>() {
        Some(ToolbeltError::RemoteService { service, status, body }) => {
            assert_eq!(*service, "GitLab");
            assert_eq!(*status, 500);
            assert_eq!(body, "boom again");
        }
        other => panic!("expected remote service error, got {other:?}"),
    }
}

#[test]
fn test_find_user_takes_first_exact_match() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v4/users")
        .match_query(users_query("dev@example.com"))
        .with_status(200)
        .with_body(
            json!([
                { "id": 1, "name": "Other", "email": "dev@example.com.au" },
                { "id": 7, "name": "Dev", "email": "dev@example.com" },
                { "id": 9, "name": "Dup", "email": "dev@example.com" }
            ])
            .to_string(),
        )
        .create();

    let user = client(&server.url())
        .find_user_by_email("dev@example.com")
        .expect("user");

    assert_eq!(user.id, 7);
}

#[test]
fn test_find_user_forbidden() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v4/users")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"message": "403 Forbidden"}"#)
        .create();

    let err = client(&server.url())
        .find_user_by_email("dev@example.com")
        .expect_err("forbidden");

    assert!(matches!(
        err.downcast_ref::<ToolbeltError>(),
        Some(ToolbeltError::Forbidden { service: "GitLab", .. })
    ));
}

#[test]
fn test_assign_member_to_missing_project_is_not_found() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v4/projects/shop/members")
        .with_status(404)
        .with_body(r#"{"message": "404 Project Not Found"}"#)
        .create();
    let users = server.mock("GET", "/api/v4/users").match_query(Matcher::Any).expect(0).create();

    let err = client(&server.url())
        .assign_member("shop", "dev@example.com", AccessLevel::Developer)
        .expect_err("missing project");

    users.assert();
    assert!(matches!(
        err.downcast_ref::<ToolbeltError>(),
        Some(ToolbeltError::NotFound(_))
    ));
}

#[test]
fn test_assign_member_posts_user_and_access_level() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v4/projects/shop/members")
        .with_status(200)
        .with_body("[]")
        .create();
    server
        .mock("GET", "/api/v4/users")
        .match_query(users_query("dev@example.com"))
        .with_status(200)
        .with_body(json!([{ "id": 7, "name": "Dev", "email": "dev@example.com" }]).to_string())
        .create();
    let add = server
        .mock("POST", "/api/v4/projects/shop/members")
        .match_body(Matcher::PartialJson(json!({ "user_id": 7, "access_level": 40 })))
        .with_status(201)
        .with_body("{}")
        .create();

    let membership = client(&server.url())
        .assign_member("shop", "dev@example.com", AccessLevel::Maintainer)
        .expect("assign");

    add.assert();
    assert_eq!(membership, Membership::Added);
}

#[test]
fn test_assign_member_refusal_is_not_added() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/v4/projects/shop/members")
        .with_status(200)
        .with_body("[]")
        .create();
    server
        .mock("GET", "/api/v4/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{ "id": 7, "name": "Dev", "email": "dev@example.com" }]).to_string())
        .create();
    server
        .mock("POST", "/api/v4/projects/shop/members")
        .with_status(409)
        .with_body(r#"{"message": "Member already exists"}"#)
        .create();

    let membership = client(&server.url())
        .assign_member("shop", "dev@example.com", AccessLevel::Developer)
        .expect("assign");

    assert!(matches!(membership, Membership::NotAdded(body) if body.contains("already exists")));
}

#[test]
fn test_unreachable_server_names_service() {
    let err = client("http://127.0.0.1:1")
        .create_project("shop", None)
        .expect_err("unreachable");

    assert!(format!("{err:#}").contains("cannot reach GitLab"));
}
