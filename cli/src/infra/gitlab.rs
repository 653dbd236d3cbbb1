//! GitLab REST client (API v4).

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ProjectHost, RepositoryHost, ServiceClient};
use crate::domain::config::{self, Settings};
use crate::domain::service::first_with_email;
use crate::domain::{AccessLevel, Created, Membership, RemoteUser, ToolbeltError, project};
use crate::infra::http::{self, Body};

pub struct GitLabClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    namespace: Option<String>,
    git_host: String,
}

#[derive(Deserialize)]
struct CreatedProject {
    path_with_namespace: String,
}

#[derive(Deserialize)]
struct Namespace {
    id: u64,
}

impl ServiceClient for GitLabClient {
    const NAME: &'static str = "GitLab";

    fn connect(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_url(config::GITLAB_URL)?.to_string();
        let token = settings.require(config::GITLAB_TOKEN)?.to_string();
        let parsed = url::Url::parse(&base_url)
            .with_context(|| format!("{} is not a valid URL: {base_url}", config::GITLAB_URL))?;
        let git_host = parsed
            .host_str()
            .ok_or_else(|| {
                ToolbeltError::InvalidInput(format!("{} has no host: {base_url}", config::GITLAB_URL))
            })?
            .to_string();
        Ok(Self {
            agent: http::agent(),
            base_url,
            token,
            namespace: settings
                .get(config::GITLAB_NAMESPACE)
                .map(|ns| ns.trim_matches('/').to_string()),
            git_host,
        })
    }
}

impl GitLabClient {
    fn api(&self, path: &str) -> String {
        format!("{}/api/v4{path}", self.base_url)
    }

    fn get(&self, path: &str) -> ureq::Request {
        self.agent.get(&self.api(path)).set("PRIVATE-TOKEN", &self.token)
    }

    fn post(&self, path: &str) -> ureq::Request {
        self.agent.post(&self.api(path)).set("PRIVATE-TOKEN", &self.token)
    }

    /// `namespace/slug`, or just `slug`.
    fn full_path(&self, slug: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}/{slug}"),
            None => slug.to_string(),
        }
    }

    /// Project id usable in `/projects/:id` URLs.
    fn project_id(&self, slug: &str) -> String {
        url::form_urlencoded::byte_serialize(self.full_path(slug).as_bytes()).collect()
    }

    fn namespace_id(&self, namespace: &str) -> Result<u64> {
        let encoded: String = url::form_urlencoded::byte_serialize(namespace.as_bytes()).collect();
        let response = http::send(Self::NAME, self.get(&format!("/namespaces/{encoded}")), Body::Empty)?;
        if response.status == 404 {
            return Err(ToolbeltError::NotFound(format!("GitLab namespace {namespace} not found")).into());
        }
        Ok(response.ok_or_remote(Self::NAME)?.json::<Namespace>(Self::NAME)?.id)
    }
}

/// GitLab answers a duplicate path with 400 and this phrase.
fn already_taken(body: &str) -> bool {
    body.contains("has already been taken")
}

impl ProjectHost for GitLabClient {
    type Role = AccessLevel;

    fn create_project(&self, slug: &str, name: Option<&str>) -> Result<Created<String>> {
        let mut payload = json!({
            "name": name.unwrap_or(slug),
            "path": slug,
        });
        if let Some(ns) = &self.namespace {
            payload["namespace_id"] = json!(self.namespace_id(ns)?);
        }
        let response = http::send(Self::NAME, self.post("/projects"), Body::Json(payload))?;
        match response.status {
            201 => {
                let path = response
                    .json::<CreatedProject>(Self::NAME)
                    .map_or_else(|_| self.full_path(slug), |p| p.path_with_namespace);
                Ok(Created::New(path))
            }
            409 | 422 => Ok(Created::AlreadyExists),
            400 if already_taken(&response.body) => Ok(Created::AlreadyExists),
            status => Err(ToolbeltError::remote_service(Self::NAME, status, &response.body).into()),
        }
    }

    fn find_user_by_email(&self, email: &str) -> Result<RemoteUser> {
        let request = self.get("/users").query("search", email).query("per_page", "100");
        let response = http::send(Self::NAME, request, Body::Empty)?;
        if response.status == 403 {
            return Err(ToolbeltError::Forbidden {
                service: Self::NAME,
                hint: "admin permissions required to look users up by email".to_string(),
            }
            .into());
        }
        let users: Vec<RemoteUser> = response.ok_or_remote(Self::NAME)?.json(Self::NAME)?;
        first_with_email(users, email)
            .ok_or_else(|| ToolbeltError::NotFound(format!("no GitLab user with email {email}")).into())
    }

    fn assign_member(&self, slug: &str, email: &str, role: AccessLevel) -> Result<Membership> {
        let members_path = format!("/projects/{}/members", self.project_id(slug));

        let probe = http::send(Self::NAME, self.get(&members_path), Body::Empty)?;
        if probe.status == 404 {
            return Err(ToolbeltError::NotFound(format!(
                "GitLab project {} not found",
                self.full_path(slug)
            ))
            .into());
        }
        probe.ok_or_remote(Self::NAME)?;

        let user = self.find_user_by_email(email)?;
        let payload = json!({ "user_id": user.id, "access_level": role.code() });
        let response = http::send(Self::NAME, self.post(&members_path), Body::Json(payload))?;
        if response.status == 201 {
            Ok(Membership::Added)
        } else {
            tracing::warn!(status = response.status, body = %response.body, "member not added");
            Ok(Membership::NotAdded(response.body))
        }
    }
}

impl RepositoryHost for GitLabClient {
    fn clone_url(&self, slug: &str) -> String {
        project::repo_url(&self.git_host, self.namespace.as_deref(), slug)
    }

    fn web_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, self.full_path(slug))
    }
}
