//! Redmine REST client.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{IssueTracker, ProjectHost, ServiceClient};
use crate::domain::config::{self, Settings};
use crate::domain::service::first_with_email;
use crate::domain::{Created, Issue, IssueFilter, Membership, RemoteUser, ToolbeltError};
use crate::infra::http::{self, Body};

/// Issues fetched per page.
pub const PAGE_SIZE: u32 = 100;

pub struct RedmineClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct IssuePage {
    issues: Vec<Issue>,
    total_count: u32,
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<RemoteUser>,
}

impl ServiceClient for RedmineClient {
    const NAME: &'static str = "Redmine";

    fn connect(settings: &Settings) -> Result<Self> {
        Ok(Self {
            agent: http::agent(),
            base_url: settings.require_url(config::REDMINE_URL)?.to_string(),
            api_key: settings.require(config::REDMINE_API_KEY)?.to_string(),
        })
    }
}

impl RedmineClient {
    /// Role granted by `fct tracker assign`.
    ///
    /// # Errors
    ///
    /// Fails if `REDMINE_DEVELOPER_ROLE_ID` is unset or not a number.
    pub fn developer_role(settings: &Settings) -> Result<u32> {
        let raw = settings.require(config::REDMINE_DEVELOPER_ROLE_ID)?;
        raw.parse().map_err(|_| {
            ToolbeltError::InvalidInput(format!(
                "{} must be a numeric role id, got '{raw}'",
                config::REDMINE_DEVELOPER_ROLE_ID
            ))
            .into()
        })
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{path}", self.base_url))
            .set("X-Redmine-API-Key", &self.api_key)
    }

    /// Every page of `/issues.json` for `params`.
    ///
    /// Walks offsets by `PAGE_SIZE` while `offset + limit < total_count`,
    /// taking the total from the latest page. An empty page ends the walk.
    fn paginate(&self, params: &[(&str, String)]) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let mut offset = 0;
        loop {
            let mut request = self
                .request("GET", "/issues.json")
                .query("limit", &PAGE_SIZE.to_string())
                .query("offset", &offset.to_string());
            for (key, value) in params {
                request = request.query(key, value);
            }
            let page: IssuePage = http::send(Self::NAME, request, Body::Empty)?
                .ok_or_remote(Self::NAME)?
                .json(Self::NAME)?;
            tracing::debug!(offset, fetched = page.issues.len(), total = page.total_count, "issue page");

            if page.issues.is_empty() {
                break;
            }
            issues.extend(page.issues);
            if offset + PAGE_SIZE >= page.total_count {
                break;
            }
            offset += PAGE_SIZE;
        }
        Ok(issues)
    }
}

impl ProjectHost for RedmineClient {
    type Role = u32;

    fn create_project(&self, slug: &str, name: Option<&str>) -> Result<Created<String>> {
        let payload = json!({
            "project": { "name": name.unwrap_or(slug), "identifier": slug }
        });
        let response = http::send(
            Self::NAME,
            self.request("POST", "/projects.json"),
            Body::Json(payload),
        )?;
        match response.status {
            201 => Ok(Created::New(slug.to_string())),
            409 | 422 => Ok(Created::AlreadyExists),
            status => Err(ToolbeltError::remote_service(Self::NAME, status, &response.body).into()),
        }
    }

    fn find_user_by_email(&self, email: &str) -> Result<RemoteUser> {
        let request = self
            .request("GET", "/users.json")
            .query("limit", &PAGE_SIZE.to_string());
        let response = http::send(Self::NAME, request, Body::Empty)?;
        if response.status == 403 {
            return Err(ToolbeltError::Forbidden {
                service: Self::NAME,
                hint: "admin permissions required to list users".to_string(),
            }
            .into());
        }
        let list: UserList = response.ok_or_remote(Self::NAME)?.json(Self::NAME)?;
        first_with_email(list.users, email)
            .ok_or_else(|| ToolbeltError::NotFound(format!("no Redmine user with email {email}")).into())
    }

    fn assign_member(&self, slug: &str, email: &str, role: u32) -> Result<Membership> {
        let path = format!("/projects/{slug}/memberships.json");

        let probe = http::send(Self::NAME, self.request("GET", &path), Body::Empty)?;
        if probe.status == 404 {
            return Err(ToolbeltError::NotFound(format!("Redmine project {slug} not found")).into());
        }
        probe.ok_or_remote(Self::NAME)?;

        let user = self.find_user_by_email(email)?;
        let payload = json!({
            "membership": { "user_id": user.id, "role_ids": [role] }
        });
        let response = http::send(Self::NAME, self.request("POST", &path), Body::Json(payload))?;
        if response.status == 201 {
            Ok(Membership::Added)
        } else {
            tracing::warn!(status = response.status, body = %response.body, "membership not added");
            Ok(Membership::NotAdded(response.body))
        }
    }
}

impl IssueTracker for RedmineClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        filter.validate()?;
        self.paginate(&filter.params())
            .context("cannot list Redmine issues")
    }

    fn issues_by_ids(&self, ids: &[String]) -> Result<Vec<Issue>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.paginate(&[("issue_id", ids.join(",")), ("status_id", "*".to_string())])
            .context("cannot fetch Redmine issues")
    }
}
