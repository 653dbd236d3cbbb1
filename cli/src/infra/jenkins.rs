//! Jenkins REST client: instantiate jobs from a template job.

use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::application::ports::{JobServer, ServiceClient};
use crate::domain::config::{self, Settings};
use crate::domain::template::{self, TemplateContext};
use crate::domain::{ToolbeltError, project};
use crate::infra::http::{self, Body};

pub struct JenkinsClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
    default_template: String,
}

/// CSRF protection token handed out by `crumbIssuer`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Crumb {
    crumb_request_field: String,
    crumb: String,
}

impl ServiceClient for JenkinsClient {
    const NAME: &'static str = "Jenkins";

    fn connect(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_url(config::JENKINS_URL)?.to_string();
        let login = settings.require(config::JENKINS_LOGIN)?;
        let password = settings.require(config::JENKINS_PASSWORD)?;
        Ok(Self {
            agent: http::agent(),
            base_url,
            authorization: format!("Basic {}", STANDARD.encode(format!("{login}:{password}"))),
            default_template: settings
                .get_or(config::JENKINS_TEMPLATE_JOB, config::DEFAULT_TEMPLATE_JOB)
                .to_string(),
        })
    }
}

impl JenkinsClient {
    /// Template job used when none is given on the command line.
    #[must_use]
    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// Browser URL of a job.
    #[must_use]
    pub fn job_url(&self, job: &str) -> String {
        format!("{}/job/{job}/", self.base_url)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{path}", self.base_url))
            .set("Authorization", &self.authorization)
    }

    /// POST with the CSRF crumb attached when the server issues one.
    fn post(&self, path: &str, crumb: Option<&Crumb>) -> ureq::Request {
        let request = self.request("POST", path);
        match crumb {
            Some(c) => request.set(&c.crumb_request_field, &c.crumb),
            None => request,
        }
    }

    fn crumb(&self) -> Result<Option<Crumb>> {
        let response = http::send(
            Self::NAME,
            self.request("GET", "/crumbIssuer/api/json"),
            Body::Empty,
        )?;
        if !response.is_success() {
            tracing::debug!(status = response.status, "no crumb issuer");
            return Ok(None);
        }
        Ok(Some(response.json(Self::NAME)?))
    }
}

impl JobServer for JenkinsClient {
    fn create_job(&self, template: &str, job: &str, context: &TemplateContext) -> Result<String> {
        project::validate_name("job name", job)?;
        project::validate_name("template job", template)?;
        let crumb = self.crumb()?;

        let copy = self
            .post("/createItem", crumb.as_ref())
            .query("name", job)
            .query("mode", "copy")
            .query("from", template);
        let response = http::send(Self::NAME, copy, Body::Empty)?;
        match response.status {
            400 | 404 => {
                return Err(ToolbeltError::NotFound(format!(
                    "Jenkins could not copy template job {template} to {job}: {}",
                    response.body.lines().next().unwrap_or("no such job").trim()
                ))
                .into());
            }
            _ => {
                response.ok_or_remote(Self::NAME)?;
            }
        }

        let config_path = format!("/job/{job}/config.xml");
        let config_xml = http::send(Self::NAME, self.request("GET", &config_path), Body::Empty)?
            .ok_or_remote(Self::NAME)?
            .body;
        let rendered = template::substitute(&config_xml, context);
        http::send(
            Self::NAME,
            self.post(&config_path, crumb.as_ref()),
            Body::Xml(&rendered),
        )?
        .ok_or_remote(Self::NAME)?;

        for action in ["enable", "build"] {
            http::send(
                Self::NAME,
                self.post(&format!("/job/{job}/{action}"), crumb.as_ref()),
                Body::Empty,
            )?
            .ok_or_remote(Self::NAME)?;
        }

        Ok(self.job_url(job))
    }
}
