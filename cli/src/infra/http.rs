//! Blocking HTTP plumbing shared by the REST clients.
//!
//! ureq reports 4xx/5xx as errors; here they come back as ordinary
//! responses so each client can map statuses to its own outcomes. Only
//! transport failures are errors.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::domain::ToolbeltError;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Agent with the toolbelt's timeouts. It keeps cookies, so a Jenkins crumb
/// travels with the session it was issued for.
#[must_use]
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("fct/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Request payload.
pub enum Body<'a> {
    Empty,
    Json(serde_json::Value),
    Xml(&'a str),
}

/// Status and body text of a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body.
    ///
    /// # Errors
    ///
    /// Fails if the body is not the expected JSON.
    pub fn json<T: DeserializeOwned>(&self, service: &'static str) -> Result<T> {
        serde_json::from_str(&self.body)
            .with_context(|| format!("unexpected response from {service}"))
    }

    /// `self` if 2xx, otherwise a `RemoteService` error carrying the body.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ok_or_remote(self, service: &'static str) -> Result<Self, ToolbeltError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ToolbeltError::remote_service(service, self.status, &self.body))
        }
    }
}

/// Send `request` with `body` and collect the response.
///
/// # Errors
///
/// Fails when the server cannot be reached or the body cannot be read.
pub fn send(service: &'static str, request: ureq::Request, body: Body<'_>) -> Result<HttpResponse> {
    let method = request.method().to_string();
    let url = request.url().to_string();
    let result = match body {
        Body::Empty => request.call(),
        Body::Json(value) => request.send_json(value),
        Body::Xml(text) => request
            .set("Content-Type", "application/xml")
            .send_string(text),
    };
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(transport)) => {
            return Err(anyhow::Error::new(transport)
                .context(format!("cannot reach {service} at {url}")));
        }
    };
    let status = response.status();
    let body = response
        .into_string()
        .with_context(|| format!("cannot read {service} response"))?;
    tracing::debug!(service, %method, %url, status, "http");
    Ok(HttpResponse { status, body })
}
