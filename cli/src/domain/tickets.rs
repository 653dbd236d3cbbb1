//! Tracker issues, ticket references in commit subjects, and report formatting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::error::ToolbeltError;

#[allow(clippy::expect_used)] // static pattern
static TICKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\d+)").expect("valid regex"));

/// An issue as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub subject: String,
    pub status: IssueStatus,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueStatus {
    pub name: String,
}

/// Ticket ids referenced as `#<digits>` in commit subjects.
///
/// Deduplicated; the order of first appearance is kept.
pub fn extract_ticket_ids<S: AsRef<str>>(subjects: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    subjects
        .iter()
        .flat_map(|s| {
            TICKET_RE
                .captures_iter(s.as_ref())
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect::<Vec<_>>()
        })
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Issues whose id was referenced, in tracker order.
#[must_use]
pub fn select_referenced(issues: Vec<Issue>, ids: &[String]) -> Vec<Issue> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    issues
        .into_iter()
        .filter(|issue| wanted.contains(issue.id.to_string().as_str()))
        .collect()
}

/// Link to an issue in the tracker web UI.
#[must_use]
pub fn issue_url(tracker_url: &str, id: u64) -> String {
    format!("{}/issues/{id}", tracker_url.trim_end_matches('/'))
}

/// How each reported issue is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Bare link.
    Url,
    /// `#id status`
    Status,
    /// `#id status link subject`
    Full,
    /// `#id subject`
    #[default]
    Subject,
}

impl ReportMode {
    /// Render one report line.
    #[must_use]
    pub fn format(self, issue: &Issue, tracker_url: &str) -> String {
        match self {
            Self::Url => issue_url(tracker_url, issue.id),
            Self::Status => format!("#{} {}", issue.id, issue.status.name),
            Self::Full => format!(
                "#{} {} {} {}",
                issue.id,
                issue.status.name,
                issue_url(tracker_url, issue.id),
                issue.subject
            ),
            Self::Subject => format!("#{} {}", issue.id, issue.subject),
        }
    }
}

/// Server-side filter for listing issues.
///
/// A saved query and a target version are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub query_id: Option<u32>,
    pub fixed_version_id: Option<u32>,
    pub project_id: Option<String>,
}

impl IssueFilter {
    /// # Errors
    ///
    /// Returns [`ToolbeltError::InvalidInput`] when both a saved query and a
    /// target version are given.
    pub fn validate(&self) -> Result<(), ToolbeltError> {
        if self.query_id.is_some() && self.fixed_version_id.is_some() {
            return Err(ToolbeltError::InvalidInput(
                "a saved query and a target version cannot be combined; pick one".to_string(),
            ));
        }
        Ok(())
    }

    /// Query parameters understood by the tracker.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.query_id {
            params.push(("query_id", id.to_string()));
        }
        if let Some(id) = self.fixed_version_id {
            params.push(("fixed_version_id", id.to_string()));
            params.push(("status_id", "*".to_string()));
        }
        if let Some(project) = &self.project_id {
            params.push(("project_id", project.clone()));
        }
        params
    }
}

/// Which issues the report is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSelection {
    /// Look each referenced id up directly.
    ByIds,
    /// List issues through a filter and intersect locally.
    Filter(IssueFilter),
}
