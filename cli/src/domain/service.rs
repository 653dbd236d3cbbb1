//! Outcomes and records shared by the external-service clients.

use serde::Deserialize;

/// Result of a create call that tolerates the target already existing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created<T> {
    /// Freshly created; carries the service's canonical identifier/path.
    New(T),
    /// The target was already there. Informational only.
    AlreadyExists,
}

impl<T> Created<T> {
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// Result of adding a member to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Membership {
    Added,
    /// The service declined, most likely because the user is already a
    /// member. Carries the response body for the warning.
    NotAdded(String),
}

/// A user account on GitLab or Redmine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(alias = "mail", default)]
    pub email: String,
}

/// First user whose email matches exactly. Duplicates: the first one wins.
#[must_use]
pub fn first_with_email(users: Vec<RemoteUser>, email: &str) -> Option<RemoteUser> {
    users.into_iter().find(|u| u.email == email)
}

/// GitLab project access levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessLevel {
    Guest,
    Reporter,
    #[default]
    Developer,
    Maintainer,
}

impl AccessLevel {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Guest => 10,
            Self::Reporter => 20,
            Self::Developer => 30,
            Self::Maintainer => 40,
        }
    }
}
