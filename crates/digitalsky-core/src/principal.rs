use serde::{Deserialize, Serialize};

/// Role name granting access to the administrative endpoints.
pub const ROLE_ADMIN: &str = "ADMIN";

/// The authenticated caller on whose behalf a service operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(id: i64, username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            id,
            username: username.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Owners and administrators may read an application.
    pub fn can_read(&self, applicant_id: Option<i64>) -> bool {
        self.is_admin() || applicant_id == Some(self.id)
    }
}
