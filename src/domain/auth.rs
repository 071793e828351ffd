use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};

/// Identity of the signed-in user as issued by the external auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject claim; the numeric user id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Parses the subject into a typed user id.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let raw = self
            .sub
            .trim()
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("user id: {}", self.sub)))?;
        UserId::new(raw)
    }

    pub fn has_role(&self, role: &str) -> bool {
        check_role(role, &self.roles)
    }
}

/// Returns `true` when `role` is present in `roles`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}
