use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Staff,
    Student,
}

impl UserRole {
    /// Staff and admins author course and exam content.
    pub(crate) fn can_author(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "attemptstatus", rename_all = "snake_case")]
pub(crate) enum AttemptStatus {
    InProgress,
    Submitted,
}

impl AttemptStatus {
    pub(crate) fn is_submitted(self) -> bool {
        matches!(self, Self::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_status_serializes_snake_case() {
        assert_eq!(serde_json::to_value(AttemptStatus::InProgress).unwrap(), "in_progress");
        assert_eq!(serde_json::to_value(AttemptStatus::Submitted).unwrap(), "submitted");
    }

    #[test]
    fn only_staff_and_admin_author() {
        assert!(UserRole::Admin.can_author());
        assert!(UserRole::Staff.can_author());
        assert!(!UserRole::Student.can_author());
    }
}
