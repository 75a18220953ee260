//! User entity - a workspace member synced from Slack

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    Member,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "",
            Self::Admin => "admin",
        }
    }
}

impl From<&str> for UserRole {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Member
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub real_name: String,
    pub role: UserRole,
    pub tz: String,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A member as reported by the workspace directory (`users.list`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub user_id: String,
    pub user_name: String,
    pub real_name: String,
    pub tz: String,
    pub is_admin: bool,
    pub is_owner: bool,
    pub is_bot: bool,
    pub deleted: bool,
}

impl WorkspaceMember {
    /// Convert into a user row for `team_id`
    pub fn into_user(self, team_id: &str) -> User {
        let role = if self.is_admin || self.is_owner {
            UserRole::Admin
        } else {
            UserRole::Member
        };
        User {
            id: 0,
            team_id: team_id.to_string(),
            user_id: self.user_id,
            user_name: self.user_name,
            real_name: self.real_name,
            role,
            tz: self.tz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_becomes_admin() {
        let member = WorkspaceMember {
            user_id: "U1".to_string(),
            is_owner: true,
            ..Default::default()
        };
        let user = member.into_user("T1");
        assert!(user.is_admin());
        assert_eq!(user.team_id, "T1");
    }

    #[test]
    fn test_role_storage() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from(""), UserRole::Member);
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }
}
