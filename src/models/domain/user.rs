use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// Actions gated by role. Only regular users take quizzes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    TakeQuiz,
}

impl UserRole {
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            UserRole::Admin => &[],
            UserRole::User => &[Capability::TakeQuiz],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Identity as issued by the external identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn new(id: &str, username: &str, email: &str, role: UserRole) -> Self {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_cannot_take_quizzes() {
        assert!(!UserRole::Admin.can(Capability::TakeQuiz));
        assert!(UserRole::User.can(Capability::TakeQuiz));
    }

    #[test]
    fn role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","username":"jane","email":"jane@example.com"}"#)
                .unwrap();
        assert_eq!(user.role, UserRole::User);
    }
}
