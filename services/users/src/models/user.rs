//! User model and related payloads

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User entity as persisted by a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub display_name: String,
    pub password: String,
}

/// New user creation payload
///
/// Every field is optional on the wire; presence is checked by
/// [`crate::validation::validate_new_user`].
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_name: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
}

impl NewUser {
    pub fn new(
        user_name: impl Into<String>,
        display_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user_name: Some(user_name.into()),
            display_name: Some(display_name.into()),
            password: Some(password.into()),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("user_name", &self.user_name)
            .field("display_name", &self.display_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A registration that passed presence validation, ready for a store
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedUser {
    pub user_name: String,
    pub display_name: String,
    pub password: String,
}

impl fmt::Debug for ValidatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedUser")
            .field("user_name", &self.user_name)
            .field("display_name", &self.display_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public view of a user; the password never leaves the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub display_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            display_name: user.display_name,
        }
    }
}
