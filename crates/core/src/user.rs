//! Session user record.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// The signed-in user.
///
/// This is the only record persisted between runs, serialized as JSON
/// (`{"id", "name", "email", "isAdmin"}`) under a single storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
}

impl User {
    /// A regular shopper with a freshly generated id.
    #[must_use]
    pub fn shopper(name: impl Into<String>, email: Email) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            email,
            is_admin: false,
        }
    }

    /// An administrator with a freshly generated id.
    #[must_use]
    pub fn admin(name: impl Into<String>, email: Email) -> Self {
        Self {
            id: UserId::generate_admin(),
            name: name.into(),
            email,
            is_admin: true,
        }
    }
}
