//! Identity of whoever is logged in
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Placeholder id handed to every logged in user.
    pub const PLACEHOLDER_ID: &'static str = "1";

    /// Builds the session user from a login handle. The display name is the
    /// local part of the email (everything before the first `@`).
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default();
        Self {
            id: Self::PLACEHOLDER_ID.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}
