//! Tracks the single logged in user.
//!
//! Login is a placeholder: any non-empty email/password pair is accepted.
//! There is no credential check and this is not a security boundary.

use crate::error::{Result, StoreError};
use crate::models::User;

#[derive(Debug, Default)]
pub struct SessionManager {
    current: Option<User>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs in and returns the new user, replacing any previous one.
    /// Fails without touching the session when either field is empty.
    pub fn try_login(&mut self, email: &str, password: &str) -> Result<&User> {
        if email.is_empty() || password.is_empty() {
            tracing::warn!("login rejected: empty email or password");
            return Err(StoreError::InvalidCredentials);
        }
        let user = User::from_email(email);
        tracing::info!(user = %user.name, "logged in");
        Ok(self.current.insert(user))
    }

    pub fn login(&mut self, email: &str, password: &str) -> bool {
        self.try_login(email, password).is_ok()
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current.take() {
            tracing::info!(user = %user.name, "logged out");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }
}
