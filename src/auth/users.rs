use super::password::{hash_password, verify_password};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// The part of a user that is safe to hand back to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Process-lifetime accounts keyed by email. Nothing is persisted.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, new_user: NewUser) -> Result<User> {
        if self.contains(&new_user.email)? {
            return Err(Error::EmailTaken {
                email: new_user.email,
            });
        }

        let user = User {
            password_hash: hash_password(&new_user.password)?,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
        };

        let mut users = self
            .users
            .write()
            .map_err(|e| Error::internal(format!("User store lock poisoned: {e}")))?;
        // Another signup may have won while we were hashing.
        if users.contains_key(&user.email) {
            return Err(Error::EmailTaken { email: user.email });
        }
        users.insert(user.email.clone(), user.clone());

        info!("Registered user: {}", user.email);
        Ok(user)
    }

    /// Returns the user only when the email exists and the password matches.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.get(email)? else {
            debug!("Login attempt for unknown email: {}", email);
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            debug!("Password mismatch for: {}", email);
            Ok(None)
        }
    }

    pub fn get(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| Error::internal(format!("User store lock poisoned: {e}")))?;
        Ok(users.get(email).cloned())
    }

    pub fn contains(&self, email: &str) -> Result<bool> {
        Ok(self.get(email)?.is_some())
    }

    pub fn len(&self) -> Result<usize> {
        let users = self
            .users
            .read()
            .map_err(|e| Error::internal(format!("User store lock poisoned: {e}")))?;
        Ok(users.len())
    }
}
