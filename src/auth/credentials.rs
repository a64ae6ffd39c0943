// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static credential record checked by the login endpoint.

use bcrypt::{hash, verify};

use crate::models::Identity;

/// ID of the built-in demo account.
pub const DEMO_USER_ID: &str = "u_1";
/// Name of the built-in demo account.
pub const DEMO_USER_NAME: &str = "demo";
/// Password of the built-in demo account.
pub const DEMO_USER_PASSWORD: &str = "password123";
/// bcrypt cost used for the demo account hash.
pub const DEMO_HASH_COST: u32 = 10;

/// Credential hashing errors.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct CredentialError(#[from] bcrypt::BcryptError);

/// A single account with a bcrypt password hash.
///
/// Immutable once built; shared read-only across requests.
#[derive(Clone)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    password_hash: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CredentialRecord {
    /// Build a record by hashing `password` with the given bcrypt cost.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        password: &str,
        cost: u32,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            password_hash: hash(password, cost)?,
        })
    }

    /// The built-in demo account (`demo` / `password123`).
    pub fn demo() -> Result<Self, CredentialError> {
        Self::new(DEMO_USER_ID, DEMO_USER_NAME, DEMO_USER_PASSWORD, DEMO_HASH_COST)
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Check a login attempt.
    ///
    /// The bcrypt comparison runs even when the name does not match, so a
    /// wrong name and a wrong password take the same time and produce the
    /// same answer.
    pub fn check(&self, name: &str, password: &str) -> Result<bool, CredentialError> {
        let password_ok = verify(password, &self.password_hash)?;
        let name_ok = name == self.name;
        Ok(name_ok & password_ok)
    }
}
