// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Demo-account login and bearer-token verification.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{name, password}` to `/api/auth/login`
//! 2. The credential record checks the password against its bcrypt hash
//! 3. The token service signs `{sub, name, iat, exp}` with `JWT_SECRET`
//! 4. Client sends `Authorization: Bearer <token>` to protected routes
//! 5. The auth gate verifies the token against `NEXTAUTH_SECRET`, then
//!    `JWT_SECRET`, and attaches the decoded identity to the request
//!
//! ## Security
//!
//! - Login failures do not reveal whether the name or the password was wrong
//! - Missing secrets are reported as server faults, never as 401s
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod token;

pub use claims::TokenClaims;
pub use credentials::CredentialRecord;
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::{TokenConfig, TokenError, TokenService};
