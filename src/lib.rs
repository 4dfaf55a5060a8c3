//! edutraq-auth - session authentication service for the EduTraq portals
//!
//! This crate provides the login/session/route-guard flow behind the admin
//! and student portals:
//! - Credential verification against an embedded account directory
//!   (Argon2-hashed secrets)
//! - Short-lived signed identity tokens exchanged for opaque, store-backed
//!   session cookies (httpOnly, 5-day expiry, revocable)
//! - A configurable route guard classifying every navigation as public,
//!   student-protected, or admin-protected
//! - Active session expiration via a background task
//! - redb embedded database (ACID, MVCC, crash-safe)

pub mod api;
pub mod config;
pub mod directory;
pub mod expiration;
pub mod guard;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod tokens;

use config::Config;
use storage::Database;
use tokens::TokenIssuer;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub issuer: TokenIssuer,
}
