//
//  bbs-prebuilds
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Collaborators
//!
//! This crate never stores or refreshes Bitbucket Server credentials itself.
//! Two collaborators are consumed at their interface boundary:
//!
//! - [`TokenGateway`]: supplies a bearer token for a user on the Bitbucket
//!   Server side, optionally scoped. Fetched per call, never cached here.
//! - [`TokenIssuer`]: mints platform-side scoped tokens, used as the
//!   credential Bitbucket Server presents when delivering webhooks.
//!
//! ## Module Structure
//!
//! - [`keyring`]: [`KeyringTokenGateway`] backed by the system keyring
//! - [`token`]: [`LocalTokenIssuer`] and stdin token helpers
//!
//! ## Example
//!
//! ```rust
//! use bbs_prebuilds::auth::{StaticTokenGateway, TokenGateway};
//! use bbs_prebuilds::protocol::User;
//!
//! # async fn example() -> Result<(), bbs_prebuilds::api::ApiError> {
//! let gateway = StaticTokenGateway::new("NjM0NTY3ODkw");
//! let user = User { id: "user1".into(), name: None, identities: vec![] };
//!
//! let token = gateway.get_token_with_scopes(&user, &[]).await?;
//! assert_eq!(token.value, "NjM0NTY3ODkw");
//! # Ok(())
//! # }
//! ```

mod keyring;
mod token;

pub use keyring::*;
pub use token::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::RequestBuilder;

use crate::api::ApiError;
use crate::protocol::User;

/// Scope granting a token the right to trigger prebuilds.
pub const PREBUILD_TOKEN_SCOPE: &str = "prebuilds";

/// A bearer credential for Bitbucket Server, valid for one request.
#[derive(Clone)]
pub struct DelegatedToken {
    /// The bearer value.
    pub value: String,
    /// Scopes the token was issued with; empty means general scope.
    pub scopes: Vec<String>,
}

impl DelegatedToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scopes: Vec::new(),
        }
    }

    /// Adds the `Authorization: Bearer` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.value)
    }
}

impl std::fmt::Debug for DelegatedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedToken")
            .field("value", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// A platform token minted for one capability.
#[derive(Clone)]
pub struct ScopedToken {
    /// Token value; only ever shown once, to the caller that minted it.
    pub value: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for ScopedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedToken")
            .field("value", &"<redacted>")
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Supplies Bitbucket Server bearer tokens for users.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    /// Returns a token for `user` carrying at least `scopes`.
    ///
    /// An empty scope list asks for a general read token.
    async fn get_token_with_scopes(
        &self,
        user: &User,
        scopes: &[String],
    ) -> Result<DelegatedToken, ApiError>;
}

/// Mints platform-side scoped tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Creates a token for `user` limited to `scope`, tied to `subject_url`.
    async fn create_scoped_token(
        &self,
        user: &User,
        scope: &str,
        subject_url: &str,
    ) -> Result<ScopedToken, ApiError>;
}

/// A gateway that hands out one fixed token to every user.
///
/// Suitable for single-user operation (the CLI with `BBS_TOKEN`) and tests.
#[derive(Clone)]
pub struct StaticTokenGateway {
    token: String,
}

impl StaticTokenGateway {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenGateway for StaticTokenGateway {
    async fn get_token_with_scopes(
        &self,
        _user: &User,
        scopes: &[String],
    ) -> Result<DelegatedToken, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::Token("no token configured".into()));
        }
        Ok(DelegatedToken {
            value: self.token.clone(),
            scopes: scopes.to_vec(),
        })
    }
}
