//
//  bbs-prebuilds
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Stores one Bitbucket Server token per host in the system keyring:
//!
//! - **Service**: Application identifier (`bbs-prebuilds`)
//! - **Username/Key**: The Bitbucket Server host
//! - **Password/Value**: The token
//!
//! [`KeyringTokenGateway`] serves those tokens through the
//! [`TokenGateway`] interface for the CLI.

use anyhow::Result;
use async_trait::async_trait;
use keyring::Entry;

use super::{DelegatedToken, TokenGateway};
use crate::api::ApiError;
use crate::protocol::User;

const SERVICE_NAME: &str = "bbs-prebuilds";

/// Thin wrapper over the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn store(&self, host: &str, credential: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry.set_password(credential)?;
        Ok(())
    }

    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}

/// Serves the keyring token stored for one Bitbucket Server host.
///
/// Tokens stored here are personal access tokens; the requested scopes are
/// recorded on the returned token but cannot narrow it.
pub struct KeyringTokenGateway {
    store: KeyringStore,
    host: String,
}

impl KeyringTokenGateway {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            store: KeyringStore::new(),
            host: host.into(),
        }
    }
}

#[async_trait]
impl TokenGateway for KeyringTokenGateway {
    async fn get_token_with_scopes(
        &self,
        user: &User,
        scopes: &[String],
    ) -> Result<DelegatedToken, ApiError> {
        let token = self
            .store
            .get(&self.host)
            .map_err(|e| ApiError::Token(format!("keyring lookup for {} failed: {}", self.host, e)))?
            .ok_or_else(|| {
                ApiError::Token(format!(
                    "no token stored for {} (user {}); run 'bbs auth login' first",
                    self.host, user.id
                ))
            })?;

        Ok(DelegatedToken {
            value: token,
            scopes: scopes.to_vec(),
        })
    }
}
