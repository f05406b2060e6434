//
//  bbs-prebuilds
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Scoped Token Issuing
//!
//! [`LocalTokenIssuer`] is an in-process [`TokenIssuer`]: it mints random
//! tokens and remembers only their SHA-256 digests, so a leaked store does
//! not leak usable credentials. Deliveries presenting a token are checked
//! with [`LocalTokenIssuer::verify`].
//!
//! The helpers [`read_token_from_stdin`] and [`validate_token`] are used by
//! `bbs auth login --with-token`.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::{ScopedToken, TokenIssuer};
use crate::api::ApiError;
use crate::protocol::User;

/// Reads a token from a single line of standard input.
pub fn read_token_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Basic token sanity check: non-empty and free of whitespace.
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

/// What the issuer remembers about a minted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokenRecord {
    pub user_id: String,
    pub scope: String,
    pub subject_url: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory issuer of random scoped tokens.
#[derive(Default)]
pub struct LocalTokenIssuer {
    issued: RwLock<HashMap<String, IssuedTokenRecord>>,
}

impl LocalTokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the record for a presented token value.
    pub async fn verify(&self, value: &str) -> Option<IssuedTokenRecord> {
        self.issued.read().await.get(&digest(value)).cloned()
    }

    /// Forgets a token so it no longer verifies.
    pub async fn revoke(&self, value: &str) -> bool {
        self.issued.write().await.remove(&digest(value)).is_some()
    }

    /// Number of live tokens.
    pub async fn len(&self) -> usize {
        self.issued.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TokenIssuer for LocalTokenIssuer {
    async fn create_scoped_token(
        &self,
        user: &User,
        scope: &str,
        subject_url: &str,
    ) -> Result<ScopedToken, ApiError> {
        let value = random_token();
        let created_at = Utc::now();

        self.issued.write().await.insert(
            digest(&value),
            IssuedTokenRecord {
                user_id: user.id.clone(),
                scope: scope.to_string(),
                subject_url: subject_url.to_string(),
                created_at,
            },
        );
        tracing::debug!(user_id = %user.id, scope, subject_url, "Issued scoped token");

        Ok(ScopedToken {
            value,
            scope: scope.to_string(),
            created_at,
        })
    }
}

/// 32 random bytes, base64url encoded (43 characters, URL and query safe).
pub(crate) fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}
