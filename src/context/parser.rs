//
//  bbs-prebuilds
//  context/parser.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Context Parser
//!
//! Pure URL parsing: no network access and no authentication. The parser
//! only knows the configured provider host, which it uses to reject URLs
//! that belong to another instance.
//!
//! ## Supported URL Formats
//!
//! | Format | Example |
//! |--------|---------|
//! | Browse | `https://host/projects/FOO/repos/bar/browse/README.md?at=main` |
//! | Browse (user) | `https://host/users/jldec/repos/bar` |
//! | HTTP clone | `https://host/scm/FOO/bar.git` |
//! | HTTP clone (user) | `https://host/scm/~jldec/bar.git` |
//! | SSH clone | `ssh://git@host:7999/FOO/bar.git` |
//! | SCP-style SSH | `git@host:FOO/bar.git` |

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{RepositoryCoordinates, ResourceKind};
use crate::api::ApiError;
use crate::config::{hosts_match, ProviderConfig};

/// Browse and REST-style paths: `/projects/FOO/repos/bar[/...]`.
///
/// # Capture Groups
/// 1. Resource kind (`projects` or `users`, any case)
/// 2. Project key or user slug
/// 3. Repository slug
static BROWSE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(?i:(projects|users))/([^/]+)/repos/([^/]+?)(?:\.git)?(?:/.*)?$").unwrap()
});

/// HTTP clone paths: `/scm/FOO/bar.git` or `/scm/~user/bar.git`.
///
/// # Capture Groups
/// 1. `~` when the owner is a user
/// 2. Project key or user slug
/// 3. Repository slug
static SCM_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/scm/(~)?([^/]+)/([^/]+?)(?:\.git)?/?$").unwrap()
});

/// SSH clone paths: `/FOO/bar.git` or `/~user/bar.git`.
///
/// Same capture groups as [`SCM_PATH`].
static SSH_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(~)?([^/]+)/([^/]+?)(?:\.git)?/?$").unwrap()
});

/// SCP-style remotes: `git@host:FOO/bar.git`.
///
/// # Capture Groups
/// 1. Host
/// 2. Path below the host, without leading slash
static SCP_REMOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@/\s]+@([^:/\s]+):([^/].*)$").unwrap()
});

/// Resolves repository URLs for one configured Bitbucket Server instance.
#[derive(Debug, Clone)]
pub struct ContextParser {
    provider: ProviderConfig,
}

impl ContextParser {
    pub fn new(provider: ProviderConfig) -> Self {
        Self { provider }
    }

    /// The provider this parser resolves URLs for.
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Parses a clone or browse URL into repository coordinates.
    ///
    /// # Errors
    ///
    /// - [`ApiError::ProviderMismatch`] when the URL's host is not the
    ///   configured provider host (compared case-insensitively)
    /// - [`ApiError::InvalidUrl`] when the URL is on the right host but is
    ///   not a repository URL
    pub fn parse_url(&self, url: &str) -> Result<RepositoryCoordinates, ApiError> {
        let url = url.trim();
        let invalid = || ApiError::InvalidUrl(url.to_string());

        if let Some(caps) = SCP_REMOTE.captures(url) {
            if !url.contains("://") {
                self.ensure_host(&caps[1], true)?;
                let path = format!("/{}", &caps[2]);
                return self.from_captures(SSH_PATH.captures(&path), false).ok_or_else(invalid);
            }
        }

        let parsed = Url::parse(url).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?;

        match parsed.scheme() {
            "https" | "http" => {
                let authority = match parsed.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
                self.ensure_host(&authority, false)?;

                let path = parsed.path();
                self.from_captures(BROWSE_PATH.captures(path), true)
                    .or_else(|| self.from_captures(SCM_PATH.captures(path), false))
                    .ok_or_else(invalid)
            }
            "ssh" => {
                self.ensure_host(host, true)?;
                self.from_captures(SSH_PATH.captures(parsed.path()), false)
                    .ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }

    fn ensure_host(&self, candidate: &str, ignore_port: bool) -> Result<(), ApiError> {
        if hosts_match(&self.provider.host, candidate, ignore_port) {
            Ok(())
        } else {
            Err(ApiError::ProviderMismatch {
                expected: self.provider.host.clone(),
                actual: candidate.to_lowercase(),
            })
        }
    }

    /// Builds coordinates from either path shape.
    ///
    /// With `named_kind` the first group is the literal resource kind;
    /// otherwise it is the optional `~` user marker.
    fn from_captures(
        &self,
        caps: Option<regex::Captures<'_>>,
        named_kind: bool,
    ) -> Option<RepositoryCoordinates> {
        let caps = caps?;
        let resource_kind = if named_kind {
            if caps.get(1)?.as_str().eq_ignore_ascii_case("users") {
                ResourceKind::Users
            } else {
                ResourceKind::Projects
            }
        } else if caps.get(1).is_some() {
            ResourceKind::Users
        } else {
            ResourceKind::Projects
        };

        let owner = caps.get(2)?.as_str();
        let repository_slug = caps.get(3)?.as_str();
        if owner.is_empty() || repository_slug.is_empty() {
            return None;
        }

        // Project keys are uppercase; clone links carry them lowercased.
        let owner = match resource_kind {
            ResourceKind::Projects => owner.to_ascii_uppercase(),
            ResourceKind::Users => owner.to_string(),
        };

        Some(RepositoryCoordinates {
            host: self.provider.host.clone(),
            resource_kind,
            owner,
            repository_slug: repository_slug.to_string(),
        })
    }
}
