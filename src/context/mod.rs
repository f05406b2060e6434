//
//  bbs-prebuilds
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context Module
//!
//! Turns Bitbucket Server clone and browse URLs into the coordinates the
//! REST API is addressed with.
//!
//! ## Overview
//!
//! Bitbucket Server namespaces repositories either under a project
//! (`/projects/FOO/repos/bar`) or under a user (`/users/jldec/repos/bar`).
//! Clone URLs use a different shape (`/scm/foo/bar.git`,
//! `/scm/~jldec/bar.git`, `ssh://git@host:7999/FOO/bar.git`). The
//! [`ContextParser`] normalizes all of them to one [`RepositoryCoordinates`].
//!
//! ## Example
//!
//! ```rust
//! use bbs_prebuilds::config::ProviderConfig;
//! use bbs_prebuilds::context::{ContextParser, ResourceKind};
//!
//! let parser = ContextParser::new(ProviderConfig::new("bbs", "bitbucket.example.com"));
//! let coords = parser.parse_url("https://bitbucket.example.com/scm/~jldec/test-repo.git")?;
//!
//! assert_eq!(coords.resource_kind, ResourceKind::Users);
//! assert_eq!(coords.repository_path(), "/users/jldec/repos/test-repo");
//! # Ok::<(), bbs_prebuilds::api::ApiError>(())
//! ```

mod parser;

pub use parser::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bitbucket Server's namespace discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Team-owned repositories under a project key.
    Projects,
    /// Personally-owned repositories under a user slug.
    Users,
}

impl ResourceKind {
    /// The path segment used by the REST API and web UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved location of a repository on a Bitbucket Server instance.
///
/// Derived per call from a URL and never persisted. `host` always equals the
/// configured provider host when produced by [`ContextParser`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCoordinates {
    /// Host (and port, for http(s) URLs that carry one).
    pub host: String,
    /// Project or user namespace.
    pub resource_kind: ResourceKind,
    /// Project key (uppercase) or user slug.
    pub owner: String,
    /// Repository slug, without any `.git` suffix.
    pub repository_slug: String,
}

impl RepositoryCoordinates {
    /// REST path of the repository below `/rest/api/1.0`.
    pub fn repository_path(&self) -> String {
        format!(
            "/{}/{}/repos/{}",
            self.resource_kind, self.owner, self.repository_slug
        )
    }

    /// Browser URL of the repository.
    pub fn web_url(&self) -> String {
        format!("https://{}{}", self.host, self.repository_path())
    }

    /// Returns `owner/slug` for display and logging.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository_slug)
    }
}

impl fmt::Display for RepositoryCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.repository_path())
    }
}
