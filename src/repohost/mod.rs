//
//  bbs-prebuilds
//  repohost/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Host Capabilities
//!
//! The two capabilities this crate offers to the rest of the platform,
//! both parameterized by a [`User`] and a repository URL:
//!
//! - [`FileProvider`]: best-effort file reads at a commit
//! - [`RepositoryService`]: prebuild authorization and webhook installation
//!
//! [`BitbucketServerFileProvider`] implements the first; the second is
//! implemented by [`crate::prebuilds::BitbucketServerService`].

mod file_provider;

pub use file_provider::*;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::ApiError;
use crate::protocol::{Commit, Repository, User};

/// Per-repository platform configuration file.
pub const GITPOD_FILE: &str = ".gitpod.yml";

/// File content, or `None` when there is nothing to read.
pub type MaybeContent = Option<String>;

/// Reads files from a hosted repository.
#[async_trait]
pub trait FileProvider: Send + Sync {
    /// Contents of [`GITPOD_FILE`] at `commit`.
    async fn get_gitpod_file_content(&self, commit: &Commit, user: &User) -> MaybeContent {
        self.get_file_content(commit, user, GITPOD_FILE).await
    }

    /// Contents of `path` at `commit`.
    ///
    /// Never fails: a commit without a revision or web URL, an unparseable
    /// URL and any remote error all yield `None`.
    async fn get_file_content(&self, commit: &Commit, user: &User, path: &str) -> MaybeContent;

    /// Revision of the latest commit touching `path`, reachable from
    /// `revision_or_branch`. `Ok(None)` when no commit touches it.
    async fn get_last_change_revision(
        &self,
        repository: &Repository,
        revision_or_branch: &str,
        user: &User,
        path: &str,
    ) -> Result<Option<String>, ApiError>;
}

/// Result of a successful installation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallOutcome {
    /// A webhook pointing at the platform already existed; nothing changed.
    AlreadyInstalled,
    /// A new webhook was created and verified.
    Installed {
        webhook_id: u64,
        /// Per-installation signing secret; the platform must persist it to
        /// verify deliveries.
        secret: String,
    },
}

/// Automated prebuild provisioning for a hosted repository.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Whether `user` may install automated prebuilds on `clone_url`.
    async fn can_install_automated_prebuilds(&self, user: &User, clone_url: &str) -> bool;

    /// Installs the prebuild webhook unless one already exists.
    async fn install_automated_prebuilds(
        &self,
        user: &User,
        clone_url: &str,
    ) -> Result<InstallOutcome, ApiError>;
}
