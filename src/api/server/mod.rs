//
//  bbs-prebuilds
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server REST API v1.0 types
//!
//! Wire types for the endpoints this integration consumes:
//!
//! - [`repositories`] - Repository metadata, branches, commits, users
//! - [`webhooks`] - Webhooks and the per-user permission listing
//!
//! ## Notes
//!
//! - Optional fields use `Option<T>` and default to `None` during deserialization
//! - Timestamps are Unix milliseconds

pub mod repositories;
pub mod webhooks;

pub use repositories::{Branch, CloneLink, Commit, ProjectRef, Repository, ServerUser};
pub use webhooks::{
    PermissionEntry, Webhook, WebhookConfiguration, WebhookParams, REFS_CHANGED_EVENT, REPO_ADMIN,
};
