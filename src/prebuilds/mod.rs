//
//  bbs-prebuilds
//  prebuilds/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Automated Prebuild Provisioning
//!
//! [`BitbucketServerService`] decides whether a user may enable automated
//! prebuilds on a repository and installs the `repo:refs_changed` webhook
//! that triggers them.
//!
//! ## Authorization
//!
//! Bitbucket Server has no single "am I admin" endpoint, so the decision is
//! derived from responses:
//!
//! 1. The repository URL must resolve on the configured provider host
//! 2. The user must have an identity linked to this provider
//! 3. Listing webhooks (an admin-only endpoint) must succeed
//! 4. The linked identity's entry in `permissions/users` must be `REPO_ADMIN`
//!
//! ## Installation
//!
//! Idempotency comes from remote state: existing hooks are listed first and
//! a hook already pointing at the platform callback URL makes the call a
//! no-op. Installations for the same repository are serialized in-process
//! by an [`InstallLeases`] lease, and a created hook is re-listed before the
//! call reports success.

mod callback;
mod lease;
mod signature;

pub use callback::*;
pub use lease::*;
pub use signature::*;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::api::server::{WebhookConfiguration, WebhookParams, REFS_CHANGED_EVENT};
use crate::api::{ApiError, BitbucketServerApi};
use crate::auth::{TokenIssuer, PREBUILD_TOKEN_SCOPE};
use crate::config::PlatformConfig;
use crate::context::{ContextParser, RepositoryCoordinates};
use crate::protocol::User;
use crate::repohost::{InstallOutcome, RepositoryService};

/// Name given to webhooks this service creates.
pub const WEBHOOK_NAME: &str = "Gitpod Prebuilds";

/// Outcome of an installation permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Denied(DenialReason),
}

impl Authorization {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

/// Why installation is not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    #[error("repository host {actual} is not served by provider host {expected}")]
    ProviderMismatch { expected: String, actual: String },

    #[error("not a Bitbucket Server repository URL: {0}")]
    InvalidUrl(String),

    #[error("user has no identity linked to provider {0}")]
    NoLinkedIdentity(String),

    #[error("webhook listing refused: {0}")]
    WebhookAccessDenied(String),

    #[error("no repository permission entry for {0}")]
    NoPermissionEntry(String),

    #[error("permission {permission} for {auth_name} is not REPO_ADMIN")]
    InsufficientPermission {
        auth_name: String,
        permission: String,
    },
}

/// Prebuild authorization and webhook installation on Bitbucket Server.
pub struct BitbucketServerService {
    api: Arc<BitbucketServerApi>,
    parser: Arc<ContextParser>,
    platform: PlatformConfig,
    issuer: Arc<dyn TokenIssuer>,
    leases: InstallLeases,
}

impl BitbucketServerService {
    pub fn new(
        api: Arc<BitbucketServerApi>,
        parser: Arc<ContextParser>,
        platform: PlatformConfig,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            api,
            parser,
            platform,
            issuer,
            leases: InstallLeases::new(),
        }
    }

    /// Decides whether `user` may install prebuilds on `clone_url`.
    ///
    /// Denials are values, not errors. Only a failure to read the permission
    /// listing after the webhook probe succeeded is returned as `Err`.
    pub async fn check_install_permission(
        &self,
        user: &User,
        clone_url: &str,
    ) -> Result<Authorization, ApiError> {
        let repo = match self.parser.parse_url(clone_url) {
            Ok(repo) => repo,
            Err(ApiError::ProviderMismatch { expected, actual }) => {
                return Ok(Authorization::Denied(DenialReason::ProviderMismatch {
                    expected,
                    actual,
                }));
            }
            Err(e) => return Ok(Authorization::Denied(DenialReason::InvalidUrl(e.to_string()))),
        };

        let provider_id = &self.parser.provider().id;
        let Some(identity) = user.identity_for(provider_id) else {
            tracing::error!(
                user_id = %user.id,
                provider_id = %provider_id,
                "User has no identity linked to this provider"
            );
            return Ok(Authorization::Denied(DenialReason::NoLinkedIdentity(
                provider_id.clone(),
            )));
        };

        // Listing webhooks needs admin rights; only success matters here.
        if let Err(e) = self.api.get_webhooks(user, &repo).await {
            return Ok(Authorization::Denied(DenialReason::WebhookAccessDenied(
                e.to_string(),
            )));
        }

        let permissions = self.api.get_repository_permissions(user, &repo).await?;
        let Some(entry) = permissions
            .iter()
            .find(|entry| entry.user.name == identity.auth_name)
        else {
            return Ok(Authorization::Denied(DenialReason::NoPermissionEntry(
                identity.auth_name.clone(),
            )));
        };

        if !entry.is_admin() {
            return Ok(Authorization::Denied(DenialReason::InsufficientPermission {
                auth_name: identity.auth_name.clone(),
                permission: entry.permission.clone(),
            }));
        }

        Ok(Authorization::Authorized)
    }

    async fn install(
        &self,
        user: &User,
        clone_url: &str,
        repo: &RepositoryCoordinates,
    ) -> Result<InstallOutcome, ApiError> {
        let hook_url = self.platform.hook_url()?;
        let _lease = self.leases.acquire(&repo.to_string()).await;

        let existing = self.api.get_webhooks(user, repo).await?;
        if existing.iter().any(|hook| hook.targets(hook_url.as_str())) {
            tracing::info!(repository = %repo, "Prebuild webhook already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let token = self
            .issuer
            .create_scoped_token(user, PREBUILD_TOKEN_SCOPE, clone_url)
            .await?;
        let secret = generate_secret();
        let callback = CallbackCredential::new(user.id.clone(), token.value);

        let params = WebhookParams {
            name: WEBHOOK_NAME.to_string(),
            events: vec![REFS_CHANGED_EVENT.to_string()],
            configuration: WebhookConfiguration {
                secret: secret.clone(),
            },
            url: callback.to_hook_url(&hook_url).to_string(),
            active: true,
        };
        let created = self.api.set_webhook(user, repo, &params).await?;

        let hooks = self.api.get_webhooks(user, repo).await?;
        if !hooks.iter().any(|hook| hook.id == created.id) {
            return Err(ApiError::WebhookNotVerified(format!(
                "{} (id {})",
                repo, created.id
            )));
        }

        tracing::info!(repository = %repo, webhook_id = created.id, "Installed prebuild webhook");
        Ok(InstallOutcome::Installed {
            webhook_id: created.id,
            secret,
        })
    }
}

#[async_trait]
impl RepositoryService for BitbucketServerService {
    async fn can_install_automated_prebuilds(&self, user: &User, clone_url: &str) -> bool {
        match self.check_install_permission(user, clone_url).await {
            Ok(Authorization::Authorized) => true,
            Ok(Authorization::Denied(reason)) => {
                tracing::debug!(user_id = %user.id, clone_url, reason = %reason, "Prebuild installation denied");
                false
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, clone_url, error = %e, "Prebuild permission check failed");
                false
            }
        }
    }

    async fn install_automated_prebuilds(
        &self,
        user: &User,
        clone_url: &str,
    ) -> Result<InstallOutcome, ApiError> {
        let repo = self.parser.parse_url(clone_url)?;
        self.install(user, clone_url, &repo).await
    }
}
