//
//  bbs-prebuilds
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Static configuration for one integration instance: which Bitbucket Server
//! it serves ([`ProviderConfig`]), where the platform receives webhook calls
//! ([`PlatformConfig`]), HTTP settings ([`ApiSettings`]) and, for the CLI,
//! the acting identity ([`IdentitySettings`]).
//!
//! Configuration is loaded once, validated, and then handed to components at
//! construction. Nothing in this crate mutates it afterwards.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbs/config.toml`
//! - **macOS**: `~/Library/Application Support/bbs/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbs\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [provider]
//! id = "MyBitbucketServer"
//! host = "bitbucket.gitpod-self-hosted.com"
//!
//! [platform]
//! host_url = "https://gitpod.example.com/"
//! webhook_path = "apps/bitbucket-server/"
//!
//! [api]
//! timeout_secs = 10
//! ```

mod hosts;

pub use hosts::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ApiError;

/// Complete configuration for one integration instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The Bitbucket Server instance and auth provider identity.
    pub provider: ProviderConfig,

    /// Where the platform is reachable for webhook deliveries.
    pub platform: PlatformConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Acting identity for CLI invocations.
    #[serde(default)]
    pub identity: IdentitySettings,
}

/// Identifies the Bitbucket Server instance and the auth provider that
/// fronts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Auth provider id; matched against `Identity::auth_provider_id`.
    pub id: String,

    /// Bitbucket Server host, optionally with port (no scheme).
    pub host: String,

    /// OAuth client settings. The handshake lives outside this crate; the
    /// values are carried so one file configures the whole provider.
    #[serde(default)]
    pub oauth: OAuthSettings,
}

impl ProviderConfig {
    /// Creates a provider configuration with empty OAuth settings.
    pub fn new(id: impl Into<String>, host: &str) -> Self {
        Self {
            id: id.into(),
            host: normalize_host(host),
            oauth: OAuthSettings::default(),
        }
    }
}

/// OAuth client settings for the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthSettings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub authorization_url: String,
    #[serde(default)]
    pub token_url: String,
    #[serde(default)]
    pub scope: String,
}

/// Platform endpoint that receives webhook deliveries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform base URL, e.g. `https://gitpod.example.com/`.
    pub host_url: String,

    /// Path below `host_url` that handles Bitbucket Server deliveries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_path: Option<String>,
}

impl PlatformConfig {
    /// Creates a platform configuration without a webhook path.
    pub fn new(host_url: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            webhook_path: None,
        }
    }

    /// The callback URL webhooks are pointed at, without credentials.
    ///
    /// Existing hooks whose URL contains this value are considered ours.
    pub fn hook_url(&self) -> Result<Url, ApiError> {
        let base = Url::parse(&self.host_url)
            .map_err(|e| ApiError::Config(format!("platform.host_url {}: {}", self.host_url, e)))?;
        match self.webhook_path.as_deref() {
            Some(path) if !path.is_empty() => base
                .join(path.trim_start_matches('/'))
                .map_err(|e| ApiError::Config(format!("platform.webhook_path {}: {}", path, e))),
            _ => Ok(base),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiSettings {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size requested from list endpoints.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_limit() -> u32 {
    100
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The platform user the CLI acts as.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentitySettings {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub auth_name: Option<String>,
}

impl Config {
    /// Loads configuration from `path`, or from the default location.
    ///
    /// Unlike per-user CLI preferences, a missing file is an error: there is
    /// no sensible default Bitbucket Server host.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.provider.host = normalize_host(&config.provider.host);
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot serve any request.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.provider.id.trim().is_empty() {
            return Err(ApiError::Config("provider.id must not be empty".into()));
        }
        if self.provider.host.is_empty() {
            return Err(ApiError::Config("provider.host must not be empty".into()));
        }
        if self.provider.host.contains('/') {
            return Err(ApiError::Config(format!(
                "provider.host must be a bare host, got {}",
                self.provider.host
            )));
        }
        let hook_url = self.platform.hook_url()?;
        if !matches!(hook_url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "platform.host_url must be http(s), got {}",
                self.platform.host_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ApiError::Config("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Default configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "bbs")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
