//
//  bbs-prebuilds
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server Prebuilds Library
//!
//! Server-side integration that lets a hosted development platform work with
//! a self-managed Bitbucket Server instance on a user's behalf.
//!
//! ## Overview
//!
//! A caller supplies a clone URL and a user. The [`context`] parser
//! resolves the URL into repository coordinates, the [`api`] client performs
//! authenticated reads and writes against Bitbucket Server, and the results
//! are mapped onto the platform's own content and permission model.
//!
//! ## Features
//!
//! - **URL Resolution**: Browse, `scm/` clone and ssh URLs for both project
//!   and personal (`~user`) repositories
//! - **Authenticated API Access**: Bearer token per call from a [`auth::TokenGateway`]
//! - **File Reads**: Best-effort file content at a revision ([`repohost`])
//! - **Prebuild Provisioning**: Admin-derived authorization and idempotent
//!   webhook installation with per-installation signing secrets ([`prebuilds`])
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client and Bitbucket Server wire types
//! - [`auth`]: Token collaborator interfaces and implementations
//! - [`config`]: Configuration file management
//! - [`context`]: Repository URL parsing
//! - [`protocol`]: Platform-side user, commit and repository records
//! - [`repohost`]: `FileProvider` and `RepositoryService` capabilities
//! - [`prebuilds`]: Webhook provisioning service
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Output formatting (Table, JSON)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bbs_prebuilds::api::BitbucketServerApi;
//! use bbs_prebuilds::auth::{LocalTokenIssuer, StaticTokenGateway};
//! use bbs_prebuilds::context::ContextParser;
//! use bbs_prebuilds::prebuilds::BitbucketServerService;
//! use bbs_prebuilds::repohost::RepositoryService;
//! use bbs_prebuilds::Config;
//!
//! # async fn example(user: bbs_prebuilds::protocol::User) -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let api = Arc::new(BitbucketServerApi::new(
//!     &config.provider,
//!     &config.api,
//!     Arc::new(StaticTokenGateway::new("your-pat")),
//! )?);
//! let parser = Arc::new(ContextParser::new(config.provider.clone()));
//! let service = BitbucketServerService::new(
//!     api,
//!     parser,
//!     config.platform.clone(),
//!     Arc::new(LocalTokenIssuer::new()),
//! );
//!
//! let url = "https://bitbucket.example.com/projects/FOO/repos/repo123";
//! if service.can_install_automated_prebuilds(&user, url).await {
//!     service.install_automated_prebuilds(&user, url).await?;
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the `bbs` commands, arguments, and subcommands defined using the
/// clap derive API.
pub mod cli;

/// API client for Bitbucket Server.
///
/// Handles authentication, request building, pagination, and error handling
/// against the REST API v1.0.
pub mod api;

/// Token collaborators.
pub mod auth;

/// Configuration file management.
///
/// - Linux: `~/.config/bbs/config.toml`
/// - macOS: `~/Library/Application Support/bbs/config.toml`
/// - Windows: `%APPDATA%\bbs\config.toml`
pub mod config;

/// Repository URL parsing into [`context::RepositoryCoordinates`].
pub mod context;

/// Output formatting for the CLI.
pub mod output;

/// Automated prebuild authorization and webhook installation.
pub mod prebuilds;

/// Platform-side records.
pub mod protocol;

/// Capabilities offered to the platform.
pub mod repohost;

#[cfg(test)]
pub(crate) mod test_support;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bbs_prebuilds::Cli;
///
/// let cli = Cli::parse();
/// // Handle cli.command...
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Re-export of the repository coordinates struct.
pub use context::RepositoryCoordinates;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bbs";

/// Application version constant, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bbs_prebuilds::VERSION;
///
/// println!("bbs version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage, configuration or repository URL.
    pub const USAGE: i32 = 2;

    /// No token available, or the server rejected it (401/403).
    ///
    /// Run `bbs auth login` to store a token.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    ///
    /// The repository or file does not exist, or the user cannot see it.
    pub const NOT_FOUND: i32 = 8;

    /// Bitbucket Server unreachable or answering with a server error.
    pub const REMOTE_ERROR: i32 = 32;
}
