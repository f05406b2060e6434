//
//  bbs-prebuilds
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Authenticated access to the Bitbucket Server REST API v1.0 at
//! `https://{host}/rest/api/1.0`.
//!
//! ## Architecture
//!
//! - [`client`]: [`BitbucketServerApi`], the request executor and the typed
//!   endpoint wrappers
//! - [`server`]: Wire types for repositories, commits, branches, webhooks
//!   and permissions
//! - [`common`]: [`ApiError`] and the paginated envelope
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bbs_prebuilds::api::BitbucketServerApi;
//! use bbs_prebuilds::auth::StaticTokenGateway;
//! use bbs_prebuilds::config::{ApiSettings, ProviderConfig};
//!
//! let provider = ProviderConfig::new("MyBitbucketServer", "bitbucket.example.com");
//! let api = BitbucketServerApi::new(
//!     &provider,
//!     &ApiSettings::default(),
//!     Arc::new(StaticTokenGateway::new("your-pat")),
//! )
//! .expect("Failed to create client");
//! ```
//!
//! ## Error Handling
//!
//! Every non-2xx answer is an [`ApiError::Remote`] carrying the status code
//! and reason phrase, displayed as `"{status} / {status_text}"`. Nothing is
//! retried.

/// Core HTTP client for Bitbucket Server.
pub mod client;

/// Bitbucket Server API v1.0 wire types.
pub mod server;

/// Errors and pagination.
pub mod common;

pub use client::BitbucketServerApi;
pub use common::{ApiError, ServerPaginatedResponse};
