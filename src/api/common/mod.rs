//
//  bbs-prebuilds
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Bitbucket Server integration
//!
//! This module provides the error taxonomy shared by every component of the
//! integration, plus the pagination envelope used by Bitbucket Server list
//! endpoints.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for parsing, transport and remote failures
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use bbs_prebuilds::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::InvalidUrl(url)) => format!("not a repository URL: {}", url),
//!         Err(e) if e.status() == Some(404) => "repository not found".to_string(),
//!         Err(e) => e.to_string(),
//!     }
//! }
//! ```

use reqwest::StatusCode;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket Server operations.
///
/// | Variant | Raised by | Meaning |
/// |---------|-----------|---------|
/// | `InvalidUrl` | Context parser | URL is not a Bitbucket Server repository URL |
/// | `ProviderMismatch` | Context parser | URL points at a different host |
/// | `Remote` | API client | Non-2xx response |
/// | `Network` | API client | Connection failure or timeout |
/// | `Decode` | API client | Response body did not match the expected shape |
/// | `Token` | Token collaborators | No usable token for the user |
/// | `WebhookNotVerified` | Provisioning service | Created hook missing on re-list |
/// | `Config` | Configuration | Invalid provider or platform settings |
///
/// Authorization denials and absent file content are deliberately *not*
/// errors; they surface as `false` / `None` at the public boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The URL does not match any Bitbucket Server repository URL shape.
    #[error("Invalid Bitbucket Server repository URL: {0}")]
    InvalidUrl(String),

    /// The URL's host is not the host this integration instance serves.
    #[error("Repository host {actual} does not match configured provider host {expected}")]
    ProviderMismatch {
        /// The configured provider host
        expected: String,
        /// The host found in the URL
        actual: String,
    },

    /// The remote API answered with a non-success status.
    ///
    /// `message` carries the first entry of Bitbucket Server's
    /// `{"errors": [{"message": ...}]}` body when one was present.
    #[error("{status} / {status_text}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Remote {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
        /// Server-supplied error message, if any
        message: Option<String>,
    },

    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts and DNS resolution errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected type.
    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A token collaborator could not supply a credential.
    #[error("Token unavailable: {0}")]
    Token(String),

    /// A webhook create call succeeded but the hook is not listed afterwards.
    #[error("Webhook for {0} was not found after creation")]
    WebhookNotVerified(String),

    /// Provider or platform configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Builds a [`ApiError::Remote`] from a status code and the raw error body.
    pub fn remote(status: StatusCode, body: &str) -> Self {
        Self::Remote {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: server_error_message(body),
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this is a transport or remote failure rather than a local one.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Network(_))
    }
}

/// Extracts the first message from a Bitbucket Server error body.
///
/// Server format: `{"errors": [{"message": "Human readable message"}]}`
fn server_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("errors")
        .and_then(|e| e.as_array())
        .and_then(|arr| arr.first())
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_extracts_server_message() {
        let body = r#"{"errors":[{"context":null,"message":"Repository FOO/bar does not exist.","exceptionName":"NoSuchRepositoryException"}]}"#;
        let err = ApiError::remote(StatusCode::NOT_FOUND, body);

        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "404 / Not Found: Repository FOO/bar does not exist."
        );
    }

    #[test]
    fn test_remote_error_without_json_body() {
        let err = ApiError::remote(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "500 / Internal Server Error");
        assert!(err.is_remote());
    }

    #[test]
    fn test_local_errors_have_no_status() {
        assert_eq!(ApiError::InvalidUrl("x".into()).status(), None);
        assert!(!ApiError::Token("none".into()).is_remote());
    }
}
