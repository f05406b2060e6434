//
//  bbs-prebuilds
//  protocol/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Platform Model
//!
//! The subset of the hosting platform's own records that this integration
//! consumes: the acting [`User`] with its linked [`Identity`] entries, and the
//! [`Commit`] / [`Repository`] pair that file lookups are keyed on.
//!
//! These types belong to the platform, not to Bitbucket Server; the wire
//! types for the Bitbucket Server REST API live in [`crate::api::server`].

use serde::{Deserialize, Serialize};

/// A platform user acting through this integration.
///
/// # Example
///
/// ```rust
/// use bbs_prebuilds::protocol::{Identity, User};
///
/// let user = User {
///     id: "user1".to_string(),
///     name: None,
///     identities: vec![Identity {
///         auth_id: "1".to_string(),
///         auth_name: "AlexTugarev".to_string(),
///         auth_provider_id: "MyBitbucketServer".to_string(),
///     }],
/// };
///
/// assert_eq!(user.identity_for("MyBitbucketServer").unwrap().auth_name, "AlexTugarev");
/// assert!(user.identity_for("GitHub").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Platform user id; embedded in webhook callback credentials.
    pub id: String,

    /// Display name, if known.
    #[serde(default)]
    pub name: Option<String>,

    /// Identities this user has linked with auth providers.
    #[serde(default)]
    pub identities: Vec<Identity>,
}

impl User {
    /// Returns the identity linked with the given auth provider.
    pub fn identity_for(&self, auth_provider_id: &str) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|i| i.auth_provider_id == auth_provider_id)
    }
}

/// A user's account on one auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account id on the provider.
    pub auth_id: String,

    /// Account name on the provider; compared against Bitbucket Server's `user.name`.
    pub auth_name: String,

    /// Id of the auth provider this identity belongs to.
    pub auth_provider_id: String,
}

/// A platform repository reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Host of the repository.
    #[serde(default)]
    pub host: String,

    /// Owner as the platform displays it.
    #[serde(default)]
    pub owner: String,

    /// Repository name.
    #[serde(default)]
    pub name: String,

    /// Clone URL.
    #[serde(default)]
    pub clone_url: String,

    /// Browser URL; required for file lookups on Bitbucket Server.
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A commit the platform wants to read files from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Repository the commit belongs to.
    pub repository: Repository,

    /// Commit id or ref; `None` before the commit is resolved.
    #[serde(default)]
    pub revision: Option<String>,
}
