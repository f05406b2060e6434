//
//  bbs-prebuilds
//  api/server/webhooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server Webhook and Permission API
//!
//! ```text
//! GET/POST /rest/api/1.0/{projects|users}/{owner}/repos/{slug}/webhooks
//! GET      /rest/api/1.0/{projects|users}/{owner}/repos/{slug}/permissions/users
//! ```
//!
//! Both endpoints require repository admin rights, which is why listing
//! webhooks doubles as a capability probe.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ServerUser;

/// Event fired when refs (branches, tags) are pushed or deleted.
pub const REFS_CHANGED_EVENT: &str = "repo:refs_changed";

/// Highest repository permission tier.
pub const REPO_ADMIN: &str = "REPO_ADMIN";

/// A webhook configured on a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Delivery URL, including any query credential.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub events: Vec<String>,

    /// Free-form settings; the server masks `secret` on reads.
    #[serde(default)]
    pub configuration: HashMap<String, serde_json::Value>,

    /// Unix milliseconds.
    #[serde(default)]
    pub created_date: Option<i64>,

    #[serde(default)]
    pub updated_date: Option<i64>,
}

impl Webhook {
    /// Whether this hook delivers to a URL containing `hook_url`.
    pub fn targets(&self, hook_url: &str) -> bool {
        self.url.as_deref().is_some_and(|url| url.contains(hook_url))
    }
}

/// Request body for creating a webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookParams {
    pub name: String,
    pub events: Vec<String>,
    pub configuration: WebhookConfiguration,
    pub url: String,
    pub active: bool,
}

/// Webhook settings sent on creation.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookConfiguration {
    /// HMAC key Bitbucket Server signs deliveries with.
    pub secret: String,
}

/// One entry in a repository's per-user permission listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub user: ServerUser,

    /// One of "REPO_READ", "REPO_WRITE", "REPO_ADMIN".
    pub permission: String,
}

impl PermissionEntry {
    pub fn is_admin(&self) -> bool {
        self.permission == REPO_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_targets_matches_substring() {
        let json = r#"{"id":1,"name":"prebuilds","createdDate":1650000000000,"updatedDate":1650000000000,
            "events":["repo:refs_changed"],"configuration":{"secret":"********"},
            "url":"https://gitpod.example.com/apps/bitbucket-server/?token=user1%7Cabc","active":true}"#;
        let hook: Webhook = serde_json::from_str(json).unwrap();

        assert!(hook.targets("https://gitpod.example.com/apps/bitbucket-server/"));
        assert!(!hook.targets("https://other.example.com/"));
    }

    #[test]
    fn test_webhook_without_url_targets_nothing() {
        let hook: Webhook = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert!(!hook.targets("https://gitpod.example.com/"));
    }

    #[test]
    fn test_webhook_params_wire_shape() {
        let params = WebhookParams {
            name: "prebuilds".into(),
            events: vec![REFS_CHANGED_EVENT.into()],
            configuration: WebhookConfiguration { secret: "s3cret".into() },
            url: "https://gitpod.example.com/".into(),
            active: true,
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["events"][0], "repo:refs_changed");
        assert_eq!(value["configuration"]["secret"], "s3cret");
        assert_eq!(value["active"], true);
    }
}
