//
//  bbs-prebuilds
//  api/server/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server Repository API
//!
//! Types returned by the repository metadata endpoints:
//!
//! ```text
//! GET /rest/api/1.0/{projects|users}/{owner}/repos/{slug}
//! GET /rest/api/1.0/{projects|users}/{owner}/repos/{slug}/default-branch
//! GET /rest/api/1.0/{projects|users}/{owner}/repos/{slug}/commits
//! ```

use serde::{Deserialize, Serialize};

/// A repository in Bitbucket Server.
///
/// # Notes
///
/// - Personal repositories belong to a pseudo-project whose key is `~USER`
///   and whose `owner` is set
/// - Clone links typically include both `ssh` and `http` entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Unique numeric identifier assigned by Bitbucket Server.
    pub id: u64,

    /// URL-safe identifier used in API endpoints and clone URLs.
    pub slug: String,

    /// Human-readable display name of the repository.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Reference to the project that contains this repository.
    pub project: ProjectRef,

    /// Source control management identifier (typically "git").
    #[serde(rename = "scmId", default)]
    pub scm_id: Option<String>,

    /// Common values: "AVAILABLE", "INITIALISING", "INITIALISATION_FAILED".
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub forkable: bool,

    #[serde(rename = "public", default)]
    pub is_public: bool,

    #[serde(default)]
    pub links: RepositoryLinks,
}

impl Repository {
    /// Returns the clone URL for the given protocol name ("http" or "ssh").
    pub fn clone_url(&self, name: &str) -> Option<&str> {
        self.links
            .clone
            .iter()
            .find(|link| link.name == name)
            .map(|link| link.href.as_str())
    }

    /// Returns the first browser link.
    pub fn web_url(&self) -> Option<&str> {
        self.links.self_link.first().map(|link| link.href.as_str())
    }
}

/// Reference to the project containing a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: u64,

    /// Short key used in URLs, e.g. "PROJ" or "~JLDEC" for personal projects.
    pub key: String,

    pub name: String,

    #[serde(rename = "public", default)]
    pub is_public: bool,

    /// Set for personal projects.
    #[serde(default)]
    pub owner: Option<ServerUser>,
}

/// Links associated with a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryLinks {
    #[serde(default)]
    pub clone: Vec<CloneLink>,

    #[serde(default, rename = "self")]
    pub self_link: Vec<SelfLink>,
}

/// A clone URL for one protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneLink {
    /// Example: "ssh://git@bitbucket.example.com:7999/proj/repo.git"
    pub href: String,

    /// Common values: "ssh", "http".
    pub name: String,
}

/// Self-referential link to a resource in the web UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfLink {
    pub href: String,
}

/// A Bitbucket Server user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerUser {
    /// Login name; this is what linked identities are matched on.
    pub name: String,

    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub active: bool,

    /// "NORMAL" or "SERVICE".
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
}

/// A branch, as returned by the default-branch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Full ref name, e.g. "refs/heads/main".
    pub id: String,

    /// Short name, e.g. "main".
    pub display_id: String,

    /// "BRANCH" for branches.
    #[serde(default, rename = "type")]
    pub ref_type: Option<String>,

    #[serde(default)]
    pub latest_commit: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}

/// A commit in a repository's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full commit hash.
    pub id: String,

    /// Abbreviated hash.
    pub display_id: String,

    #[serde(default)]
    pub author: Option<ServerUser>,

    /// Unix milliseconds.
    #[serde(default)]
    pub author_timestamp: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_repository_deserializes() {
        let json = r#"{
            "id": 7,
            "slug": "test-repo",
            "name": "test-repo",
            "scmId": "git",
            "state": "AVAILABLE",
            "public": false,
            "project": {
                "id": 3, "key": "~JLDEC", "name": "JL Dec", "type": "PERSONAL",
                "owner": {"name": "jldec", "slug": "jldec", "id": 5, "active": true, "type": "NORMAL"}
            },
            "links": {
                "clone": [
                    {"href": "ssh://git@bitbucket.example.com:7999/~jldec/test-repo.git", "name": "ssh"},
                    {"href": "https://bitbucket.example.com/scm/~jldec/test-repo.git", "name": "http"}
                ],
                "self": [{"href": "https://bitbucket.example.com/users/jldec/repos/test-repo/browse"}]
            }
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.project.owner.as_ref().unwrap().name, "jldec");
        assert_eq!(
            repo.clone_url("http"),
            Some("https://bitbucket.example.com/scm/~jldec/test-repo.git")
        );
        assert_eq!(
            repo.web_url(),
            Some("https://bitbucket.example.com/users/jldec/repos/test-repo/browse")
        );
    }

    #[test]
    fn test_default_branch_deserializes() {
        let json = r#"{"id":"refs/heads/main","displayId":"main","type":"BRANCH","latestCommit":"8d51122def5632836d1cb1026e879069e10a1e13","isDefault":true}"#;
        let branch: Branch = serde_json::from_str(json).unwrap();

        assert_eq!(branch.display_id, "main");
        assert!(branch.is_default);
        assert_eq!(branch.latest_commit.as_deref(), Some("8d51122def5632836d1cb1026e879069e10a1e13"));
    }
}
