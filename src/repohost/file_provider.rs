//
//  bbs-prebuilds
//  repohost/file_provider.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::sync::Arc;

use async_trait::async_trait;

use super::{FileProvider, MaybeContent};
use crate::api::{ApiError, BitbucketServerApi};
use crate::context::ContextParser;
use crate::protocol::{Commit, Repository, User};

/// [`FileProvider`] backed by Bitbucket Server's raw-content endpoint.
pub struct BitbucketServerFileProvider {
    api: Arc<BitbucketServerApi>,
    parser: Arc<ContextParser>,
}

impl BitbucketServerFileProvider {
    pub fn new(api: Arc<BitbucketServerApi>, parser: Arc<ContextParser>) -> Self {
        Self { api, parser }
    }

    async fn read(
        &self,
        user: &User,
        web_url: &str,
        revision: &str,
        path: &str,
    ) -> Result<String, ApiError> {
        let repo = self.parser.parse_url(web_url)?;
        self.api
            .get_raw_content(user, &repo, path, Some(revision))
            .await
    }
}

#[async_trait]
impl FileProvider for BitbucketServerFileProvider {
    async fn get_file_content(&self, commit: &Commit, user: &User, path: &str) -> MaybeContent {
        let (Some(revision), Some(web_url)) = (
            commit.revision.as_deref().filter(|s| !s.is_empty()),
            commit.repository.web_url.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return None;
        };

        match self.read(user, web_url, revision, path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    repository = web_url,
                    path,
                    error = %e,
                    "Unable to read file content"
                );
                None
            }
        }
    }

    async fn get_last_change_revision(
        &self,
        repository: &Repository,
        revision_or_branch: &str,
        user: &User,
        path: &str,
    ) -> Result<Option<String>, ApiError> {
        let url = repository
            .web_url
            .as_deref()
            .unwrap_or(&repository.clone_url);
        let repo = self.parser.parse_url(url)?;

        let commit = self
            .api
            .get_last_commit(user, &repo, path, revision_or_branch)
            .await?;
        Ok(commit.map(|c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_for, provider, user, TEST_HOST};
    use mockito::Matcher;

    fn provider_for(server: &mockito::ServerGuard) -> BitbucketServerFileProvider {
        BitbucketServerFileProvider::new(
            Arc::new(api_for(server)),
            Arc::new(ContextParser::new(provider())),
        )
    }

    fn repository() -> Repository {
        Repository {
            host: TEST_HOST.into(),
            owner: "FOO".into(),
            name: "repo123".into(),
            clone_url: format!("https://{}/scm/foo/repo123.git", TEST_HOST),
            web_url: Some(format!("https://{}/projects/FOO/repos/repo123", TEST_HOST)),
        }
    }

    fn commit(revision: Option<&str>) -> Commit {
        Commit {
            repository: repository(),
            revision: revision.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_gitpod_file_is_read_at_revision() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/raw/.gitpod.yml")
            .match_query(Matcher::UrlEncoded("at".into(), "a1b2c3".into()))
            .with_status(200)
            .with_body("image: gitpod/workspace-full\n")
            .create_async()
            .await;

        let files = provider_for(&server);
        let content = files.get_gitpod_file_content(&commit(Some("a1b2c3")), &user()).await;

        assert_eq!(content.as_deref(), Some("image: gitpod/workspace-full\n"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_revision_or_web_url_is_absent_without_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let files = provider_for(&server);

        assert!(files.get_gitpod_file_content(&commit(None), &user()).await.is_none());

        let mut no_web_url = commit(Some("a1b2c3"));
        no_web_url.repository.web_url = None;
        assert!(files.get_gitpod_file_content(&no_web_url, &user()).await.is_none());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_revision_or_web_url_is_absent_without_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let files = provider_for(&server);

        assert!(files.get_gitpod_file_content(&commit(Some("")), &user()).await.is_none());

        let mut empty_web_url = commit(Some("a1b2c3"));
        empty_web_url.repository.web_url = Some(String::new());
        assert!(files.get_gitpod_file_content(&empty_web_url, &user()).await.is_none());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remote_failure_is_absent() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/raw/.gitpod.yml")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"errors":[{"message":"The path \".gitpod.yml\" does not exist"}]}"#)
            .create_async()
            .await;

        let files = provider_for(&server);
        assert!(files.get_gitpod_file_content(&commit(Some("main")), &user()).await.is_none());
    }

    #[tokio::test]
    async fn test_foreign_host_is_absent() {
        let server = mockito::Server::new_async().await;
        let files = provider_for(&server);
        let mut foreign = commit(Some("main"));
        foreign.repository.web_url = Some("https://github.com/gitpod-io/gitpod".into());

        assert!(files.get_file_content(&foreign, &user(), "README.md").await.is_none());
    }

    #[tokio::test]
    async fn test_last_change_revision_resolves_latest_commit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/commits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("path".into(), ".gitpod.yml".into()),
                Matcher::UrlEncoded("until".into(), "main".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"isLastPage":true,"values":[{"id":"8d51122def5632836d1cb1026e879069e10a1e13","displayId":"8d51122def5"}]}"#)
            .create_async()
            .await;

        let files = provider_for(&server);
        let revision = files
            .get_last_change_revision(&repository(), "main", &user(), ".gitpod.yml")
            .await
            .unwrap();

        assert_eq!(
            revision.as_deref(),
            Some("8d51122def5632836d1cb1026e879069e10a1e13")
        );
    }

    #[tokio::test]
    async fn test_last_change_revision_none_when_path_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"isLastPage":true,"values":[]}"#)
            .create_async()
            .await;

        let files = provider_for(&server);
        let revision = files
            .get_last_change_revision(&repository(), "main", &user(), "missing.txt")
            .await
            .unwrap();

        assert!(revision.is_none());
    }

    #[tokio::test]
    async fn test_last_change_revision_propagates_remote_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/commits")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let files = provider_for(&server);
        let err = files
            .get_last_change_revision(&repository(), "main", &user(), ".gitpod.yml")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
    }
}
