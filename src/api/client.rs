//
//  bbs-prebuilds
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Bitbucket Server REST API
//!
//! [`BitbucketServerApi`] executes authenticated calls against
//! `https://{host}/rest/api/1.0{path}`.
//!
//! ## Features
//!
//! - Bearer token per call, obtained from a [`TokenGateway`]
//! - Bounded per-request timeout (10 seconds unless configured otherwise)
//! - Any non-2xx response becomes [`ApiError::Remote`]; nothing is retried
//! - One `debug` record per call with its outcome (`OK` or `error <message>`)
//! - Typed wrappers for the repository, commit, branch, webhook and
//!   permission endpoints, with full pagination for listings

use std::sync::Arc;

use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::common::{ApiError, Pager, ServerPaginatedResponse};
use super::server::{Branch, Commit, PermissionEntry, Repository, Webhook, WebhookParams};
use crate::auth::TokenGateway;
use crate::config::{ApiSettings, ProviderConfig};
use crate::context::RepositoryCoordinates;
use crate::protocol::User;

/// Authenticated client for one Bitbucket Server instance.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bbs_prebuilds::api::BitbucketServerApi;
/// use bbs_prebuilds::auth::StaticTokenGateway;
/// use bbs_prebuilds::config::{ApiSettings, ProviderConfig};
///
/// let provider = ProviderConfig::new("MyBitbucketServer", "bitbucket.example.com");
/// let api = BitbucketServerApi::new(
///     &provider,
///     &ApiSettings::default(),
///     Arc::new(StaticTokenGateway::new("NjM0NTY3ODkw")),
/// )?;
///
/// assert_eq!(api.base_url(), "https://bitbucket.example.com/rest/api/1.0");
/// # Ok::<(), bbs_prebuilds::api::ApiError>(())
/// ```
pub struct BitbucketServerApi {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenGateway>,
    page_limit: u32,
}

impl BitbucketServerApi {
    /// Creates a client for the configured provider host.
    pub fn new(
        provider: &ProviderConfig,
        settings: &ApiSettings,
        tokens: Arc<dyn TokenGateway>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(format!("bbs/{}", crate::VERSION))
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: format!("https://{}/rest/api/1.0", provider.host),
            tokens,
            page_limit: settings.page_limit.max(1),
        })
    }

    /// Points the client at a different server root, e.g. a local mock.
    ///
    /// `server_url` is the part before `/rest/api/1.0`.
    pub fn with_server_url(mut self, server_url: &str) -> Self {
        self.base_url = format!("{}/rest/api/1.0", server_url.trim_end_matches('/'));
        self
    }

    /// Base URL all request paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Executes a request and decodes the JSON response into `T`.
    ///
    /// An empty response body decodes as JSON `null`, so `T = ()` or
    /// `Option<_>` work for endpoints answering `204 No Content`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Token`] if no token is available for `user`
    /// - [`ApiError::Remote`] on any non-2xx status
    /// - [`ApiError::Network`] on transport failure or timeout
    /// - [`ApiError::Decode`] if the body is not a valid `T`
    pub async fn run_query<T, B>(
        &self,
        user: &User,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let result = async {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(header::ACCEPT, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let text = self.execute(user, request).await?;
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            Ok::<T, ApiError>(serde_json::from_str::<T>(text)?)
        }
        .await;

        log_outcome(&method, &url, &result);
        result
    }

    /// `GET` shorthand for [`run_query`](Self::run_query).
    pub async fn get<T: DeserializeOwned>(&self, user: &User, path: &str) -> Result<T, ApiError> {
        self.run_query::<T, ()>(user, path, Method::GET, None).await
    }

    /// Fetches a path and returns the body as raw text.
    ///
    /// Used for file contents, which are not necessarily JSON.
    pub async fn fetch_content(&self, user: &User, path: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let result = self.execute(user, self.http.get(&url)).await;

        log_outcome(&Method::GET, &url, &result);
        result
    }

    /// Starts a lazy page walk over a list endpoint.
    pub fn pager<'a, T: DeserializeOwned>(&'a self, user: &'a User, path: &str) -> Pager<'a, T> {
        Pager::new(self, user, path.to_string(), self.page_limit)
    }

    async fn execute(
        &self,
        user: &User,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ApiError> {
        let token = self.tokens.get_token_with_scopes(user, &[]).await?;
        let response = token.apply_to_request(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::remote(status, &text));
        }

        Ok(response.text().await?)
    }

    /// `GET /{kind}/{owner}/repos/{slug}`
    pub async fn get_repository(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
    ) -> Result<Repository, ApiError> {
        self.get(user, &repo.repository_path()).await
    }

    /// `GET .../commits` - the first page of history, newest first.
    pub async fn get_commits(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
        limit: Option<u32>,
    ) -> Result<ServerPaginatedResponse<Commit>, ApiError> {
        let mut path = format!("{}/commits", repo.repository_path());
        if let Some(limit) = limit {
            path.push_str(&format!("?limit={}", limit));
        }
        self.get(user, &path).await
    }

    /// `GET .../default-branch`
    pub async fn get_default_branch(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
    ) -> Result<Branch, ApiError> {
        self.get(user, &format!("{}/default-branch", repo.repository_path()))
            .await
    }

    /// `GET .../webhooks`, every page.
    ///
    /// Requires repository admin rights on the server.
    pub async fn get_webhooks(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
    ) -> Result<Vec<Webhook>, ApiError> {
        self.pager(user, &format!("{}/webhooks", repo.repository_path()))
            .collect_all()
            .await
    }

    /// `POST .../webhooks`
    pub async fn set_webhook(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
        webhook: &WebhookParams,
    ) -> Result<Webhook, ApiError> {
        self.run_query(
            user,
            &format!("{}/webhooks", repo.repository_path()),
            Method::POST,
            Some(webhook),
        )
        .await
    }

    /// `GET .../permissions/users`, every page.
    pub async fn get_repository_permissions(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
    ) -> Result<Vec<PermissionEntry>, ApiError> {
        self.pager(user, &format!("{}/permissions/users", repo.repository_path()))
            .collect_all()
            .await
    }

    /// `GET .../raw/{path}[?at={revision}]`
    pub async fn get_raw_content(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
        file_path: &str,
        at: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut path = format!(
            "{}/raw/{}",
            repo.repository_path(),
            file_path.trim_start_matches('/')
        );
        if let Some(at) = at {
            path.push_str(&format!("?at={}", encode_query_value(at)));
        }
        self.fetch_content(user, &path).await
    }

    /// Latest commit touching `file_path`, reachable from `until`.
    ///
    /// `GET .../commits?path={file_path}&until={until}&limit=1`
    pub async fn get_last_commit(
        &self,
        user: &User,
        repo: &RepositoryCoordinates,
        file_path: &str,
        until: &str,
    ) -> Result<Option<Commit>, ApiError> {
        let path = format!(
            "{}/commits?path={}&until={}&limit=1",
            repo.repository_path(),
            encode_query_value(file_path.trim_start_matches('/')),
            encode_query_value(until),
        );
        let page: ServerPaginatedResponse<Commit> = self.get(user, &path).await?;
        Ok(page.values.into_iter().next())
    }
}

fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn log_outcome<T>(method: &Method, url: &str, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "OK".to_string(),
        Err(e) => format!("error {}", e),
    };
    tracing::debug!(method = %method, url, outcome = %outcome, "BBS request");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::{WebhookConfiguration, REFS_CHANGED_EVENT};
    use crate::test_support::{api_for, coords, user, TEST_TOKEN};
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_repository_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123")
            .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":1,"slug":"repo123","name":"repo123","project":{"id":2,"key":"FOO","name":"Foo"},"links":{}}"#,
            )
            .create_async()
            .await;

        let api = api_for(&server);
        let repo = api.get_repository(&user(), &coords("FOO", "repo123")).await.unwrap();

        assert_eq!(repo.slug, "repo123");
        assert_eq!(repo.project.key, "FOO");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_on_commits_is_remote_error_500() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/commits")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"errors":[{"message":"boom"}]}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let err = api
            .get_commits(&user(), &coords("FOO", "repo123"), Some(10))
            .await
            .unwrap_err();

        match err {
            ApiError::Remote { status, status_text, message } => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
                assert_eq!(message.as_deref(), Some("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_content_returns_raw_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/raw/.gitpod.yml")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("tasks:\n  - init: cargo build\n")
            .create_async()
            .await;

        let api = api_for(&server);
        let content = api
            .fetch_content(&user(), "/projects/FOO/repos/repo123/raw/.gitpod.yml")
            .await
            .unwrap();

        assert_eq!(content, "tasks:\n  - init: cargo build\n");
    }

    #[tokio::test]
    async fn test_raw_content_pins_revision() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/users/jldec/repos/test-repo/raw/docs/README.md")
            .match_query(Matcher::UrlEncoded("at".into(), "refs/heads/main".into()))
            .with_status(200)
            .with_body("# A B")
            .create_async()
            .await;

        let api = api_for(&server);
        let repo = RepositoryCoordinates {
            resource_kind: crate::context::ResourceKind::Users,
            ..coords("jldec", "test-repo")
        };
        let content = api
            .get_raw_content(&user(), &repo, "/docs/README.md", Some("refs/heads/main"))
            .await
            .unwrap();

        assert_eq!(content, "# A B");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhooks_are_read_across_pages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/webhooks")
            .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
            .with_status(200)
            .with_body(r#"{"size":1,"limit":1,"isLastPage":false,"nextPageStart":1,"start":0,"values":[{"id":1,"url":"https://a.example.com/"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/webhooks")
            .match_query(Matcher::UrlEncoded("start".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"size":1,"limit":1,"isLastPage":true,"start":1,"values":[{"id":2,"url":"https://b.example.com/"}]}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let hooks = api.get_webhooks(&user(), &coords("FOO", "repo123")).await.unwrap();

        let ids: Vec<u64> = hooks.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_pager_restart_rereads_first_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/permissions/users")
            .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
            .with_status(200)
            .with_body(r#"{"isLastPage":true,"values":[{"user":{"name":"AlexTugarev"},"permission":"REPO_ADMIN"}]}"#)
            .expect(2)
            .create_async()
            .await;

        let api = api_for(&server);
        let u = user();
        let mut pager = api.pager::<PermissionEntry>(&u, "/projects/FOO/repos/repo123/permissions/users");

        assert_eq!(pager.collect_all().await.unwrap().len(), 1);
        assert!(pager.next_page().await.unwrap().is_none());
        pager.restart();
        assert_eq!(pager.collect_all().await.unwrap().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_webhook_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/1.0/projects/FOO/repos/repo123/webhooks")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "prebuilds",
                "events": ["repo:refs_changed"],
                "active": true,
                "configuration": {"secret": "s3cret"}
            })))
            .with_status(201)
            .with_body(r#"{"id":42,"url":"https://gitpod.example.com/","active":true,"events":["repo:refs_changed"]}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let params = WebhookParams {
            name: "prebuilds".into(),
            events: vec![REFS_CHANGED_EVENT.into()],
            configuration: WebhookConfiguration { secret: "s3cret".into() },
            url: "https://gitpod.example.com/".into(),
            active: true,
        };
        let hook = api
            .set_webhook(&user(), &coords("FOO", "repo123"), &params)
            .await
            .unwrap();

        assert_eq!(hook.id, 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_last_commit_queries_path_and_until() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/commits")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("path".into(), ".gitpod.yml".into()),
                Matcher::UrlEncoded("until".into(), "main".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"isLastPage":true,"values":[{"id":"8d51122def5632836d1cb1026e879069e10a1e13","displayId":"8d51122def5"}]}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let commit = api
            .get_last_commit(&user(), &coords("FOO", "repo123"), ".gitpod.yml", "main")
            .await
            .unwrap();

        assert_eq!(commit.unwrap().display_id, "8d51122def5");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/1.0/projects/FOO/repos/repo123/default-branch")
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let api = api_for(&server);
        let err = api
            .get_default_branch(&user(), &coords("FOO", "repo123"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let api = BitbucketServerApi::new(
            &crate::test_support::provider(),
            &ApiSettings::default(),
            Arc::new(crate::auth::StaticTokenGateway::new("")),
        )
        .unwrap()
        .with_server_url(&server.url());
        let err = api.get_repository(&user(), &coords("FOO", "repo123")).await.unwrap_err();

        assert!(matches!(err, ApiError::Token(_)));
        mock.assert_async().await;
    }
}
