//
//  bbs-prebuilds
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination for Bitbucket Server list endpoints
//!
//! Bitbucket Server uses offset-based pagination with `start` and `limit`
//! query parameters. Every list response is wrapped in the same envelope:
//!
//! ```json
//! {"size": 1, "limit": 25, "isLastPage": false, "nextPageStart": 25, "start": 0, "values": [...]}
//! ```
//!
//! [`ServerPaginatedResponse`] models one page, and [`Pager`] walks the pages
//! lazily. Decisions that depend on a listing (is a webhook installed? is the
//! user an admin?) must consume every page, so callers usually finish with
//! [`Pager::collect_all`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::api::client::BitbucketServerApi;
use crate::protocol::User;

/// Paginated response from Bitbucket Server.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `values` | `Vec<T>` | Items in the current page |
/// | `size` | `u32` | Number of items in the current page |
/// | `limit` | `u32` | Maximum items per page (requested) |
/// | `is_last_page` | `bool` | Whether this is the final page |
/// | `next_page_start` | `Option<u32>` | Start index for the next page |
/// | `start` | `u32` | Start index of the current page |
///
/// # Example
///
/// ```rust
/// use bbs_prebuilds::api::common::ServerPaginatedResponse;
///
/// let json = r#"{"values": [1, 2], "size": 2, "limit": 2, "isLastPage": false, "nextPageStart": 2, "start": 0}"#;
/// let page: ServerPaginatedResponse<u32> = serde_json::from_str(json).unwrap();
///
/// assert!(page.has_next());
/// assert_eq!(page.next_start(), Some(2));
/// ```
///
/// # Notes
///
/// - A response without `isLastPage` is treated as the last page
/// - A missing `values` array is treated as empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPaginatedResponse<T> {
    /// Array of items in the current page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,

    /// Number of items in the current page.
    #[serde(default)]
    pub size: u32,

    /// Maximum items per page (as requested).
    #[serde(default)]
    pub limit: u32,

    /// Indicates whether this is the last page of results.
    #[serde(default = "default_is_last_page", rename = "isLastPage")]
    pub is_last_page: bool,

    /// Start index for the next page of results.
    /// Will be `None` when `is_last_page` is `true`.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u32>,

    /// Start index of the current page (0-indexed).
    #[serde(default)]
    pub start: u32,
}

fn default_is_last_page() -> bool {
    true
}

impl<T> ServerPaginatedResponse<T> {
    /// Checks if there are more pages of results available.
    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }

    /// Returns the start index for the next page of results.
    ///
    /// Returns `None` on the last page, when `nextPageStart` is missing, or
    /// when it would not advance past `start`.
    pub fn next_start(&self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }
        self.next_page_start.filter(|next| *next > self.start)
    }
}

/// A lazy, restartable walk over the pages of a Bitbucket Server listing.
///
/// Nothing is fetched until [`next_page`](Self::next_page) is called. After
/// the last page the pager reports `None`; [`restart`](Self::restart) rewinds
/// it to the first page so the same listing can be re-read (for example to
/// verify a write).
///
/// # Example
///
/// ```rust,no_run
/// use bbs_prebuilds::api::server::Webhook;
/// # async fn example(api: &bbs_prebuilds::api::BitbucketServerApi, user: &bbs_prebuilds::protocol::User) -> Result<(), bbs_prebuilds::api::ApiError> {
/// let mut pager = api.pager::<Webhook>(user, "/projects/FOO/repos/bar/webhooks");
/// while let Some(page) = pager.next_page().await? {
///     println!("{} hooks on this page", page.values.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pager<'a, T> {
    api: &'a BitbucketServerApi,
    user: &'a User,
    path: String,
    limit: u32,
    next: Option<u32>,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Pager<'a, T> {
    pub(crate) fn new(api: &'a BitbucketServerApi, user: &'a User, path: String, limit: u32) -> Self {
        Self {
            api,
            user,
            path,
            limit,
            next: Some(0),
            _marker: std::marker::PhantomData,
        }
    }

    /// Fetches the next page, or `None` once the listing is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<ServerPaginatedResponse<T>>, ApiError> {
        let Some(start) = self.next else {
            return Ok(None);
        };

        let separator = if self.path.contains('?') { '&' } else { '?' };
        let path = format!("{}{}start={}&limit={}", self.path, separator, start, self.limit);
        let page: ServerPaginatedResponse<T> = self.api.get(self.user, &path).await?;

        self.next = if page.values.is_empty() {
            None
        } else {
            page.next_start()
        };
        Ok(Some(page))
    }

    /// Rewinds to the first page.
    pub fn restart(&mut self) {
        self.next = Some(0);
    }

    /// Consumes the remaining pages and returns every item.
    pub async fn collect_all(&mut self) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.values);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_envelope_fields_mean_single_page() {
        let page: ServerPaginatedResponse<u32> = serde_json::from_str("{}").unwrap();

        assert!(page.values.is_empty());
        assert!(!page.has_next());
        assert_eq!(page.next_start(), None);
    }

    #[test]
    fn test_next_start_prefers_server_value() {
        let json = r#"{"values":[1,2,3],"size":3,"limit":3,"isLastPage":false,"nextPageStart":3,"start":0}"#;
        let page: ServerPaginatedResponse<u32> = serde_json::from_str(json).unwrap();

        assert_eq!(page.next_start(), Some(3));
    }

    #[test]
    fn test_missing_next_page_start_ends_walk() {
        let json = r#"{"values":[1,2],"size":2,"limit":2,"isLastPage":false,"start":4}"#;
        let page: ServerPaginatedResponse<u32> = serde_json::from_str(json).unwrap();

        assert!(page.has_next());
        assert_eq!(page.next_start(), None);
    }

    #[test]
    fn test_next_start_never_moves_backwards() {
        let json = r#"{"values":[1],"size":1,"limit":1,"isLastPage":false,"nextPageStart":2,"start":2}"#;
        let page: ServerPaginatedResponse<u32> = serde_json::from_str(json).unwrap();

        assert_eq!(page.next_start(), None);
    }
}
