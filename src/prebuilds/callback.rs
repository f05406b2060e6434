//
//  bbs-prebuilds
//  prebuilds/callback.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The query credential carried by the webhook callback URL.
//!
//! ```text
//! https://gitpod.example.com/apps/bitbucket-server/?token=<userId>|<tokenValue>
//! ```

use std::fmt;

use url::Url;

/// Query parameter holding the credential.
pub const TOKEN_PARAM: &str = "token";

const SEPARATOR: char = '|';

/// Identifies the installing user and the scoped token a delivery presents.
#[derive(Clone, PartialEq, Eq)]
pub struct CallbackCredential {
    pub user_id: String,
    pub token: String,
}

impl CallbackCredential {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    /// `<userId>|<token>`, unencoded.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.user_id, SEPARATOR, self.token)
    }

    /// Parses `<userId>|<token>`. Both halves must be non-empty.
    ///
    /// User ids never contain the separator, so the first one splits.
    pub fn parse(value: &str) -> Option<Self> {
        let (user_id, token) = value.split_once(SEPARATOR)?;
        if user_id.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self::new(user_id, token))
    }

    /// `hook_url` with the credential appended as the `token` query parameter.
    pub fn to_hook_url(&self, hook_url: &Url) -> Url {
        let mut url = hook_url.clone();
        url.query_pairs_mut().append_pair(TOKEN_PARAM, &self.encode());
        url
    }

    /// Extracts the credential from a delivery URL.
    pub fn from_url(url: &Url) -> Option<Self> {
        url.query_pairs()
            .find(|(key, _)| key == TOKEN_PARAM)
            .and_then(|(_, value)| Self::parse(&value))
    }
}

impl fmt::Debug for CallbackCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCredential")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_url_carries_encoded_credential() {
        let hook_url = Url::parse("https://gitpod.example.com/apps/bitbucket-server/").unwrap();
        let credential = CallbackCredential::new("user1", "abc-123_XYZ");

        let url = credential.to_hook_url(&hook_url);

        assert_eq!(
            url.as_str(),
            "https://gitpod.example.com/apps/bitbucket-server/?token=user1%7Cabc-123_XYZ"
        );
        assert!(url.as_str().contains(hook_url.as_str()));
        assert_eq!(CallbackCredential::from_url(&url), Some(credential));
    }

    #[test]
    fn test_parse_rejects_incomplete_values() {
        assert_eq!(
            CallbackCredential::parse("user1|tok|en"),
            Some(CallbackCredential::new("user1", "tok|en"))
        );
        assert!(CallbackCredential::parse("user1").is_none());
        assert!(CallbackCredential::parse("|token").is_none());
        assert!(CallbackCredential::parse("user1|").is_none());
    }

    #[test]
    fn test_from_url_without_token_param() {
        let url = Url::parse("https://gitpod.example.com/?other=1").unwrap();
        assert!(CallbackCredential::from_url(&url).is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let credential = CallbackCredential::new("user1", "secret-value");
        assert!(!format!("{:?}", credential).contains("secret-value"));
    }
}
