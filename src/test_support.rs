//
//  bbs-prebuilds
//  test_support.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::api::BitbucketServerApi;
use crate::auth::StaticTokenGateway;
use crate::config::{ApiSettings, ProviderConfig};
use crate::context::{RepositoryCoordinates, ResourceKind};
use crate::protocol::{Identity, User};

pub const TEST_HOST: &str = "bitbucket.gitpod-self-hosted.com";
pub const TEST_PROVIDER_ID: &str = "MyBitbucketServer";
pub const TEST_TOKEN: &str = "NjM0NTY3ODkwOnRlc3Q";

pub fn provider() -> ProviderConfig {
    ProviderConfig::new(TEST_PROVIDER_ID, TEST_HOST)
}

/// A user linked to the test provider as `AlexTugarev`.
pub fn user() -> User {
    User {
        id: "user1".into(),
        name: Some("Alex".into()),
        identities: vec![Identity {
            auth_id: "1".into(),
            auth_name: "AlexTugarev".into(),
            auth_provider_id: TEST_PROVIDER_ID.into(),
        }],
    }
}

pub fn coords(owner: &str, slug: &str) -> RepositoryCoordinates {
    RepositoryCoordinates {
        host: TEST_HOST.into(),
        resource_kind: ResourceKind::Projects,
        owner: owner.into(),
        repository_slug: slug.into(),
    }
}

/// A client pointed at a mock server, authenticating with [`TEST_TOKEN`].
pub fn api_for(server: &mockito::ServerGuard) -> BitbucketServerApi {
    BitbucketServerApi::new(
        &provider(),
        &ApiSettings::default(),
        Arc::new(StaticTokenGateway::new(TEST_TOKEN)),
    )
    .expect("client")
    .with_server_url(&server.url())
}
