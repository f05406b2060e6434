//
//  bbs-prebuilds
//  cli/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-invocation wiring: configuration, acting user and collaborators.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::BitbucketServerApi;
use crate::auth::{KeyringTokenGateway, StaticTokenGateway, TokenGateway};
use crate::config::Config;
use crate::context::{ContextParser, RepositoryCoordinates};
use crate::output::{OutputFormat, OutputWriter};
use crate::protocol::{Identity, User};

use super::GlobalOptions;

/// Environment variable that supplies a token without touching the keyring.
pub const TOKEN_ENV: &str = "BBS_TOKEN";

const DEFAULT_USER_ID: &str = "local";

/// Everything a command needs to talk to the configured server.
pub struct Session {
    pub config: Config,
    pub user: User,
    pub parser: Arc<ContextParser>,
    pub api: Arc<BitbucketServerApi>,
}

impl Session {
    pub fn load(global: &GlobalOptions) -> Result<Self> {
        let config = load_config(global)?;
        let user = acting_user(&config, global);
        let parser = Arc::new(ContextParser::new(config.provider.clone()));
        let api = BitbucketServerApi::new(
            &config.provider,
            &config.api,
            token_gateway(&config.provider.host),
        )
        .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            user,
            parser,
            api: Arc::new(api),
        })
    }

    pub fn resolve(&self, url: &str) -> Result<RepositoryCoordinates> {
        Ok(self.parser.parse_url(url)?)
    }
}

pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    Config::load(global.config.as_deref())
}

pub fn writer(global: &GlobalOptions) -> OutputWriter {
    OutputWriter::new(OutputFormat::from_json_flag(global.json))
}

/// The user the CLI acts as, linked to the configured provider when an
/// auth name is known.
pub fn acting_user(config: &Config, global: &GlobalOptions) -> User {
    let id = global
        .user_id
        .clone()
        .or_else(|| config.identity.user_id.clone())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
    let auth_name = global
        .auth_name
        .clone()
        .or_else(|| config.identity.auth_name.clone());

    User {
        id,
        name: None,
        identities: auth_name
            .map(|auth_name| Identity {
                auth_id: auth_name.clone(),
                auth_name,
                auth_provider_id: config.provider.id.clone(),
            })
            .into_iter()
            .collect(),
    }
}

fn token_gateway(host: &str) -> Arc<dyn TokenGateway> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            tracing::debug!("Using token from {}", TOKEN_ENV);
            Arc::new(StaticTokenGateway::new(token.trim()))
        }
        _ => Arc::new(KeyringTokenGateway::new(host)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_toml(
            r#"
[provider]
id = "MyBitbucketServer"
host = "bitbucket.gitpod-self-hosted.com"

[platform]
host_url = "https://gitpod.example.com/"

[identity]
user_id = "user1"
auth_name = "AlexTugarev"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_acting_user_from_config() {
        let user = acting_user(&config(), &GlobalOptions::default());

        assert_eq!(user.id, "user1");
        let identity = user.identity_for("MyBitbucketServer").unwrap();
        assert_eq!(identity.auth_name, "AlexTugarev");
    }

    #[test]
    fn test_flags_override_config_identity() {
        let global = GlobalOptions {
            user_id: Some("user2".into()),
            auth_name: Some("jldec".into()),
            ..Default::default()
        };
        let user = acting_user(&config(), &global);

        assert_eq!(user.id, "user2");
        assert_eq!(user.identities[0].auth_name, "jldec");
    }

    #[test]
    fn test_no_auth_name_means_no_identity() {
        let mut config = config();
        config.identity = Default::default();
        let user = acting_user(&config, &GlobalOptions::default());

        assert_eq!(user.id, "local");
        assert!(user.identities.is_empty());
    }
}
