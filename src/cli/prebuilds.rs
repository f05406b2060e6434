//
//  bbs-prebuilds
//  cli/prebuilds.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Automated prebuild commands
//!
//! ```bash
//! # Can the acting user enable prebuilds here?
//! bbs prebuilds check https://bitbucket.example.com/projects/FOO/repos/repo123
//!
//! # Install the refs-changed webhook (no-op if already present)
//! bbs prebuilds install https://bitbucket.example.com/projects/FOO/repos/repo123
//! ```
//!
//! Callback tokens are minted by an in-process issuer, so they only verify
//! inside this invocation. Platform deployments plug in their own issuer.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::auth::LocalTokenIssuer;
use crate::output::{print_field, TableOutput};
use crate::prebuilds::{Authorization, BitbucketServerService, SIGNATURE_HEADER};
use crate::repohost::{InstallOutcome, RepositoryService};

use super::session::{writer, Session};
use super::GlobalOptions;

/// Check and install automated prebuilds
#[derive(Args, Debug)]
pub struct PrebuildsCommand {
    #[command(subcommand)]
    pub command: PrebuildsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrebuildsSubcommand {
    /// Check whether prebuilds can be installed
    Check {
        /// Repository clone or browse URL
        url: String,
    },

    /// Install the prebuild webhook
    Install {
        /// Repository clone or browse URL
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct PermissionCheck {
    url: String,
    authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl TableOutput for PermissionCheck {
    fn print_table(&self, color: bool) {
        let verdict = match (self.authorized, color) {
            (true, true) => style("yes").green().to_string(),
            (false, true) => style("no").red().to_string(),
            (true, false) => "yes".to_string(),
            (false, false) => "no".to_string(),
        };
        print_field("Repository", &self.url, color);
        print_field("Can install", &verdict, color);
        if let Some(ref reason) = self.reason {
            print_field("Reason", reason, color);
        }
    }
}

impl TableOutput for InstallOutcome {
    fn print_table(&self, color: bool) {
        match self {
            Self::AlreadyInstalled => print_field("Status", "already installed", color),
            Self::Installed { webhook_id, secret } => {
                print_field("Status", "installed", color);
                print_field("Webhook", &webhook_id.to_string(), color);
                print_field("Signing secret", secret, color);
                print_field("Signature header", SIGNATURE_HEADER, color);
            }
        }
    }
}

impl PrebuildsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::load(global)?;
        let service = BitbucketServerService::new(
            session.api.clone(),
            session.parser.clone(),
            session.config.platform.clone(),
            Arc::new(LocalTokenIssuer::new()),
        );
        let writer = writer(global);

        match &self.command {
            PrebuildsSubcommand::Check { url } => {
                let check = match service.check_install_permission(&session.user, url).await? {
                    Authorization::Authorized => PermissionCheck {
                        url: url.clone(),
                        authorized: true,
                        reason: None,
                    },
                    Authorization::Denied(reason) => PermissionCheck {
                        url: url.clone(),
                        authorized: false,
                        reason: Some(reason.to_string()),
                    },
                };
                writer.write(&check)
            }
            PrebuildsSubcommand::Install { url } => {
                let outcome = service
                    .install_automated_prebuilds(&session.user, url)
                    .await?;
                if matches!(outcome, InstallOutcome::Installed { .. }) && !global.json {
                    writer.write_success("Prebuild webhook installed");
                    writer.write_warning(
                        "store the signing secret now; it cannot be read back from the server",
                    );
                }
                writer.write(&outcome)
            }
        }
    }
}
