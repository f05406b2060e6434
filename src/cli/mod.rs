//
//  bbs-prebuilds
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod file;
mod parse;
mod prebuilds;
mod repo;
mod session;
mod webhook;

pub use auth::AuthCommand;
pub use file::FileCommand;
pub use parse::ParseCommand;
pub use prebuilds::PrebuildsCommand;
pub use repo::RepoCommand;
pub use session::Session;
pub use webhook::WebhookCommand;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bbs - Bitbucket Server prebuild integration
#[derive(Parser, Debug)]
#[command(
    name = "bbs",
    version,
    about = "Resolve, inspect and provision Bitbucket Server repositories for prebuilds",
    long_about = "bbs drives the Bitbucket Server integration from the command line.\n\n\
                  It resolves repository URLs, reads repository metadata and files, \
                  and installs the webhook that triggers automated prebuilds.",
    propagate_version = true,
    after_help = "Use 'bbs <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true, env = "BBS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Platform user id to act as (overrides [identity].user_id)
    #[arg(long, global = true, env = "BBS_USER_ID")]
    pub user_id: Option<String>,

    /// Bitbucket Server login name of the acting user (overrides [identity].auth_name)
    #[arg(long, global = true, env = "BBS_AUTH_NAME")]
    pub auth_name: Option<String>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a repository URL into coordinates
    Parse(ParseCommand),

    /// Read repository metadata
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Inspect repository webhooks
    Webhook(WebhookCommand),

    /// Check and install automated prebuilds
    #[command(visible_alias = "pb")]
    Prebuilds(PrebuildsCommand),

    /// Print a file from a repository
    File(FileCommand),

    /// Manage the stored Bitbucket Server token
    Auth(AuthCommand),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bbs",
            "prebuilds",
            "check",
            "https://bitbucket.example.com/projects/FOO/repos/bar",
            "--json",
            "--auth-name",
            "AlexTugarev",
        ])
        .unwrap();

        assert!(cli.global.json);
        assert_eq!(cli.global.auth_name.as_deref(), Some("AlexTugarev"));
        assert!(matches!(cli.command, Commands::Prebuilds(_)));
    }
}
