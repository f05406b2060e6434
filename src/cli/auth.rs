//
//  bbs-prebuilds
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Token management for the configured Bitbucket Server host.
//!
//! The token is a Bitbucket Server personal access token with repository
//! admin permission, stored in the system keyring under the provider host.
//! Setting `BBS_TOKEN` bypasses the keyring entirely.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::Term;

use crate::auth::{read_token_from_stdin, validate_token, KeyringStore};

use super::session::{load_config, TOKEN_ENV};
use super::GlobalOptions;

/// Manage the stored Bitbucket Server token
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a personal access token for the configured host
    Login(LoginArgs),

    /// Remove the stored token
    Logout,

    /// Show whether a token is available
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read token from standard input
    #[arg(long)]
    pub with_token: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the token (masked)
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let host = load_config(global)?.provider.host;
        match &self.command {
            AuthSubcommand::Login(args) => login(args, &host),
            AuthSubcommand::Logout => logout(&host),
            AuthSubcommand::Status(args) => status(args, &host),
        }
    }
}

fn login(args: &LoginArgs, host: &str) -> Result<()> {
    let token = if args.with_token {
        read_token_from_stdin()?
    } else {
        println!("To create a Personal Access Token:");
        println!("  1. Go to https://{}/plugins/servlet/access-tokens/manage", host);
        println!("  2. Click 'Create token' and grant repository admin permission");
        println!("  3. Copy the generated token");
        println!();
        let term = Term::stderr();
        term.write_str("Personal Access Token: ")?;
        term.read_secure_line()?
    };

    if !validate_token(&token) {
        bail!("Invalid token format");
    }

    KeyringStore::new().store(host, token.trim())?;
    println!("Token stored for {}", host);
    Ok(())
}

fn logout(host: &str) -> Result<()> {
    KeyringStore::new().delete(host)?;
    println!("Logged out of {}", host);
    Ok(())
}

fn status(args: &StatusArgs, host: &str) -> Result<()> {
    println!("{}", host);

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            println!("  Source: {} environment variable", TOKEN_ENV);
            if args.show_token {
                println!("  Token: {}", mask_token(token.trim()));
            }
            return Ok(());
        }
    }

    match KeyringStore::new().get(host)? {
        Some(token) => {
            println!("  Source: system keyring");
            if args.show_token {
                println!("  Token: {}", mask_token(&token));
            }
        }
        None => {
            println!("  Not logged in");
            println!();
            println!("Run 'bbs auth login' to store a token");
        }
    }
    Ok(())
}

/// Masks a token for display (shows first and last 4 characters).
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token("NjM0NTY3ODkwOnRlc3Q"), "NjM0...lc3Q");
    }
}
