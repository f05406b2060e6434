//
//  bbs-prebuilds
//  cli/webhook.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Webhook inspection commands
//!
//! ```bash
//! bbs webhook list https://bitbucket.example.com/projects/FOO/repos/repo123
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::api::server::Webhook;
use crate::output::{truncate, TableOutput};

use super::session::{writer, Session};
use super::GlobalOptions;

/// Inspect repository webhooks
#[derive(Args, Debug)]
pub struct WebhookCommand {
    #[command(subcommand)]
    pub command: WebhookSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WebhookSubcommand {
    /// List webhooks (requires repository admin)
    #[command(visible_alias = "ls")]
    List {
        /// Repository URL
        url: String,
    },
}

impl TableOutput for Webhook {
    fn print_table(&self, color: bool) {
        let status = match (self.active, color) {
            (true, true) => style("active").green().to_string(),
            (false, true) => style("inactive").red().to_string(),
            (true, false) => "active".to_string(),
            (false, false) => "inactive".to_string(),
        };
        println!(
            "{:<6} {:<10} {:<24} {}",
            self.id,
            status,
            truncate(self.name.as_deref().unwrap_or("-"), 24),
            truncate(&redact_token(self.url.as_deref().unwrap_or("-")), 60)
        );
    }
}

/// Hides the query credential of a delivery URL.
fn redact_token(url: &str) -> String {
    match url.split_once("token=") {
        Some((head, _)) => format!("{}token=***", head),
        None => url.to_string(),
    }
}

impl WebhookCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WebhookSubcommand::List { url } => list(url, global).await,
        }
    }
}

async fn list(url: &str, global: &GlobalOptions) -> Result<()> {
    let session = Session::load(global)?;
    let coords = session.resolve(url)?;
    let hooks = session.api.get_webhooks(&session.user, &coords).await?;

    if global.json {
        return writer(global).write_list(&hooks);
    }
    if hooks.is_empty() {
        println!("No webhooks found.");
        return Ok(());
    }

    println!(
        "{} {} {} {}",
        style(format!("{:<6}", "ID")).bold(),
        style(format!("{:<10}", "STATUS")).bold(),
        style(format!("{:<24}", "NAME")).bold(),
        style("URL").bold()
    );
    writer(global).write_list(&hooks)?;
    println!();
    println!("Showing {} webhook(s)", hooks.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_token() {
        assert_eq!(
            redact_token("https://gitpod.example.com/apps/bitbucket-server/?token=user1%7Cabc"),
            "https://gitpod.example.com/apps/bitbucket-server/?token=***"
        );
        assert_eq!(redact_token("https://ci.example.com/hook"), "https://ci.example.com/hook");
    }
}
