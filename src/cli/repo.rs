//
//  bbs-prebuilds
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository metadata commands
//!
//! ## Examples
//!
//! ```bash
//! bbs repo view https://bitbucket.example.com/projects/FOO/repos/repo123
//! bbs repo default-branch https://bitbucket.example.com/scm/foo/repo123.git
//! bbs repo commits https://bitbucket.example.com/projects/FOO/repos/repo123 --limit 5
//! ```

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::{Args, Subcommand};
use console::style;

use crate::api::server::{Branch, Commit, Repository};
use crate::output::{print_field, print_header, truncate, TableOutput};

use super::session::{writer, Session};
use super::GlobalOptions;

/// Read repository metadata
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// Show repository details
    View(UrlArgs),

    /// Show the default branch
    #[command(name = "default-branch")]
    DefaultBranch(UrlArgs),

    /// List recent commits
    Commits(CommitsArgs),
}

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Repository URL
    pub url: String,
}

#[derive(Args, Debug)]
pub struct CommitsArgs {
    /// Repository URL
    pub url: String,

    /// Maximum number of commits to show
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: u32,
}

impl TableOutput for Repository {
    fn print_table(&self, color: bool) {
        print_header(&format!("{}/{}", self.project.key, self.slug));
        print_field("Name", &self.name, color);
        if let Some(ref description) = self.description {
            print_field("Description", description, color);
        }
        print_field("Project", &self.project.name, color);
        print_field("Public", &self.is_public.to_string(), color);
        if let Some(ref state) = self.state {
            print_field("State", state, color);
        }
        if let Some(url) = self.clone_url("http") {
            print_field("Clone (http)", url, color);
        }
        if let Some(url) = self.clone_url("ssh") {
            print_field("Clone (ssh)", url, color);
        }
        if let Some(url) = self.web_url() {
            print_field("Web", url, color);
        }
    }
}

impl TableOutput for Branch {
    fn print_table(&self, color: bool) {
        print_field("Branch", &self.display_id, color);
        print_field("Ref", &self.id, color);
        if let Some(ref commit) = self.latest_commit {
            print_field("Latest commit", commit, color);
        }
    }
}

impl TableOutput for Commit {
    fn print_table(&self, color: bool) {
        let author = self
            .author
            .as_ref()
            .and_then(|a| a.display_name.as_deref().or(Some(a.name.as_str())))
            .unwrap_or("-");
        let date = self
            .author_timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let message = self
            .message
            .as_deref()
            .and_then(|m| m.lines().next())
            .unwrap_or("");

        let id = if color {
            style(&self.display_id).yellow().to_string()
        } else {
            self.display_id.clone()
        };
        println!("{} {:<10} {:<20} {}", id, date, truncate(author, 20), truncate(message, 60));
    }
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::load(global)?;
        let writer = writer(global);

        match &self.command {
            RepoSubcommand::View(args) => {
                let coords = session.resolve(&args.url)?;
                let repo = session.api.get_repository(&session.user, &coords).await?;
                writer.write(&repo)
            }
            RepoSubcommand::DefaultBranch(args) => {
                let coords = session.resolve(&args.url)?;
                let branch = session.api.get_default_branch(&session.user, &coords).await?;
                writer.write(&branch)
            }
            RepoSubcommand::Commits(args) => {
                let coords = session.resolve(&args.url)?;
                let page = session
                    .api
                    .get_commits(&session.user, &coords, Some(args.limit))
                    .await?;
                if page.values.is_empty() && !global.json {
                    println!("No commits found.");
                    return Ok(());
                }
                writer.write_list(&page.values)
            }
        }
    }
}
