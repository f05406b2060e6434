//
//  bbs-prebuilds
//  cli/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbs file` - print a file at a revision.
//!
//! ```bash
//! # .gitpod.yml on the default branch
//! bbs file https://bitbucket.example.com/projects/FOO/repos/repo123
//!
//! # Any path at a given revision
//! bbs file https://bitbucket.example.com/projects/FOO/repos/repo123 README.md --revision main
//!
//! # Latest commit touching the path
//! bbs file https://bitbucket.example.com/projects/FOO/repos/repo123 --last-change
//! ```

use anyhow::{bail, Result};
use clap::Args;

use crate::protocol::{Commit, Repository};
use crate::repohost::{BitbucketServerFileProvider, FileProvider, GITPOD_FILE};

use super::session::Session;
use super::GlobalOptions;

/// Print a file from a repository
#[derive(Args, Debug)]
pub struct FileCommand {
    /// Repository URL
    pub url: String,

    /// Path of the file inside the repository
    #[arg(default_value = GITPOD_FILE)]
    pub path: String,

    /// Revision or branch to read at (default: the default branch)
    #[arg(long, short = 'r')]
    pub revision: Option<String>,

    /// Print the revision that last changed the file instead of its content
    #[arg(long)]
    pub last_change: bool,
}

impl FileCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::load(global)?;
        let coords = session.resolve(&self.url)?;

        let revision = match self.revision {
            Some(ref revision) => revision.clone(),
            None => {
                session
                    .api
                    .get_default_branch(&session.user, &coords)
                    .await?
                    .id
            }
        };

        let repository = Repository {
            host: coords.host.clone(),
            owner: coords.owner.clone(),
            name: coords.repository_slug.clone(),
            clone_url: self.url.clone(),
            web_url: Some(coords.web_url()),
        };
        let files = BitbucketServerFileProvider::new(session.api.clone(), session.parser.clone());

        if self.last_change {
            return match files
                .get_last_change_revision(&repository, &revision, &session.user, &self.path)
                .await?
            {
                Some(commit_id) => {
                    println!("{}", commit_id);
                    Ok(())
                }
                None => bail!("No commit on {} touches {}", revision, self.path),
            };
        }

        let commit = Commit {
            repository,
            revision: Some(revision.clone()),
        };
        match files.get_file_content(&commit, &session.user, &self.path).await {
            Some(content) => {
                print!("{}", content);
                Ok(())
            }
            None => bail!("{} not found at {} (see BBS_DEBUG=debug for details)", self.path, revision),
        }
    }
}
