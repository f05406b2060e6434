//
//  bbs-prebuilds
//  cli/parse.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `bbs parse` - resolve a URL without contacting the server.
//!
//! ```bash
//! bbs parse https://bitbucket.example.com/scm/~jldec/test-repo.git
//! bbs parse ssh://git@bitbucket.example.com:7999/foo/repo123.git --json
//! ```

use anyhow::Result;
use clap::Args;

use crate::context::{ContextParser, RepositoryCoordinates};
use crate::output::{print_field, TableOutput};

use super::session::{load_config, writer};
use super::GlobalOptions;

/// Resolve a repository URL into coordinates
#[derive(Args, Debug)]
pub struct ParseCommand {
    /// Clone, browse or ssh URL of the repository
    pub url: String,
}

impl TableOutput for RepositoryCoordinates {
    fn print_table(&self, color: bool) {
        print_field("Repository", &self.full_name(), color);
        print_field("Host", &self.host, color);
        print_field("Kind", self.resource_kind.as_str(), color);
        print_field("Owner", &self.owner, color);
        print_field("Slug", &self.repository_slug, color);
        print_field("Web URL", &self.web_url(), color);
    }
}

impl ParseCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = load_config(global)?;
        let parser = ContextParser::new(config.provider);

        let coords = parser.parse_url(&self.url)?;
        writer(global).write(&coords)
    }
}
