//
//  bbs-prebuilds
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bbs_prebuilds::api::ApiError;
use bbs_prebuilds::cli::{Cli, Commands};
use bbs_prebuilds::exit_codes;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBS_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Maps the first [`ApiError`] in the chain to a stable exit code.
fn exit_code(error: &anyhow::Error) -> i32 {
    let Some(api_error) = error.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
        return exit_codes::ERROR;
    };

    match api_error {
        ApiError::InvalidUrl(_) | ApiError::ProviderMismatch { .. } | ApiError::Config(_) => {
            exit_codes::USAGE
        }
        ApiError::Token(_) => exit_codes::AUTH_ERROR,
        ApiError::Remote { status: 401 | 403, .. } => exit_codes::AUTH_ERROR,
        ApiError::Remote { status: 404, .. } => exit_codes::NOT_FOUND,
        ApiError::Remote { .. } | ApiError::Network(_) => exit_codes::REMOTE_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Parse(cmd) => cmd.run(&cli.global).await,
        Commands::Repo(cmd) => cmd.run(&cli.global).await,
        Commands::Webhook(cmd) => cmd.run(&cli.global).await,
        Commands::Prebuilds(cmd) => cmd.run(&cli.global).await,
        Commands::File(cmd) => cmd.run(&cli.global).await,
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("{} version {}", bbs_prebuilds::APP_NAME, bbs_prebuilds::VERSION);
            Ok(())
        }
    }
}
