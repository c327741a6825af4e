// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jb - drive automated test jobs on a Jenkins server

mod client;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{load_config, Client, Overrides};
use commands::{discover, execute, jobs, submit, test_list};
use error::JbError;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

/// Environment variable holding the log filter
const LOG_ENV: &str = "JB_LOG";

const CONFIG_HELP: &str = "\
Configuration is read from --config, or ./jb.toml when present, then
overridden by JB_URL, JB_USER and JB_TOKEN, then by --url and --user.
Set JB_LOG (e.g. JB_LOG=debug) to see each request on stderr.";

#[derive(Parser)]
#[command(
    name = "jb",
    version,
    about = "Discover and run automated tests on a Jenkins server",
    after_help = CONFIG_HELP
)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server base url
    #[arg(long, global = true)]
    url: Option<String>,

    /// User name for basic auth
    #[arg(long, global = true)]
    user: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the jobs that can be built
    Jobs,
    /// Run listing builds and print the tests each job exposes
    Discover(discover::DiscoverArgs),
    /// Run tests in one build and wait for their outcomes
    Execute(execute::SuiteArgs),
    /// Trigger a test run without waiting for it
    Submit(submit::SubmitArgs),
    /// Print the test list of a finished listing build
    Tests(test_list::TestListArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", JbError::describe(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        config: cli.config,
        url: cli.url,
        user: cli.user,
    };
    let cwd = std::env::current_dir()?;
    let config = load_config(&overrides, &cwd, |key| std::env::var(key).ok())?;
    let client = Client::new(&config)?;
    let format = cli.format;

    match cli.command {
        Commands::Jobs => jobs::handle(client, format).await,
        Commands::Discover(args) => discover::handle(client, args, format).await,
        Commands::Execute(args) => execute::handle(client, args, format).await,
        Commands::Submit(args) => submit::handle(client, args, format).await,
        Commands::Tests(args) => test_list::handle(client, args, format).await,
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
