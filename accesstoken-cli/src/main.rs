mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use error::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Issue {
            config,
            prefix,
            identity,
            video_sid,
            service_sid,
            endpoint_id,
            ttl,
            nbf,
            algorithm,
        } => commands::handle_issue_command(commands::IssueArgs {
            config,
            prefix,
            identity,
            video_sid,
            service_sid,
            endpoint_id,
            ttl,
            nbf,
            algorithm,
        }),
        Commands::Decode {
            token,
            secret,
            algorithms,
            no_verify,
        } => commands::handle_decode_command(&token, secret, &algorithms, no_verify, cli.verbose),
        Commands::Header { token } => commands::handle_header_command(&token),
    }
}
