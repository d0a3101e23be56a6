//! cectl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cectl::cli::{Cli, Commands};
use cectl::client::ApiClient;
use cectl::commands::{
    BrandingCommand, ElementCommand, ExecutionCommand, FormulaCommand, FormulaInstanceCommand,
    HubCommand, InfoCommand, InstanceCommand, IntelligenceCommand, JobCommand, MetricsCommand,
    MoleculeCommand, ProfileCommand, ResourceCommand, TransformationCommand, UserCommand,
    VersionCommand,
};
use cectl::config::{default_config_path, ProfileStore};
use cectl::output::OutputFormat;
use cectl::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.curl))
        .with_writer(io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG`, or `warn`; `--curl` raises the curl target to `info`.
fn env_filter(curl: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if !curl {
        return filter;
    }
    match "cectl::curl=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format());
    let mut stdout = io::stdout().lock();

    if matches!(cli.command, Commands::Version) {
        return VersionCommand::execute(&mut stdout);
    }

    let config = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let store = ProfileStore::load(config)?;

    let command = match cli.command {
        Commands::Profiles { command } => {
            let mut cmd = ProfileCommand::new(store, &cli.profile);
            return cmd.execute(&mut stdout, &format, &command).await;
        }
        command => command,
    };

    let client = ApiClient::from_profile(store.get(&cli.profile)?)?;

    match command {
        Commands::Elements { command } => {
            let cmd = ElementCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Instances { command } => {
            let cmd = InstanceCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Formulas { command } => {
            let cmd = FormulaCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::FormulaInstances { command } => {
            let cmd = FormulaInstanceCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Executions { command } => {
            let cmd = ExecutionCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Jobs { command } => {
            let cmd = JobCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Resources { command } => {
            let cmd = ResourceCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Transformations { command } => {
            let cmd = TransformationCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Hubs { command } => {
            let cmd = HubCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Users { command } => {
            let cmd = UserCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Info { scope } => {
            let cmd = InfoCommand::new(client);
            cmd.execute(&mut stdout, &format, scope).await?;
        }
        Commands::Metrics { command } => {
            let cmd = MetricsCommand::new(client);
            cmd.execute(&mut stdout, &command).await?;
        }
        Commands::Branding { command } => {
            let cmd = BrandingCommand::new(client);
            cmd.execute(&mut stdout, &format, &command).await?;
        }
        Commands::Intelligence { key, order } => {
            let cmd = IntelligenceCommand::new(client);
            cmd.execute(&mut stdout, &format, key.as_deref(), order)
                .await?;
        }
        Commands::Molecules { command } => {
            let cmd = MoleculeCommand::new(client, &cli.profile);
            cmd.execute(&mut stdout, &command).await?;
        }
        Commands::Version | Commands::Profiles { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cectl::cli::{Format, ProfileCommands};

    #[test]
    fn cli_parses_version() {
        let cli = Cli::parse_from(["cectl", "version"]);
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn cli_parses_profiles_list() {
        let cli = Cli::parse_from(["cectl", "profiles", "list", "--long"]);
        match cli.command {
            Commands::Profiles { command } => {
                assert!(matches!(command, ProfileCommands::List { long: true }));
            }
            _ => panic!("expected profiles command"),
        }
    }

    #[test]
    fn cli_respects_format_flags() {
        let cli = Cli::parse_from(["cectl", "--json", "hubs", "list"]);
        assert_eq!(cli.format(), Format::Json);
        let cli = Cli::parse_from(["cectl", "hubs", "list", "--csv"]);
        assert_eq!(cli.format(), Format::Csv);
    }

    #[test]
    fn curl_flag_raises_curl_target() {
        let filter = env_filter(true).to_string();
        assert!(filter.contains("cectl::curl=info"));
    }

    #[tokio::test]
    async fn run_with_missing_profile_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("cectl.toml");
        let cli = Cli::parse_from([
            "cectl",
            "--config",
            config.to_str().expect("utf8 path"),
            "--profile",
            "qa",
            "hubs",
            "list",
        ]);
        let err = run(cli).await.expect_err("no such profile");
        assert!(matches!(err, CliError::ProfileNotFound { .. }));
    }

    #[tokio::test]
    async fn run_against_unreachable_api_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("cectl.toml");
        std::fs::write(
            &config,
            "[default]\nbase = \"http://127.0.0.1:1\"\nuser = \"u\"\norg = \"o\"\n",
        )
        .expect("write");
        let cli = Cli::parse_from([
            "cectl",
            "--config",
            config.to_str().expect("utf8 path"),
            "--profile",
            "default",
            "hubs",
            "list",
        ]);
        let err = run(cli).await.expect_err("unreachable");
        assert!(matches!(err, CliError::Unreachable(_)));
    }
}
