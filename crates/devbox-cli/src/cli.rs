use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devbox")]
#[command(about = "Build, converge and deploy local development environments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Control plane base URL (overrides config and DEVBOX_URL env var)
    #[arg(short, long, global = true, env = "DEVBOX_URL")]
    pub url: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "DEVBOX_PROFILE", default_value = "default")]
    pub profile: String,

    /// Environment id (defaults to one derived from the project directory)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Local app name inside the environment
    #[arg(short, long, global = true, default_value = "dev")]
    pub app: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login to the control plane
    Login(LoginArgs),
    /// Logout (remove stored credentials)
    Logout,
    /// Show current auth info
    Whoami,
    /// Manage CLI configuration
    Config(ConfigArgs),
    /// Record a boxfile as the environment's built configuration
    Build(BuildArgs),
    /// Converge local components with the built boxfile
    Sync,
    /// List the app's components
    Status,
    /// Destroy every component of the app
    Destroy,
    /// Deploy the built boxfile to a production app
    Deploy(DeployArgs),
    /// Open a tunnel to a production component
    Tunnel(AccessArgs),
    /// Open a console on a production component
    Console(AccessArgs),
    /// Show the build warehouse of a production app
    Warehouse(RemoteAppArgs),
    /// Show a production app
    App(RemoteAppArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Username
    #[arg(long)]
    pub username: String,
    /// Password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Path to the boxfile
    #[arg(long, default_value = "boxfile.yml")]
    pub boxfile: PathBuf,
    /// Build identifier (a new one is generated if omitted)
    #[arg(long)]
    pub build_id: Option<String>,
}

#[derive(clap::Args)]
pub struct DeployArgs {
    /// Production app slug
    pub slug: String,
    /// Commit message recorded with the deploy
    #[arg(short, long, default_value = "")]
    pub message: String,
    /// Explicit build identifier
    #[arg(long, conflicts_with = "reuse_build")]
    pub build_id: Option<String>,
    /// Reuse the build of the most recent deploy
    #[arg(long)]
    pub reuse_build: bool,
}

#[derive(clap::Args)]
pub struct AccessArgs {
    /// Production app slug
    pub slug: String,
    /// Component name (e.g. data.db)
    pub component: String,
}

#[derive(clap::Args)]
pub struct RemoteAppArgs {
    /// Production app slug
    pub slug: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (production_url, data_dir, log_level, sync_timeout_secs, setup_hook, destroy_hook)
    pub key: String,
    /// Value
    pub value: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_deploy_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "devbox",
            "deploy",
            "blog",
            "--build-id",
            "b1",
            "--reuse-build",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["devbox", "sync", "--app", "staging", "--env", "proj"])
            .unwrap();
        assert_eq!(cli.app, "staging");
        assert_eq!(cli.env.as_deref(), Some("proj"));
        assert!(matches!(cli.command, Commands::Sync));
    }
}
