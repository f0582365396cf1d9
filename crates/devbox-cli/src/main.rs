mod auth;
mod cli;
mod commands;
mod config;
mod hooks;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use commands::LocalEnv;
use commands::remote::make_client;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let home = config::devbox_home()?;
    let profile = cli.profile.as_str();
    let cfg = config::load_profile(&home, profile)?;
    observability::init_tracing(cfg.log_level());

    let url = cli.url.as_deref();
    let local = || LocalEnv::open(&home, &cfg, cli.env.as_deref(), &cli.app);

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_url(&home, url, profile)?;
            commands::auth::login(&home, &server, args, profile).await?;
        }
        Commands::Logout => commands::auth::logout(&home, profile)?,
        Commands::Whoami => commands::auth::whoami(&home, profile)?,
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&home, profile)?,
            ConfigCommands::Set(set) => {
                commands::config::set(&home, profile, &set.key, &set.value)?;
            }
        },
        Commands::Build(args) => commands::build::build(&local()?, args).await?,
        Commands::Sync => commands::sync::sync(&local()?, &cfg).await?,
        Commands::Status => commands::sync::status(&local()?).await?,
        Commands::Destroy => commands::sync::destroy(&local()?, &cfg).await?,
        Commands::Deploy(args) => {
            let client = make_client(&home, url, profile)?;
            commands::remote::deploy(&client, &local()?, args).await?;
        }
        Commands::Tunnel(args) => {
            let client = make_client(&home, url, profile)?;
            commands::remote::tunnel(&client, args).await?;
        }
        Commands::Console(args) => {
            let client = make_client(&home, url, profile)?;
            commands::remote::console(&client, args).await?;
        }
        Commands::Warehouse(args) => {
            let client = make_client(&home, url, profile)?;
            commands::remote::warehouse(&client, &args.slug).await?;
        }
        Commands::App(args) => {
            let client = make_client(&home, url, profile)?;
            commands::remote::app(&client, &args.slug).await?;
        }
    }

    Ok(())
}
