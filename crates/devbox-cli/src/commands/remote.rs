use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use devbox_core::generate_id;
use devbox_odin::{AccessChannel, AppDescriptor, DeployRequest, OdinClient, OdinError};

use super::LocalEnv;
use crate::auth;
use crate::cli::{AccessArgs, DeployArgs};
use crate::config;
use crate::output::{print_field, print_success};

/// Builds a client for the resolved control plane using the profile's stored token.
pub fn make_client(home: &Path, cli_url: Option<&str>, profile: &str) -> Result<OdinClient> {
    let server = config::resolve_url(home, cli_url, profile)?;
    let creds = auth::load_credentials(home, profile)?
        .with_context(|| format!("Not logged in (profile: \"{profile}\"). Run: devbox login"))?;
    OdinClient::new(&server, Some(creds.to_credentials())).context("Invalid control plane URL")
}

/// Submits the environment's built boxfile to a production app.
pub async fn deploy(client: &OdinClient, local: &LocalEnv, args: &DeployArgs) -> Result<()> {
    let env = local.load_built_env().await?;
    let app = lookup_app(client, &args.slug).await?;

    let build_id = if let Some(id) = &args.build_id {
        id.clone()
    } else if args.reuse_build {
        client
            .previous_build(&app.id)
            .await
            .map_err(|e| explain(e, "Failed to fetch previous deploy"))?
            .with_context(|| format!("{} has no previous deploy to reuse", args.slug))?
    } else {
        env.built_id.clone().unwrap_or_else(generate_id)
    };

    let request = DeployRequest {
        boxfile_content: env.built_boxfile,
        build_id: build_id.clone(),
        commit_message: args.message.clone(),
    };
    client
        .deploy(&app.id, &request)
        .await
        .map_err(|e| explain(e, format!("Failed to deploy {}", args.slug)))?;

    print_success(&format!(
        "Deployed build {} to {}",
        build_id.cyan(),
        app.name.cyan()
    ));
    Ok(())
}

pub async fn tunnel(client: &OdinClient, args: &AccessArgs) -> Result<()> {
    let app = lookup_app(client, &args.slug).await?;
    let channel = client
        .establish_tunnel(&app.id, &args.component)
        .await
        .map_err(|e| explain(e, format!("Failed to open tunnel to {}", args.component)))?;
    print_channel(&channel);
    Ok(())
}

pub async fn console(client: &OdinClient, args: &AccessArgs) -> Result<()> {
    let app = lookup_app(client, &args.slug).await?;
    let channel = client
        .establish_console(&app.id, &args.component)
        .await
        .map_err(|e| explain(e, format!("Failed to open console on {}", args.component)))?;
    print_channel(&channel);
    Ok(())
}

pub async fn warehouse(client: &OdinClient, slug: &str) -> Result<()> {
    let app = lookup_app(client, slug).await?;
    let warehouse = client
        .warehouse(&app.id)
        .await
        .map_err(|e| explain(e, "Failed to fetch warehouse"))?;
    print_field("URL", &warehouse.url);
    print_field("Token", &warehouse.token);
    Ok(())
}

pub async fn app(client: &OdinClient, slug: &str) -> Result<()> {
    let app = lookup_app(client, slug).await?;
    print_field("ID", &app.id);
    print_field("Name", &app.name);
    print_field("State", app.state.as_deref().unwrap_or("-"));
    Ok(())
}

async fn lookup_app(client: &OdinClient, slug: &str) -> Result<AppDescriptor> {
    client
        .app(slug)
        .await
        .map_err(|e| explain(e, format!("Failed to look up app {slug}")))
}

/// Adds `action` as context, plus a login hint when the token was rejected.
fn explain(e: OdinError, action: impl Into<String>) -> anyhow::Error {
    let rejected = e.is_unauthorized();
    let err = anyhow::Error::new(e).context(action.into());
    if rejected {
        err.context("Credentials were rejected. Run: devbox login")
    } else {
        err
    }
}

fn print_channel(channel: &AccessChannel) {
    print_field("URL", &channel.url);
    print_field("Container", &channel.container);
    print_field("Token", &channel.token);
}
