use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use devbox_odin::OdinClient;

use crate::auth::{self, StoredCredentials};
use crate::cli::LoginArgs;
use crate::output::{print_error, print_field, print_success};

pub async fn login(home: &Path, server: &str, args: &LoginArgs, profile: &str) -> Result<()> {
    let client = OdinClient::new(server, None).context("Invalid control plane URL")?;
    println!("Logging in as {}...", args.username);
    let auth_token = client
        .auth(&args.username, &args.password)
        .await
        .context("Login failed")?;

    let creds = StoredCredentials {
        server: server.to_string(),
        username: args.username.clone(),
        auth_token,
    };
    auth::save_credentials(home, profile, &creds)?;
    print_success(&format!(
        "Logged in to {} (user: {})",
        server.cyan(),
        args.username.cyan()
    ));
    Ok(())
}

pub fn logout(home: &Path, profile: &str) -> Result<()> {
    if auth::remove_credentials(home, profile)? {
        print_success("Logged out (credentials removed)");
    } else {
        println!("No credentials found for profile \"{profile}\"");
    }
    Ok(())
}

pub fn whoami(home: &Path, profile: &str) -> Result<()> {
    match auth::load_credentials(home, profile)? {
        Some(creds) => {
            print_field("Profile", profile);
            print_field("Server", &creds.server);
            print_field("User", &creds.username);
            print_field("Token", &creds.token_preview());
        }
        None => {
            print_error(&format!("Not logged in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}
