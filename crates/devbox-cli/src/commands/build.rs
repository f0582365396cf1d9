use anyhow::{Context, Result};
use colored::Colorize;
use devbox_boxfile::{Boxfile, ConfigSnapshot, DATA_CATEGORY};
use devbox_core::{generate_id, validate_name};
use devbox_storage::EnvStore;
use tracing::info;

use super::LocalEnv;
use crate::cli::BuildArgs;
use crate::output::print_success;

/// Validates the boxfile and stores it as the environment's built configuration.
pub async fn build(local: &LocalEnv, args: &BuildArgs) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.boxfile)
        .await
        .with_context(|| format!("Failed to read {}", args.boxfile.display()))?;
    let boxfile = Boxfile::parse(&text)
        .with_context(|| format!("Invalid boxfile {}", args.boxfile.display()))?;
    check_component_names(&boxfile)
        .with_context(|| format!("Invalid boxfile {}", args.boxfile.display()))?;

    let build_id = args.build_id.clone().unwrap_or_else(generate_id);
    let mut env = local.load_or_new_env().await?;
    env.set_built(text, Some(build_id.clone()));
    local
        .store()
        .save_env(&env)
        .await
        .context("Failed to save build")?;

    let data = boxfile.nodes(DATA_CATEGORY);
    info!(env_id = %env.id, build_id = %build_id, components = boxfile.names().len(), "Build recorded");
    print_success(&format!(
        "Built {} ({} components, {} data)",
        build_id.cyan(),
        boxfile.names().len(),
        data.len()
    ));
    Ok(())
}

/// Every top-level key may become a component record, so each must be a valid name.
fn check_component_names(boxfile: &Boxfile) -> Result<()> {
    for name in boxfile.names() {
        validate_name(name).with_context(|| format!("Invalid component name {name:?}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names_are_validated() {
        let ok = Boxfile::parse("run.config:\n  engine: ruby\ndata.db:\n  image: postgres:13\n")
            .unwrap();
        assert!(check_component_names(&ok).is_ok());

        let bad = Boxfile::parse("data.db:\n  image: postgres:13\ndata.my/db:\n  image: x\n")
            .unwrap();
        let message = format!("{:#}", check_component_names(&bad).unwrap_err());
        assert!(message.contains("\"data.my/db\""));
    }

    #[tokio::test]
    async fn test_build_rejects_unstorable_names_before_saving() {
        let home = tempfile::tempdir().unwrap();
        let boxfile = home.path().join("boxfile.yml");
        std::fs::write(&boxfile, "data.my/db:\n  image: postgres:13\n").unwrap();
        let local = LocalEnv::open(
            home.path(),
            &crate::config::ProfileConfig::default(),
            Some("proj"),
            "dev",
        )
        .unwrap();
        let args = BuildArgs {
            boxfile,
            build_id: None,
        };

        assert!(build(&local, &args).await.is_err());
        assert!(local.load_built_env().await.is_err());
    }
}
