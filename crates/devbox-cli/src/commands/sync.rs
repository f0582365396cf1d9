use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use devbox_storage::ComponentRegistry;

use super::LocalEnv;
use crate::config::ProfileConfig;
use crate::output::{print_components, print_field, print_phase, print_success};

/// Runs one convergence pass for the local app.
pub async fn sync(local: &LocalEnv, cfg: &ProfileConfig) -> Result<()> {
    let _lock = local.lock_app().await?;
    let env = local.load_built_env().await?;
    let mut app = local.load_or_create_app().await?;
    let reconciler = local.reconciler(cfg);

    let timeout = cfg.sync_timeout();
    let result = tokio::time::timeout(timeout, reconciler.sync(&env, &mut app))
        .await
        .map_err(|_| anyhow!("Sync did not finish within {}s", timeout.as_secs()))?;

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_persist_failure() => {
            return Err(anyhow::Error::new(e).context(
                "Components are up to date but the app record was not saved; run sync again",
            ));
        }
        Err(e) => {
            let context = match e.component() {
                Some(component) => format!("Sync failed in {} phase at {component}", e.phase()),
                None => format!("Sync failed in {} phase", e.phase()),
            };
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    print_phase("Removing components", &report.purged, "removed");
    print_phase("Launching components", &report.provisioned, "launched");
    if report.is_up_to_date() {
        print_success(&format!("{} is up to date", app.id.cyan()));
    } else {
        print_success(&format!("Synced {}", app.id.cyan()));
    }
    Ok(())
}

/// Shows the deployed state and components of the local app.
pub async fn status(local: &LocalEnv) -> Result<()> {
    let app_id = local.app_id();
    print_field("Environment", local.env_id());
    print_field("App", &app_id);

    let deployed = match local.load_app().await? {
        Some(app) if app.is_deployed() => "yes".green().to_string(),
        Some(_) => "no".yellow().to_string(),
        None => "never created".dimmed().to_string(),
    };
    print_field("Deployed", &deployed);

    let components = local
        .store()
        .all_components_by_app(&app_id)
        .await
        .context("Failed to load app components")?;
    print_components(&components);
    Ok(())
}

/// Destroys every component of the local app and clears its deployed boxfile.
pub async fn destroy(local: &LocalEnv, cfg: &ProfileConfig) -> Result<()> {
    let _lock = local.lock_app().await?;
    let Some(mut app) = local.load_app().await? else {
        println!("Nothing to destroy for {}", local.app_id());
        return Ok(());
    };
    let reconciler = local.reconciler(cfg);

    let removed = reconciler
        .teardown(&mut app)
        .await
        .with_context(|| format!("Failed to destroy {}", app.id))?;

    print_phase("Removing components", &removed, "removed");
    print_success(&format!("Destroyed {}", app.id.cyan()));
    Ok(())
}
