//! Purge phase: tear down components whose configuration changed.

use devbox_boxfile::ConfigSnapshot;
use devbox_core::{App, Component};
use devbox_storage::ComponentRegistry;
use tracing::{debug, info};

use super::PhaseOutcome;
use crate::error::ComponentError;
use crate::lifecycle::ComponentLifecycle;

/// Destroys every registered component of `app` whose node in `built` is
/// missing or differs from its node in `deployed`.
///
/// A component is unchanged only when its built node is present and
/// structurally equal to the deployed one. Platform services are skipped no
/// matter what the diff says. Stops at the first failure.
pub async fn purge_delta_components<R>(
    registry: &R,
    lifecycle: &dyn ComponentLifecycle,
    app: &App,
    built: &dyn ConfigSnapshot,
    deployed: &dyn ConfigSnapshot,
) -> Result<PhaseOutcome, ComponentError>
where
    R: ComponentRegistry + ?Sized,
{
    info!(app_id = %app.id, "Removing components");

    let components = registry
        .all_components_by_app(&app.id)
        .await
        .map_err(ComponentError::Load)?;

    let mut purged = Vec::new();
    for component in components {
        if component.is_platform() {
            debug!(component = %component.name, "Skipping platform component");
            continue;
        }

        let new_node = built.node(&component.name);
        let old_node = deployed.node(&component.name);
        if new_node.is_valid() && new_node.equal(&old_node) {
            debug!(component = %component.name, "Component unchanged");
            continue;
        }

        destroy_component(registry, lifecycle, app, &component).await?;
        purged.push(component.name);
    }

    let outcome = PhaseOutcome::from_changes(purged);
    if outcome.is_up_to_date() {
        info!(app_id = %app.id, "Skipping (up-to-date)");
    }
    Ok(outcome)
}

/// Destroys every registered component of `app` except platform services.
pub async fn purge_all_components<R>(
    registry: &R,
    lifecycle: &dyn ComponentLifecycle,
    app: &App,
) -> Result<PhaseOutcome, ComponentError>
where
    R: ComponentRegistry + ?Sized,
{
    let components = registry
        .all_components_by_app(&app.id)
        .await
        .map_err(ComponentError::Load)?;

    let mut purged = Vec::new();
    for component in components.into_iter().filter(|c| !c.is_platform()) {
        destroy_component(registry, lifecycle, app, &component).await?;
        purged.push(component.name);
    }
    Ok(PhaseOutcome::from_changes(purged))
}

async fn destroy_component<R>(
    registry: &R,
    lifecycle: &dyn ComponentLifecycle,
    app: &App,
    component: &Component,
) -> Result<(), ComponentError>
where
    R: ComponentRegistry + ?Sized,
{
    info!(app_id = %app.id, component = %component.name, "Destroying component");

    lifecycle
        .destroy(app, component)
        .await
        .map_err(|source| ComponentError::Destroy {
            component: component.name.clone(),
            source,
        })?;

    registry
        .delete_component(&app.id, &component.name)
        .await
        .map_err(|source| ComponentError::Registry {
            component: component.name.clone(),
            source,
        })
}
