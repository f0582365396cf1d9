//! Provision phase: set up data components declared in the boxfile.

use devbox_boxfile::{ConfigSnapshot, DATA_CATEGORY};
use devbox_core::{App, Component};
use devbox_storage::ComponentRegistry;
use tracing::{debug, info};

use super::PhaseOutcome;
use crate::error::ComponentError;
use crate::lifecycle::ComponentLifecycle;

/// Sets up every `data.*` node of `built` that has no active component.
///
/// Existing inactive records are reused (keeping their creation time);
/// missing ones start from a fresh record. Each component's label is its
/// name and its image comes from the node's `image` field. Components outside
/// the data category are never provisioned here. Stops at the first failure.
pub async fn provision_components<R>(
    registry: &R,
    lifecycle: &dyn ComponentLifecycle,
    app: &App,
    built: &dyn ConfigSnapshot,
) -> Result<PhaseOutcome, ComponentError>
where
    R: ComponentRegistry + ?Sized,
{
    info!(app_id = %app.id, "Launching components");

    let mut provisioned = Vec::new();
    for name in built.nodes(DATA_CATEGORY) {
        let existing = registry
            .find_component(&app.id, &name)
            .await
            .map_err(|source| ComponentError::Lookup {
                component: name.clone(),
                source,
            })?;

        let mut component = match existing {
            Some(component) if component.is_active() => {
                debug!(component = %name, "Component already active");
                continue;
            }
            Some(component) => component,
            None => Component::new(&app.id, &name),
        };

        component.label = name.clone();
        component.image = built
            .node(&name)
            .string_value("image")
            .unwrap_or_default()
            .to_string();

        info!(
            app_id = %app.id,
            component = %name,
            image = %component.image,
            "Setting up component"
        );
        lifecycle
            .setup(app, &component)
            .await
            .map_err(|source| ComponentError::Setup {
                component: name.clone(),
                source,
            })?;

        component.mark_active();
        registry
            .save_component(&component)
            .await
            .map_err(|source| ComponentError::Registry {
                component: name.clone(),
                source,
            })?;

        provisioned.push(name);
    }

    let outcome = PhaseOutcome::from_changes(provisioned);
    if outcome.is_up_to_date() {
        info!(app_id = %app.id, "Skipping (up-to-date)");
    }
    Ok(outcome)
}
