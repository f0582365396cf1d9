use std::path::Path;

use anyhow::Result;

use crate::config::{self, ProfileConfig};
use crate::output::{print_field, print_success};

pub fn show(home: &Path, profile: &str) -> Result<()> {
    let cfg = config::load_profile(home, profile)?;
    let unset = || "(not set)".to_string();
    print_field("Profile", profile);
    print_field(
        "Production URL",
        cfg.production_url.as_deref().unwrap_or("(not set)"),
    );
    print_field("Data dir", &cfg.data_dir(home).display().to_string());
    print_field("Log level", cfg.log_level());
    print_field(
        "Sync timeout",
        &format!("{}s", cfg.sync_timeout().as_secs()),
    );
    print_field("Setup hook", &cfg.setup_hook.clone().unwrap_or_else(unset));
    print_field(
        "Destroy hook",
        &cfg.destroy_hook.clone().unwrap_or_else(unset),
    );
    Ok(())
}

pub fn set(home: &Path, profile: &str, key: &str, value: &str) -> Result<()> {
    let mut cfg: ProfileConfig = config::load_profile(home, profile)?;
    cfg.set(key, value)?;
    config::save_profile(home, profile, &cfg)?;
    print_success(&format!("Set {key} = {value}"));
    Ok(())
}
