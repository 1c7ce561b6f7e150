use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};

/// Layered env files, later files overriding earlier ones. `.secrets.env`
/// is gitignored and holds anything that must not land in config/.
pub fn load_environment() -> anyhow::Result<()> {
    let profile = dotenvy::var("ROCKET_PROFILE").unwrap_or_else(|_| "development".to_string());

    let profile_file = if profile == "production" {
        "config/prod.env"
    } else {
        "config/dev.env"
    };

    for path in ["config/common.env", profile_file, ".secrets.env"] {
        if !Path::new(path).exists() {
            warn!("Environment file {} not found, skipping", path);
            continue;
        }

        dotenvy::from_filename_override(path)
            .with_context(|| format!("loading environment file {}", path))?;
        info!("Loaded environment from: {}", path);
    }

    Ok(())
}
