//! Write a default sitepack.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing sitepack...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'sitepack build' to prepare the deployment assets.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Sitepack Configuration

[site]
# Title shown on the download page
title = "Sistema Suinocultura"

# Output directory published by the hosting tool
output = "build"

[artifact]
# Where the Android package is downloaded from
url = "https://suinocultura.replit.app/download/suinocultura.apk"

# File name inside the output directory
name = "suinocultura.apk"

# Linked from the placeholder when the download fails
fallback_url = "https://suinocultura.replit.app/pages/99_%F0%9F%93%A5_Download_Aplicativo"

[outputs]
config = "firebase-config.js"
page = "download.html"

# [templates]
# Paths relative to this file; each replaces the built-in template.
# placeholder = "templates/placeholder.txt"
# config_stub = "templates/firebase-config.js"
# download_page = "templates/download.html"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build::{load_config, resolve_config};
    use sitepack_static::BuildConfig;
    use tempfile::tempdir;

    #[test]
    fn writes_default_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");

        run(&path, false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(&path, "[site]\ntitle = \"Mine\"\n").unwrap();

        run(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[site]\ntitle = \"Mine\"\n");

        run(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn default_config_matches_builtin_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        run(&path, false).unwrap();

        let file = load_config(&path).unwrap();
        let config = resolve_config(file, temp.path(), None, None).unwrap();
        let defaults = BuildConfig::default();

        assert_eq!(config.title, defaults.title);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.artifact_url, defaults.artifact_url);
        assert_eq!(config.artifact_name, defaults.artifact_name);
        assert_eq!(config.fallback_url, defaults.fallback_url);
        assert_eq!(config.config_name, defaults.config_name);
        assert_eq!(config.page_name, defaults.page_name);
        assert_eq!(config.templates, defaults.templates);
    }
}
