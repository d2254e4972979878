//! Deployment asset build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sitepack_static::{deploy_instructions, BuildConfig, FetchOutcome, StaticBuilder};

/// Configuration file structure (sitepack.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    artifact: ArtifactConfig,
    #[serde(default)]
    outputs: OutputsConfig,
    #[serde(default)]
    templates: TemplatesConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SiteConfig {
    title: Option<String>,
    output: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ArtifactConfig {
    url: Option<String>,
    name: Option<String>,
    fallback_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct OutputsConfig {
    config: Option<String>,
    page: Option<String>,
}

/// Paths to template files, relative to the config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TemplatesConfig {
    placeholder: Option<String>,
    config_stub: Option<String>,
    download_page: Option<String>,
}

/// Load configuration from the config file if it exists.
/// Returns an error if the file exists but is malformed.
pub(crate) fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

fn read_template(base_dir: &Path, path: Option<String>, slot: &mut String) -> Result<()> {
    if let Some(path) = path {
        let path = base_dir.join(path);
        *slot = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        tracing::debug!("Using template {}", path.display());
    }
    Ok(())
}

/// Merge the config file and CLI overrides onto the built-in defaults.
pub(crate) fn resolve_config(
    file: ConfigFile,
    base_dir: &Path,
    output: Option<PathBuf>,
    url: Option<String>,
) -> Result<BuildConfig> {
    let mut config = BuildConfig::default();

    if let Some(title) = file.site.title {
        config.title = title;
    }
    if let Some(dir) = output.or_else(|| file.site.output.map(PathBuf::from)) {
        config.output_dir = dir;
    }
    if let Some(url) = url.or(file.artifact.url) {
        config.artifact_url = url;
    }
    if let Some(name) = file.artifact.name {
        config.artifact_name = name;
    }
    if let Some(fallback_url) = file.artifact.fallback_url {
        config.fallback_url = fallback_url;
    }
    if let Some(name) = file.outputs.config {
        config.config_name = name;
    }
    if let Some(name) = file.outputs.page {
        config.page_name = name;
    }

    read_template(base_dir, file.templates.placeholder, &mut config.templates.placeholder)?;
    read_template(base_dir, file.templates.config_stub, &mut config.templates.config_stub)?;
    read_template(
        base_dir,
        file.templates.download_page,
        &mut config.templates.download_page,
    )?;

    Ok(config)
}

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, url: Option<String>) -> Result<()> {
    let file_config = load_config(config_path)?;
    let base_dir = config_path.parent().unwrap_or(Path::new(""));
    let config = resolve_config(file_config, base_dir, output, url)?;

    let builder = StaticBuilder::new(config)?;
    let result = builder.build().await?;

    match &result.artifact {
        FetchOutcome::Fetched { bytes } => {
            tracing::info!("Downloaded artifact ({} bytes)", bytes);
        }
        FetchOutcome::Placeholder(reason) => {
            tracing::warn!("Artifact is a placeholder: {}", reason);
        }
    }

    tracing::info!(
        "Built {} files in {}ms",
        result.files.len(),
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());

    tracing::info!("To deploy:");
    for (i, step) in deploy_instructions(builder.config()).iter().enumerate() {
        tracing::info!("{}. {}", i + 1, step);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let file = load_config(&temp.path().join("sitepack.toml")).unwrap();
        let config = resolve_config(file, temp.path(), None, None).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.artifact_name, "suinocultura.apk");
        assert_eq!(config.page_name, "download.html");
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(
            &path,
            r#"
[site]
title = "Granja"
output = "public"

[artifact]
url = "https://example.com/granja.apk"
name = "granja.apk"

[outputs]
page = "baixar.html"
"#,
        )
        .unwrap();

        let file = load_config(&path).unwrap();
        let config = resolve_config(file, temp.path(), None, None).unwrap();

        assert_eq!(config.title, "Granja");
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.artifact_url, "https://example.com/granja.apk");
        assert_eq!(config.artifact_name, "granja.apk");
        assert_eq!(config.page_name, "baixar.html");
        assert_eq!(config.config_name, "firebase-config.js");
    }

    #[test]
    fn cli_flags_override_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(
            &path,
            "[site]\noutput = \"public\"\n[artifact]\nurl = \"https://a.example/app.apk\"\n",
        )
        .unwrap();

        let file = load_config(&path).unwrap();
        let config = resolve_config(
            file,
            temp.path(),
            Some(PathBuf::from("out")),
            Some("https://b.example/app.apk".to_string()),
        )
        .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.artifact_url, "https://b.example/app.apk");
    }

    #[test]
    fn loads_templates_relative_to_config() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::write(
            temp.path().join("templates/placeholder.txt"),
            "see {{ fallback_url }}",
        )
        .unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(
            &path,
            "[templates]\nplaceholder = \"templates/placeholder.txt\"\n",
        )
        .unwrap();

        let file = load_config(&path).unwrap();
        let config = resolve_config(file, temp.path(), None, None).unwrap();

        assert_eq!(config.templates.placeholder, "see {{ fallback_url }}");
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(&path, "[templates]\ndownload_page = \"nope.html\"\n").unwrap();

        let file = load_config(&path).unwrap();

        assert!(resolve_config(file, temp.path(), None, None).is_err());
    }

    #[test]
    fn misspelled_nested_key_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(&path, "[artifact]\nfalback_url = \"https://example.com\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("falback_url"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sitepack.toml");
        fs::write(&path, "[site\ntitle = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
