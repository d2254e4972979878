//! Deployment asset builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::fetch::{ArtifactFetcher, FetchOutcome};
use crate::templates::{PageContext, TemplateEngine, TemplateSet};

const FALLBACK_URL: &str =
    "https://suinocultura.replit.app/pages/99_%F0%9F%93%A5_Download_Aplicativo";

/// Configuration for building the deployment assets.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Remote location of the Android package
    pub artifact_url: String,

    /// File name of the package inside the output directory
    pub artifact_name: String,

    /// Page users are sent to when the package is a placeholder
    pub fallback_url: String,

    /// File name of the hosting SDK configuration stub
    pub config_name: String,

    /// File name of the download page
    pub page_name: String,

    /// Site title
    pub title: String,

    /// Text templates for the generated files
    pub templates: TemplateSet,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            artifact_url: "https://suinocultura.replit.app/download/suinocultura.apk".to_string(),
            artifact_name: "suinocultura.apk".to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            config_name: "firebase-config.js".to_string(),
            page_name: "download.html".to_string(),
            title: "Sistema Suinocultura".to_string(),
            templates: TemplateSet::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// What was written for the artifact
    pub artifact: FetchOutcome,

    /// Files written, in build order
    pub files: Vec<PathBuf>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
///
/// A failed download is not an error; see [`FetchOutcome::Placeholder`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Failed to create HTTP client: {0}")]
    ClientError(String),
}

/// Builds the deployment assets into the output directory.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
    fetcher: ArtifactFetcher,
    context: PageContext,
}

impl StaticBuilder {
    /// Create a new builder.
    ///
    /// Templates are compiled and the placeholder rendered up front, so a bad
    /// template fails here rather than halfway through a build.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates = TemplateEngine::new(&config.templates)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let context = PageContext {
            title: config.title.clone(),
            artifact_name: config.artifact_name.clone(),
            fallback_url: config.fallback_url.clone(),
        };

        let placeholder = templates
            .render_placeholder(&context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let fetcher =
            ArtifactFetcher::new(placeholder).map_err(|e| BuildError::ClientError(e.to_string()))?;

        Ok(Self {
            config,
            templates,
            fetcher,
            context,
        })
    }

    /// Builder configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build all assets: directory, artifact, config stub, download page.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        tracing::info!("Building deployment assets...");

        self.ensure_output_dir()?;
        tracing::info!("Output directory ready: {}", self.config.output_dir.display());

        let artifact = self.fetch_artifact().await?;
        match &artifact {
            FetchOutcome::Fetched { .. } => tracing::info!("Artifact download complete"),
            FetchOutcome::Placeholder(reason) => {
                tracing::info!("Artifact placeholder written ({})", reason)
            }
        }

        let config_path = self.write_config_stub()?;
        tracing::info!("Created {}", config_path.display());

        let page_path = self.write_download_page()?;
        tracing::info!("Created {}", page_path.display());

        let duration = start.elapsed();

        Ok(BuildResult {
            artifact,
            files: vec![self.artifact_path(), config_path, page_path],
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Create the output directory if it does not exist.
    pub fn ensure_output_dir(&self) -> Result<(), BuildError> {
        fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", self.config.output_dir.display(), e))
        })
    }

    /// Download the artifact, or write the placeholder in its place.
    pub async fn fetch_artifact(&self) -> Result<FetchOutcome, BuildError> {
        let dest = self.artifact_path();
        tracing::info!("Downloading {}...", self.config.artifact_url);

        self.fetcher
            .fetch_or_placeholder(&self.config.artifact_url, &dest)
            .await
            .map_err(|e| BuildError::WriteError(format!("{}: {}", dest.display(), e)))
    }

    /// Write the hosting SDK configuration stub.
    pub fn write_config_stub(&self) -> Result<PathBuf, BuildError> {
        let content = self
            .templates
            .render_config_stub(&self.context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let path = self.config.output_dir.join(&self.config.config_name);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Write the download page.
    pub fn write_download_page(&self) -> Result<PathBuf, BuildError> {
        let html = self
            .templates
            .render_download_page(&self.context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let path = self.config.output_dir.join(&self.config.page_name);
        write_file(&path, html)?;
        Ok(path)
    }

    fn artifact_path(&self) -> PathBuf {
        self.config.output_dir.join(&self.config.artifact_name)
    }
}

fn write_file(path: &Path, content: String) -> Result<(), BuildError> {
    fs::write(path, content)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Manual steps for publishing the output directory once the build is done.
pub fn deploy_instructions(config: &BuildConfig) -> Vec<String> {
    vec![
        format!(
            "Update {} with your real credentials",
            config.output_dir.join(&config.config_name).display()
        ),
        "Run: npx firebase login".to_string(),
        "Run: npx firebase deploy".to_string(),
    ]
}
