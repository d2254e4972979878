//! Best-effort artifact download with placeholder fallback.

use std::fmt;
use std::path::Path;

use reqwest::{Client, Response, StatusCode};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Why the placeholder was written instead of the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// The server answered with something other than 200
    Status(u16),
    /// DNS, connect, TLS or body stream failure
    Transport(String),
}

impl fmt::Display for PlaceholderReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "server responded with status {}", code),
            Self::Transport(message) => write!(f, "transport error: {}", message),
        }
    }
}

/// What ended up at the artifact destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The full response body was written
    Fetched { bytes: u64 },
    /// The placeholder text was written
    Placeholder(PlaceholderReason),
}

impl FetchOutcome {
    /// Whether the real artifact was downloaded.
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

enum StreamError {
    Body(reqwest::Error),
    Io(std::io::Error),
}

/// Downloads a single artifact, degrading to placeholder text on any
/// network failure.
pub struct ArtifactFetcher {
    client: Client,
    placeholder: String,
}

impl ArtifactFetcher {
    /// Create a fetcher with a default HTTP client.
    pub fn new(placeholder: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(Client::builder().build()?, placeholder))
    }

    /// Create a fetcher using an existing client.
    pub fn with_client(client: Client, placeholder: impl Into<String>) -> Self {
        Self {
            client,
            placeholder: placeholder.into(),
        }
    }

    /// Text written when the download fails.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Issue one GET for `url` and stream a 200 body to `dest`.
    ///
    /// Any other status, or any transport failure, leaves the placeholder
    /// text at `dest` instead. Only filesystem errors are returned.
    pub async fn fetch_or_placeholder(
        &self,
        url: &str,
        dest: &Path,
    ) -> std::io::Result<FetchOutcome> {
        tracing::debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return self
                    .fall_back(dest, PlaceholderReason::Transport(e.to_string()))
                    .await
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return self
                .fall_back(dest, PlaceholderReason::Status(status.as_u16()))
                .await;
        }

        match stream_to_file(response, dest).await {
            Ok(bytes) => {
                tracing::debug!("Wrote {} bytes to {}", bytes, dest.display());
                Ok(FetchOutcome::Fetched { bytes })
            }
            Err(StreamError::Body(e)) => {
                self.fall_back(dest, PlaceholderReason::Transport(e.to_string()))
                    .await
            }
            Err(StreamError::Io(e)) => Err(e),
        }
    }

    /// Overwrite `dest` with the placeholder. The write truncates, so any
    /// partial body is discarded without a separate delete.
    async fn fall_back(
        &self,
        dest: &Path,
        reason: PlaceholderReason,
    ) -> std::io::Result<FetchOutcome> {
        tracing::warn!("Artifact download failed ({}), writing placeholder", reason);
        fs::write(dest, self.placeholder.as_bytes()).await?;
        Ok(FetchOutcome::Placeholder(reason))
    }
}

/// Stream the body chunk by chunk, returning once the file is flushed and closed.
async fn stream_to_file(mut response: Response, dest: &Path) -> Result<u64, StreamError> {
    let mut file = File::create(dest).await.map_err(StreamError::Io)?;
    let mut bytes = 0u64;

    loop {
        let chunk = match response.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                // Settle pending writes before the caller truncates the path.
                file.flush().await.map_err(StreamError::Io)?;
                return Err(StreamError::Body(e));
            }
        };
        file.write_all(&chunk).await.map_err(StreamError::Io)?;
        bytes += chunk.len() as u64;
    }

    file.flush().await.map_err(StreamError::Io)?;
    file.sync_all().await.map_err(StreamError::Io)?;
    drop(file);

    Ok(bytes)
}
