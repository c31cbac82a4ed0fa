//! Feed document retrieval from either a URL or a local file.

use crate::config::FeedSource;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// The payload of a feed retrieval.
#[derive(Debug, PartialEq, Eq)]
pub enum FeedPayload {
    /// The raw bytes of the feed document.
    Content(Vec<u8>),
    /// The feed document does not exist at the configured source.
    Absent,
}

/// An error during feed list generation.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The request for the feed document could not be completed.
    #[error("error requesting feed document")]
    Request(#[from] reqwest::Error),
    /// The feed source answered with an unexpected status.
    #[error("feed source answered with status {0}")]
    Http(reqwest::StatusCode),
    /// The feed document could not be read from disk.
    #[error("error reading feed document")]
    Io(#[from] std::io::Error),
    /// The feed document is not a valid blog feed.
    #[error("error parsing feed document")]
    Parse(#[from] serde_json::Error),
    /// No element with the configured container id exists in the generated pages.
    #[error("no container with id {0:?} found in any generated page")]
    NoContainer(String),
}

/// Fetch the feed document from the given source.
///
/// Relative file sources are resolved against the staging directory, which lets
/// the default configuration pick up the document emitted earlier in the build.
pub async fn fetch(source: &FeedSource, staging_dist: &Path) -> Result<FeedPayload, FeedError> {
    match source {
        FeedSource::Url(url) => fetch_url(url).await,
        FeedSource::Path(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                staging_dist.join(path)
            };
            read_file(&path).await
        }
    }
}

async fn fetch_url(url: &Url) -> Result<FeedPayload, FeedError> {
    let client = reqwest::Client::builder().build()?;
    let res = client.get(url.clone()).send().await?;
    // A source without a feed document is not an error, posts may simply not
    // have been published yet.
    if res.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(FeedPayload::Absent);
    }
    if !res.status().is_success() {
        return Err(FeedError::Http(res.status()));
    }
    Ok(FeedPayload::Content(res.bytes().await?.to_vec()))
}

async fn read_file(path: &Path) -> Result<FeedPayload, FeedError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(FeedPayload::Content(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(FeedPayload::Absent),
        Err(err) => Err(err.into()),
    }
}
