//! Common functionality and types.
pub mod html_rewrite;

use anyhow::{Context, Result, bail};
use console::Emoji;
use once_cell::sync::Lazy;
use std::fmt::Debug;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub static BUILDING: Emoji = Emoji("📦 ", "");
pub static SUCCESS: Emoji = Emoji("✅ ", "");
pub static ERROR: Emoji = Emoji("❌ ", "");
pub static SERVER: Emoji = Emoji("📡 ", "");
pub static LOCAL: Emoji = Emoji("🏠 ", "");
pub static NETWORK: Emoji = Emoji("💻 ", "");
pub static STARTING: Emoji = Emoji("🚀 ", "");

// If we fail to get the current_dir, we can't do much and just fail, so we can use expect(..).
#[allow(clippy::expect_used)]
static CWD: Lazy<PathBuf> =
    Lazy::new(|| std::env::current_dir().expect("error getting current dir"));

/// Recursively copy a directory, returning the number of files copied.
///
/// Files already present in the target are overwritten.
pub async fn copy_dir_recursive<F, T>(from_dir: F, to_dir: T) -> Result<usize>
where
    F: AsRef<Path> + Debug + Send + 'static,
    T: AsRef<Path> + Send + 'static,
{
    let from = from_dir.as_ref();
    let to: &Path = to_dir.as_ref();

    let from_metadata = tokio::fs::metadata(from)
        .await
        .with_context(|| format!("error reading metadata of source dir {from:?}"))?;
    if !from_metadata.is_dir() {
        bail!("{from:?} is not a directory");
    }

    if tokio::fs::metadata(to).await.is_err() {
        tokio::fs::create_dir_all(to)
            .await
            .with_context(|| format!("error creating target dir {to:?}"))?;
    }

    let mut copied = 0;
    let mut read_dir = tokio::fs::read_dir(from)
        .await
        .with_context(|| format!("error reading source dir {from:?}"))?;
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .context("error reading next dir entry")?
    {
        if entry.file_type().await?.is_dir() {
            copied += Box::pin(async move {
                copy_dir_recursive(entry.path(), to.join(entry.file_name())).await
            })
            .await?;
        } else {
            tokio::fs::copy(entry.path(), to.join(entry.file_name())).await?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Recursively delete a directory, tolerating an already absent one.
///
/// Goes through the remove_dir_all crate rather than fs::remove_dir_all, which has known
/// issues on Windows.
pub async fn remove_dir_all(from_dir: PathBuf) -> Result<()> {
    if !path_exists(&from_dir).await? {
        return Ok(());
    }
    tokio::task::spawn_blocking(move || {
        ::remove_dir_all::remove_dir_all(from_dir).context("error removing directory")
    })
    .await
    .context("error awaiting spawned remove dir call")?
}

/// Check whether a path exists.
pub async fn path_exists(path: impl AsRef<Path>) -> Result<bool> {
    path_exists_and(path, |_| true).await
}

/// Check whether a path exists and its metadata matches the given predicate.
pub async fn path_exists_and(
    path: impl AsRef<Path>,
    and: impl FnOnce(Metadata) -> bool,
) -> Result<bool> {
    match tokio::fs::metadata(path.as_ref()).await {
        Ok(metadata) => Ok(and(metadata)),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error).with_context(|| {
            format!(
                "error checking for existence of path at {:?}",
                path.as_ref()
            )
        }),
    }
}

/// Strip the current working directory prefix from the given path, for friendlier output.
///
/// Returns `target` unmodified when it lies outside the working directory.
pub fn strip_prefix(target: &Path) -> &Path {
    target.strip_prefix(CWD.as_path()).unwrap_or(target)
}

/// Turn a file stem like `my-first-post` into a title like `My First Post`.
pub fn title_case(stem: &str) -> String {
    stem.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
