use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Read a file to a `String`, returning `None` if it does not exist.
pub(crate) async fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file at {}", path.display())),
    }
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Serialize `data` as pretty JSON and write it to `path`. On Unix the file is made readable by the
/// owner only when `private` is true.
pub(crate) async fn save_json<T>(path: &Path, data: &T, private: bool) -> Result<()>
where
    T: Serialize,
{
    let json = serde_json::to_string_pretty(data).context("Failed to serialize data to JSON")?;
    write(path, json).await?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        if private {
            tokio::fs::set_permissions(path, Permissions::from_mode(0o600))
                .await
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    Ok(())
}

/// Create a directory and its parents if they do not exist.
pub(crate) async fn make_dir(p: &Path) -> Result<()> {
    tokio::fs::create_dir_all(p)
        .await
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

/// Canonicalize `p`.
pub(crate) async fn canonicalize(p: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(p)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
}
