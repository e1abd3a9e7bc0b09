use crate::errors::TrackerError;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Reads a JSON document, treating a missing file as an empty document.
///
/// A document that exists but does not parse is an error rather than a
/// fresh start, so the next write cannot clobber it.
pub async fn load_document<T>(path: &Path) -> Result<T, TrackerError>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            error!("failed to parse {}: {err}", path.display());
            TrackerError::from(err)
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("{} does not exist yet, starting empty", path.display());
            Ok(T::default())
        }
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            Err(err.into())
        }
    }
}

pub async fn persist_document<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), TrackerError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write {}: {err}", path.display());
        TrackerError::from(err)
    })
}

#[cfg(test)]
pub(crate) fn unique_temp_dir(label: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("workout_tracker_{label}_{}_{}", std::process::id(), nanos));
    std::fs::create_dir_all(&path).unwrap();
    path
}
