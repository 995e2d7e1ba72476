//! Download of the canonical interaction dataset

use crate::error::ImportResult;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Canonical IntAct cluster file, used when no local file is supplied.
pub const INTACT_URL: &str =
    "https://ftp.ebi.ac.uk/pub/databases/intact/current/psimitab/intact-micluster.txt";

/// Fetch the canonical interaction file into `dest_dir`, streaming to disk.
/// Returns the path of the downloaded file.
pub async fn download_interactions(dest_dir: &Path) -> ImportResult<PathBuf> {
    let dest = dest_dir.join("intact-micluster.txt");

    info!(url = INTACT_URL, dest = %dest.display(), "Downloading interaction data");

    let mut response = reqwest::get(INTACT_URL).await?.error_for_status()?;

    let mut file = tokio::fs::File::create(&dest).await?;
    let mut bytes: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        bytes += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    info!(bytes, "Interaction data downloaded");

    Ok(dest)
}
