use crate::output::document::SerializedDocument;
use crate::output::filename::derive_filename;
use crate::HarvestError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files of concurrent writes to the same document
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Creates the output directory (and parents) if needed
///
/// # Returns
///
/// * `Ok(())` - The directory exists
/// * `Err(HarvestError::OutputDir)` - It could not be created
pub async fn ensure_output_dir(dir: &Path) -> Result<(), HarvestError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| HarvestError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Writes a document into `dir` under its derived file name
///
/// The content goes to a temporary sibling first and is renamed into place,
/// so readers never observe a half-written document and a re-run replaces
/// the previous file.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(HarvestError::Write)` - The write or rename failed
pub async fn write_document(
    dir: &Path,
    document: &SerializedDocument,
) -> Result<PathBuf, HarvestError> {
    let file_name = derive_filename(&document.metadata.url);
    let path = dir.join(&file_name);
    let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_path = dir.join(format!(".{}.{}-{}.tmp", file_name, std::process::id(), seq));

    let write_err = |source| HarvestError::Write {
        path: path.clone(),
        source,
    };

    tokio::fs::write(&tmp_path, document.content.as_bytes())
        .await
        .map_err(write_err)?;

    if let Err(source) = tokio::fs::rename(&tmp_path, &path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(source));
    }

    tracing::trace!("Wrote {} bytes to {}", document.content.len(), path.display());
    Ok(path)
}
