use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::TempDir;

use super::BatchError;

const RENAMED_DIR: &str = "renamed";

/// Scratch directory owned by one batch.
///
/// Lives under the artifacts root so publishing is a same-filesystem
/// rename. The directory and anything still inside it are removed when the
/// workspace is dropped, whether the batch succeeded or not.
pub struct BatchWorkspace {
    dir: TempDir,
    renamed_dir: PathBuf,
}

impl BatchWorkspace {
    pub fn create(root: &Path) -> Result<Self, BatchError> {
        fs::create_dir_all(root).map_err(BatchError::WorkingDir)?;
        let dir = tempfile::Builder::new()
            .prefix("batch_")
            .tempdir_in(root)
            .map_err(BatchError::WorkingDir)?;
        let renamed_dir = dir.path().join(RENAMED_DIR);
        fs::create_dir(&renamed_dir).map_err(BatchError::WorkingDir)?;

        debug!("Created batch workspace at {}", dir.path().display());
        Ok(Self { dir, renamed_dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn renamed_dir(&self) -> &Path {
        &self.renamed_dir
    }

    /// Write a byte-identical copy of an upload under its generated name.
    pub fn write_renamed(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, BatchError> {
        let path = self.renamed_dir.join(name);
        fs::write(&path, bytes).map_err(|source| BatchError::RenamedCopy {
            name: name.to_string(),
            source,
        })?;
        Ok(path)
    }

    /// Move `name` out of the workspace into `destination_dir`.
    pub fn publish(&self, name: &str, destination_dir: &Path) -> Result<PathBuf, BatchError> {
        let from = self.dir.path().join(name);
        let to = destination_dir.join(name);
        fs::rename(&from, &to).map_err(|source| BatchError::Publish {
            name: name.to_string(),
            source,
        })?;
        Ok(to)
    }
}
