use crate::utils::Result;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// An output file that only appears under its final name once committed.
///
/// Data is written to a hidden sibling file which is renamed on
/// [`PendingOutput::commit`] and removed if the value is dropped first, so a
/// failed run does not leave truncated outputs behind.
pub struct PendingOutput {
    final_path: PathBuf,
    temp_path: PathBuf,
    committed: bool,
}

impl PendingOutput {
    pub fn new(final_path: &Path) -> Result<(Self, BufWriter<File>)> {
        let file_name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = final_path.with_file_name(format!(".{}.partial", file_name));
        let file = File::create(&temp_path)?;
        Ok((
            Self {
                final_path: final_path.to_path_buf(),
                temp_path,
                committed: false,
            },
            BufWriter::new(file),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.final_path
    }

    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp_path, &self.final_path)?;
        self.committed = true;
        log::debug!("Wrote {}", self.final_path.display());
        Ok(self.final_path.clone())
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

pub fn create_writer<T, F>(output_dir: &Path, file_name: &str, f: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let output_path = output_dir.join(file_name);
    f(&output_path)
}
