//! Defines the `HitWriter` struct for writing motif hits to a CSV table.
//!
use crate::nlr::hits::{HitRecord, HitRow};
use crate::utils::{Error, PendingOutput, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const HITS_FILE_NAME: &str = "nlrexpress.csv";

/// Writes hit records with the columns
/// `protein,res_id,motif_id,probability,negative_5_pos,motifseq,positive_5_pos`.
///
/// Rows go to a pending file that only replaces the final path on
/// [`HitWriter::finish`].
pub struct HitWriter {
    writer: csv::Writer<BufWriter<File>>,
    pending: PendingOutput,
    rows: usize,
}

impl HitWriter {
    pub fn new(output_path: &Path) -> Result<HitWriter> {
        let (pending, file) = PendingOutput::new(output_path)?;
        Ok(HitWriter {
            writer: csv::Writer::from_writer(file),
            pending,
            rows: 0,
        })
    }

    pub fn write(&mut self, hit: &HitRecord) -> Result<()> {
        self.writer
            .serialize(HitRow::from(hit))
            .map_err(|e| csv_error(self.pending.path(), e))?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        if self.rows == 0 {
            // serialize() emits the header with the first row
            self.writer
                .write_record([
                    "protein",
                    "res_id",
                    "motif_id",
                    "probability",
                    "negative_5_pos",
                    "motifseq",
                    "positive_5_pos",
                ])
                .map_err(|e| csv_error(self.pending.path(), e))?;
        }
        self.writer.flush()?;
        drop(self.writer);
        log::info!("Wrote {} hits", self.rows);
        self.pending.commit()
    }
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    Error::Parse(format!("Failed to write {}: {}", path.display(), err))
}
