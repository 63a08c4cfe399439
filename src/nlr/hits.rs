use crate::motifs::MotifDefinition;
use crate::utils::{open_input_reader, Error, ProteinSequence, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Residues of context reported on each side of a motif.
pub const CONTEXT_LEN: usize = 5;

/// A motif prediction at one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub protein: String,
    /// 1-based residue of the motif start
    pub res_id: usize,
    pub motif: String,
    /// Motif probability as a fraction
    pub probability: f64,
    pub left_context: String,
    pub motif_seq: String,
    pub right_context: String,
}

impl HitRecord {
    /// Builds the hit for the window anchored at zero-based `position`.
    /// Contexts are truncated at the sequence ends.
    pub fn new(
        seq: &ProteinSequence,
        motif: &MotifDefinition,
        position: usize,
        probability: f64,
    ) -> Self {
        let motif_end = position + motif.span;
        Self {
            protein: seq.id.clone(),
            res_id: position + 1,
            motif: motif.name.clone(),
            probability,
            left_context: seq
                .slice(position.saturating_sub(CONTEXT_LEN), position)
                .to_string(),
            motif_seq: seq.slice(position, motif_end).to_string(),
            right_context: seq.slice(motif_end, motif_end + CONTEXT_LEN).to_string(),
        }
    }

    pub fn percent(&self) -> f64 {
        100.0 * self.probability
    }
}

/// Column layout of the hit table.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HitRow {
    pub protein: String,
    pub res_id: usize,
    pub motif_id: String,
    pub probability: f64,
    pub negative_5_pos: String,
    pub motifseq: String,
    pub positive_5_pos: String,
}

impl From<&HitRecord> for HitRow {
    fn from(hit: &HitRecord) -> Self {
        Self {
            protein: hit.protein.clone(),
            res_id: hit.res_id,
            motif_id: hit.motif.clone(),
            probability: hit.percent(),
            negative_5_pos: hit.left_context.clone(),
            motifseq: hit.motif_seq.clone(),
            positive_5_pos: hit.right_context.clone(),
        }
    }
}

impl HitRow {
    fn into_record(self, row_number: usize) -> Result<HitRecord> {
        if self.res_id == 0 {
            return Err(Error::Parse(format!(
                "Hit table row {}: residue ids are 1-based",
                row_number
            )));
        }
        if !(0.0..=100.0).contains(&self.probability) {
            return Err(Error::Parse(format!(
                "Hit table row {}: probability {} is outside [0, 100]",
                row_number, self.probability
            )));
        }
        Ok(HitRecord {
            protein: self.protein,
            res_id: self.res_id,
            motif: self.motif_id,
            probability: self.probability / 100.0,
            left_context: self.negative_5_pos,
            motif_seq: self.motifseq,
            right_context: self.positive_5_pos,
        })
    }
}

/// Reads a hit table previously written by `predict`.
pub fn read_hits(path: &Path) -> Result<Vec<HitRecord>> {
    let reader = open_input_reader(path)?;
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut hits = Vec::new();
    for (idx, row) in csv_reader.deserialize::<HitRow>().enumerate() {
        // header is line 1
        let row_number = idx + 2;
        let row = row.map_err(|e| {
            Error::Parse(format!(
                "{}: row {}: {}",
                path.display(),
                row_number,
                e
            ))
        })?;
        hits.push(row.into_record(row_number)?);
    }
    log::debug!("Read {} hits from {}", hits.len(), path.display());
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motifs::MotifCatalog;
    use crate::utils::SequenceStore;
    use std::fs;

    fn sequence(residues: &str) -> ProteinSequence {
        let mut store = SequenceStore::new();
        store.insert("p", residues.as_bytes()).unwrap();
        store.get("p").unwrap().clone()
    }

    #[test]
    fn test_hit_contexts() {
        let catalog = MotifCatalog::default();
        let mhd = catalog.get("MHD").unwrap();
        let seq = sequence("AAAAACCCCCMHDGGGGGTT");
        let hit = HitRecord::new(&seq, mhd, 10, 0.5);
        assert_eq!(hit.res_id, 11);
        assert_eq!(hit.left_context, "CCCCC");
        assert_eq!(hit.motif_seq, "MHD");
        assert_eq!(hit.right_context, "GGGGG");
        assert_eq!(hit.percent(), 50.0);
    }

    #[test]
    fn test_hit_contexts_truncated_at_bounds() {
        let catalog = MotifCatalog::default();
        let mhd = catalog.get("MHD").unwrap();
        let seq = sequence("KLMHDQ");
        let hit = HitRecord::new(&seq, mhd, 2, 0.5);
        assert_eq!(hit.left_context, "KL");
        assert_eq!(hit.motif_seq, "MHD");
        assert_eq!(hit.right_context, "Q");
    }

    #[test]
    fn test_read_hits_converts_percentages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nlrexpress.csv");
        fs::write(
            &path,
            "protein,res_id,motif_id,probability,negative_5_pos,motifseq,positive_5_pos\n\
             p1,12,MHD,85.5,CCCCC,MHD,GGGGG\n\
             p1,3,VG,20.0,,VGAAA,\n",
        )
        .unwrap();
        let hits = read_hits(&path).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].motif, "MHD");
        assert!((hits[0].probability - 0.855).abs() < 1e-12);
        assert_eq!(hits[1].left_context, "");
    }

    #[test]
    fn test_read_hits_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "protein,res_id,motif_id,probability,negative_5_pos,motifseq,positive_5_pos\n\
             p1,abc,MHD,85.5,CCCCC,MHD,GGGGG\n",
        )
        .unwrap();
        assert!(matches!(read_hits(&path), Err(Error::Parse(_))));

        fs::write(
            &path,
            "protein,res_id,motif_id,probability,negative_5_pos,motifseq,positive_5_pos\n\
             p1,1,MHD,185.5,CCCCC,MHD,GGGGG\n",
        )
        .unwrap();
        assert!(matches!(read_hits(&path), Err(Error::Parse(_))));
    }
}
