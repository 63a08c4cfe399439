use super::{open_input_reader, Error, Result};
use bio::io::fasta;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinSequence {
    pub id: String,
    pub residues: Vec<u8>,
}

impl ProteinSequence {
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residues in `[start, end)`, clamped to the sequence bounds.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.residues.len());
        let start = start.min(end);
        std::str::from_utf8(&self.residues[start..end]).unwrap_or("")
    }
}

/// Protein sequences keyed by identifier, in input order.
#[derive(Debug, Default, Clone)]
pub struct SequenceStore {
    records: Vec<ProteinSequence>,
    index: HashMap<String, usize>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, residues: &[u8]) -> Result<()> {
        if self.index.contains_key(id) {
            return Err(Error::Parse(format!("Duplicate protein identifier: {}", id)));
        }
        if !residues.is_ascii() {
            return Err(Error::Parse(format!(
                "Protein {} contains non-ASCII residues",
                id
            )));
        }
        self.index.insert(id.to_string(), self.records.len());
        self.records.push(ProteinSequence {
            id: id.to_string(),
            residues: residues.to_ascii_uppercase(),
        });
        Ok(())
    }

    pub fn from_fasta_path(path: &Path) -> Result<Self> {
        let reader = open_input_reader(path)?;
        Self::from_fasta_reader(reader)
    }

    pub fn from_fasta_reader<R: Read>(reader: R) -> Result<Self> {
        let mut store = Self::new();
        for (record_number, record) in fasta::Reader::new(reader).records().enumerate() {
            let record = record.map_err(|e| {
                Error::Parse(format!("FASTA record {}: {}", record_number + 1, e))
            })?;
            if record.seq().is_empty() {
                log::warn!("Skipping protein {} with an empty sequence", record.id());
                continue;
            }
            store.insert(record.id(), record.seq())?;
        }
        if store.is_empty() {
            return Err(Error::Parse("No sequences found in FASTA input".into()));
        }
        log::debug!("Loaded {} protein sequences", store.len());
        Ok(store)
    }

    /// Writes the sequences as FASTA with identifiers only.
    pub fn write_fasta<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = fasta::Writer::new(writer);
        for record in &self.records {
            writer.write(&record.id, None, &record.residues)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ProteinSequence> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    #[cfg(test)]
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProteinSequence> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_wrapped_records_keep_input_order() {
        let data = ">zeta desc\nMEDV\nIDaa\n>alpha\nMKL\n";
        let store = SequenceStore::from_fasta_reader(Cursor::new(data)).unwrap();
        let ids: Vec<&str> = store.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
        assert_eq!(store.get("zeta").unwrap().residues, b"MEDVIDAA");
        assert_eq!(store.position("alpha"), Some(1));
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let data = ">p1\nMKL\n>p1\nMKV\n";
        let err = SequenceStore::from_fasta_reader(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_empty_record_is_skipped() {
        let data = ">blank\n>p1\nMKL\n";
        let store = SequenceStore::from_fasta_reader(Cursor::new(data)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("blank").is_none());

        let err = SequenceStore::from_fasta_reader(Cursor::new(">blank\n")).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_slice_truncates_at_bounds() {
        let mut store = SequenceStore::new();
        store.insert("p", b"MEDVID").unwrap();
        let seq = store.get("p").unwrap();
        assert_eq!(seq.slice(0, 3), "MED");
        assert_eq!(seq.slice(4, 10), "ID");
        assert_eq!(seq.slice(8, 12), "");
    }

    #[test]
    fn test_write_fasta_drops_descriptions() {
        let data = ">p1 some description\nMEDVID\n";
        let store = SequenceStore::from_fasta_reader(Cursor::new(data)).unwrap();
        let mut out = Vec::new();
        store.write_fasta(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">p1\nMEDVID\n");
    }
}
