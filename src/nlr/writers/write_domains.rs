use crate::nlr::DomainCalls;
use crate::utils::{PendingOutput, Result};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DOMAINS_FILE_NAME: &str = "nlrexpress.domains.tsv";

/// Tab-separated `protein<TAB>domains` summary, labels comma-joined in
/// sequence order.
pub struct DomainWriter {
    writer: BufWriter<File>,
    pending: PendingOutput,
}

impl DomainWriter {
    pub fn new(output_path: &Path) -> Result<DomainWriter> {
        let (pending, mut writer) = PendingOutput::new(output_path)?;
        writeln!(writer, "protein\tdomains")?;
        Ok(DomainWriter { writer, pending })
    }

    pub fn write(&mut self, calls: &DomainCalls) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}",
            calls.protein,
            calls.domains.iter().join(",")
        )?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        drop(self.writer);
        self.pending.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motifs::DomainFamily;
    use std::fs;

    #[test]
    fn test_domain_summary_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DOMAINS_FILE_NAME);
        let mut writer = DomainWriter::new(&path).unwrap();
        writer
            .write(&DomainCalls {
                protein: "p1".into(),
                domains: vec![DomainFamily::CC, DomainFamily::NBARC, DomainFamily::LRR],
            })
            .unwrap();
        writer
            .write(&DomainCalls {
                protein: "p2".into(),
                domains: vec![],
            })
            .unwrap();
        writer.finish().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "protein\tdomains\np1\tCC,NBARC,LRR\np2\t\n"
        );
    }
}
