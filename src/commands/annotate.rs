use crate::cli::AnnotateArgs;
use crate::motifs::MotifCatalog;
use crate::nlr::{
    classify_domains, read_hits,
    writers::{DomainWriter, DOMAINS_FILE_NAME},
    DomainParams, DomainReport,
};
use crate::utils::{create_writer, Result};
use itertools::Itertools;
use std::fs;
use std::path::Path;

pub fn annotate(args: AnnotateArgs) -> Result<()> {
    fs::create_dir_all(&args.output_dir)?;
    let catalog = MotifCatalog::new(args.catalog.as_deref())?;
    let hits = read_hits(&args.input)?;
    let params = DomainParams {
        threshold: args.domain_threshold,
        fail_fast: args.fail_fast,
    };
    let report = classify_domains(&hits, &catalog, &params)?;
    write_domain_report(report, &args.output_dir)
}

/// Writes the domain summary for every classified protein, then fails with
/// the first per-protein error if any protein could not be classified.
pub fn write_domain_report(report: DomainReport, output_dir: &Path) -> Result<()> {
    let mut writer = create_writer(output_dir, DOMAINS_FILE_NAME, DomainWriter::new)?;
    for calls in &report.calls {
        log::debug!("{}: {}", calls.protein, calls.domains.iter().join(","));
        writer.write(calls)?;
    }
    let path = writer.finish()?;
    log::info!(
        "Domain calls for {} proteins written to {}",
        report.calls.len(),
        path.display()
    );

    let failed = report.errors.len();
    match report.errors.into_iter().next() {
        None => Ok(()),
        Some(first) => {
            log::error!("{} protein(s) could not be classified", failed);
            Err(first)
        }
    }
}
