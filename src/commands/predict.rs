use super::annotate::write_domain_report;
use crate::cli::PredictArgs;
use crate::hmm::{profile_paths, run_jackhmmer, JackhmmerParams, SearchProfiles};
use crate::motifs::MotifCatalog;
use crate::nlr::{
    classify_domains, scan,
    writers::{HitWriter, HITS_FILE_NAME},
    DomainParams, ScanParams,
};
use crate::scoring::ScorerRegistry;
use crate::utils::{create_writer, Result, SequenceStore};
use itertools::Itertools;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

/// File stem of the input with any compression extension removed.
fn input_stem(input: &Path) -> String {
    let path = match input.extension().and_then(|e| e.to_str()) {
        Some("gz") | Some("gzip") => input.with_extension(""),
        _ => input.to_path_buf(),
    };
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "input".to_string())
}

pub fn predict(args: PredictArgs) -> Result<()> {
    fs::create_dir_all(&args.output_dir)?;

    let catalog = MotifCatalog::new(args.catalog.as_deref())?;
    let store = SequenceStore::from_fasta_path(&args.input)?;
    log::info!("Loaded {} proteins", store.len());

    // Fail on missing models before spending time on the search
    let registry = ScorerRegistry::load_models(&catalog, &args.models_dir)?;

    let stem = input_stem(&args.input);
    let (first_profile, second_profile) = profile_paths(&args.output_dir, &stem);
    if args.reuse_profiles && first_profile.exists() {
        log::info!("Reusing HMM profiles at {}", first_profile.display());
    } else {
        let cleaned_fasta = args.output_dir.join(format!("{}.fasta_proc", stem));
        store.write_fasta(File::create(&cleaned_fasta)?)?;

        let mut search_params =
            JackhmmerParams::new(args.jackhmmer.clone(), args.database.clone(), args.num_threads);
        search_params.timeout = args.search_timeout.map(Duration::from_secs);
        run_jackhmmer(
            &search_params,
            &cleaned_fasta,
            &args.output_dir.join(&stem),
        )?;
    }

    let profiles = SearchProfiles::load(&first_profile, &second_profile)?.merge(&store)?;

    let scan_params = ScanParams {
        cutoff: args.cutoff,
        threads: args.num_threads,
    };
    let report = scan(&store, &profiles, &catalog, &registry, &scan_params)?;

    let mut hit_writer = create_writer(&args.output_dir, HITS_FILE_NAME, HitWriter::new)?;
    for hit in &report.hits {
        hit_writer.write(hit)?;
    }
    let hits_path = hit_writer.finish()?;
    log::info!("Hits written to {}", hits_path.display());

    if !report.failures.is_empty() {
        log::warn!(
            "{} motif(s) could not be scored and are missing from the output: {}",
            report.failures.len(),
            report
                .failures
                .iter()
                .map(|f| f.motif.as_str())
                .join(", ")
        );
    }

    if args.annotate {
        let params = DomainParams {
            threshold: args.domain_threshold,
            fail_fast: false,
        };
        let domains = classify_domains(&report.hits, &catalog, &params)?;
        write_domain_report(domains, &args.output_dir)?;
    }

    Ok(())
}
