//! Motif scan: scores every valid anchor of every protein for every catalog
//! motif and keeps the windows whose motif probability clears the cutoff.
//!
//! Each feature window carries its own (protein, position) tag from the
//! window builder through the scorer, so classifier outputs never have to be
//! re-aligned to residues by replaying the traversal order.
//!
use super::HitRecord;
use crate::hmm::MergedProfile;
use crate::motifs::{feature_windows, FeatureWindow, MotifCatalog, MotifDefinition};
use crate::scoring::{MotifScorer, ScorerRegistry};
use crate::utils::{round_to, Error, Result, SequenceStore};
use itertools::Itertools;
use rayon::{prelude::*, ThreadPoolBuilder};

pub const DEFAULT_CUTOFF: f64 = 0.2;
/// Probabilities are rounded to this many digits before the cutoff is applied.
pub const PROBABILITY_DIGITS: i32 = 4;
/// Windows handed to a scorer per call.
const BATCH_SIZE: usize = 2048;

#[derive(Debug, Clone)]
pub struct ScanParams {
    pub cutoff: f64,
    pub threads: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            threads: 1,
        }
    }
}

#[derive(Debug)]
pub struct MotifFailure {
    pub motif: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub hits: Vec<HitRecord>,
    /// Motifs whose scoring failed; their hits are absent from `hits`
    pub failures: Vec<MotifFailure>,
    /// Windows whose motif probability was NaN or infinite, over all motifs
    pub non_finite_windows: usize,
}

pub fn passes_cutoff(probability: f64, cutoff: f64) -> bool {
    round_to(probability, PROBABILITY_DIGITS) >= cutoff
}

/// Hit tagged with its sort key: protein index, anchor position, catalog rank.
type TaggedHit = ((usize, usize, usize), HitRecord);

#[derive(Debug, Default)]
struct MotifScan {
    hits: Vec<TaggedHit>,
    non_finite: usize,
}

pub fn scan(
    store: &SequenceStore,
    profiles: &[MergedProfile],
    catalog: &MotifCatalog,
    registry: &ScorerRegistry,
    params: &ScanParams,
) -> Result<ScanReport> {
    check_profiles(store, profiles)?;

    let motifs: Vec<(usize, &MotifDefinition)> = catalog.iter().enumerate().collect();
    let pool = ThreadPoolBuilder::new()
        .num_threads(params.threads)
        .thread_name(|i| format!("nlrexpress-{}", i))
        .build()
        .map_err(|e| Error::Inconsistent(format!("Failed to initialize thread pool: {}", e)))?;

    let results: Vec<(String, Result<MotifScan>)> = pool.install(|| {
        motifs
            .par_iter()
            .map(|&(rank, motif)| {
                let result = match registry.get(&motif.name) {
                    Some(scorer) => {
                        scan_motif(rank, motif, store, profiles, scorer, params.cutoff)
                    }
                    None => Err(Error::NotFound(format!(
                        "No scorer registered for motif {}",
                        motif.name
                    ))),
                };
                (motif.name.clone(), result)
            })
            .collect()
    });

    let mut report = ScanReport::default();
    let mut tagged = Vec::new();
    for (motif, result) in results {
        match result {
            Ok(motif_scan) => {
                log::debug!("{}: {} hits", motif, motif_scan.hits.len());
                report.non_finite_windows += motif_scan.non_finite;
                tagged.extend(motif_scan.hits);
            }
            Err(error) => {
                log::error!("Scoring motif {} failed: {}", motif, error);
                report.failures.push(MotifFailure { motif, error });
            }
        }
    }
    tagged.sort_by_key(|(key, _)| *key);
    report.hits = tagged.into_iter().map(|(_, hit)| hit).collect();
    log::info!(
        "Scan finished: {} hits over {} proteins",
        report.hits.len(),
        store.len()
    );
    Ok(report)
}

fn check_profiles(store: &SequenceStore, profiles: &[MergedProfile]) -> Result<()> {
    if store.len() != profiles.len() {
        return Err(Error::Inconsistent(format!(
            "{} sequences but {} profiles",
            store.len(),
            profiles.len()
        )));
    }
    for (seq, profile) in store.iter().zip(profiles) {
        if seq.len() != profile.len() {
            return Err(Error::Inconsistent(format!(
                "Profile of {} covers {} residues but the sequence has {}",
                seq.id,
                profile.len(),
                seq.len()
            )));
        }
    }
    Ok(())
}

fn scan_motif(
    rank: usize,
    motif: &MotifDefinition,
    store: &SequenceStore,
    profiles: &[MergedProfile],
    scorer: &dyn MotifScorer,
    cutoff: f64,
) -> Result<MotifScan> {
    log::info!("Scoring motif {}", motif.name);
    let sequences: Vec<_> = store.iter().collect();
    let mut motif_scan = MotifScan::default();

    let batches = feature_windows(motif, profiles).chunks(BATCH_SIZE);
    for batch in &batches {
        let windows: Vec<FeatureWindow> = batch.collect();
        let rows: Vec<&[f64]> = windows.iter().map(|w| w.features).collect();
        let probabilities = scorer.predict_batch(&rows)?;
        if probabilities.len() != windows.len() {
            return Err(Error::Inconsistent(format!(
                "Scorer for {} returned {} results for {} windows",
                motif.name,
                probabilities.len(),
                windows.len()
            )));
        }

        for (window, probs) in windows.iter().zip(probabilities) {
            if !probs.motif.is_finite() {
                motif_scan.non_finite += 1;
            } else if passes_cutoff(probs.motif, cutoff) {
                let seq = sequences[window.protein];
                motif_scan.hits.push((
                    (window.protein, window.position, rank),
                    HitRecord::new(seq, motif, window.position, probs.motif),
                ));
            }
        }
    }
    if motif_scan.non_finite > 0 {
        log::warn!(
            "{}: {} window(s) scored a non-finite probability and were skipped",
            motif.name,
            motif_scan.non_finite
        );
    }
    Ok(motif_scan)
}
