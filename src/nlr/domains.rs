use super::{passes_cutoff, HitRecord};
use crate::motifs::{DomainFamily, MotifCatalog};
use crate::utils::{Error, Result};
use std::collections::HashMap;

pub const DEFAULT_DOMAIN_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct DomainParams {
    /// Minimum motif probability (fraction) for a hit to count
    pub threshold: f64,
    /// Abort the whole batch on the first protein that fails
    pub fail_fast: bool,
}

impl Default for DomainParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DOMAIN_THRESHOLD,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainCalls {
    pub protein: String,
    pub domains: Vec<DomainFamily>,
}

#[derive(Debug, Default)]
pub struct DomainReport {
    pub calls: Vec<DomainCalls>,
    /// Proteins that could not be classified, one error each
    pub errors: Vec<Error>,
}

/// Ordered domain families of one protein. `hits` must all belong to `protein`.
///
/// Hits are visited by ascending residue; hits whose probability rounded to
/// [`PROBABILITY_DIGITS`](super::PROBABILITY_DIGITS) is below `threshold` are
/// ignored and consecutive hits of the same family collapse into one call.
pub fn classify_protein(
    protein: &str,
    hits: &[&HitRecord],
    catalog: &MotifCatalog,
    threshold: f64,
) -> Result<Vec<DomainFamily>> {
    let mut ordered = hits.to_vec();
    ordered.sort_by_key(|hit| hit.res_id);

    let mut domains: Vec<DomainFamily> = Vec::new();
    for hit in ordered {
        if !passes_cutoff(hit.probability, threshold) {
            continue;
        }
        let family = catalog
            .family_of(&hit.motif)
            .ok_or_else(|| Error::UnknownMotif {
                protein: protein.to_string(),
                res_id: hit.res_id,
                motif: hit.motif.clone(),
            })?;
        if domains.last() != Some(&family) {
            domains.push(family);
        }
    }
    Ok(domains)
}

/// Classifies every protein of a hit table, in order of first appearance.
pub fn classify_domains(
    hits: &[HitRecord],
    catalog: &MotifCatalog,
    params: &DomainParams,
) -> Result<DomainReport> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_protein: HashMap<&str, Vec<&HitRecord>> = HashMap::new();
    for hit in hits {
        by_protein
            .entry(hit.protein.as_str())
            .or_insert_with(|| {
                order.push(hit.protein.as_str());
                Vec::new()
            })
            .push(hit);
    }

    let mut report = DomainReport::default();
    for protein in order {
        let protein_hits = &by_protein[protein];
        match classify_protein(protein, protein_hits, catalog, params.threshold) {
            Ok(domains) => report.calls.push(DomainCalls {
                protein: protein.to_string(),
                domains,
            }),
            Err(e) if params.fail_fast => return Err(e),
            Err(e) => {
                log::error!("{}", e);
                report.errors.push(e);
            }
        }
    }
    Ok(report)
}
