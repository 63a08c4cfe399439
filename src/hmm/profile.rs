use super::{parse_profile_file, ProfileMap, ALPHABET_SIZE};
use crate::utils::{Error, ProteinSequence, Result, SequenceStore};
use std::path::{Path, PathBuf};

/// Values per residue in a merged profile: both search iterations side by side.
pub const FEATURES_PER_RESIDUE: usize = 2 * ALPHABET_SIZE;

/// Profiles from the two jackhmmer iterations.
#[derive(Debug, Clone)]
pub struct SearchProfiles {
    first: ProfileMap,
    second: Option<ProfileMap>,
}

/// Conventional profile paths for a search run: `<dir>/<stem>-1.hmm` and `<dir>/<stem>-2.hmm`.
pub fn profile_paths(output_dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        output_dir.join(format!("{}-1.hmm", stem)),
        output_dir.join(format!("{}-2.hmm", stem)),
    )
}

impl SearchProfiles {
    pub fn new(first: ProfileMap, second: Option<ProfileMap>) -> Self {
        Self { first, second }
    }

    /// Loads both iterations. The first is required; a missing second
    /// iteration falls back to the first one alone.
    pub fn load(first_path: &Path, second_path: &Path) -> Result<Self> {
        log::info!("Parsing HMM profiles");
        let first = parse_profile_file(first_path).map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound(format!(
                "HMM profile iteration 1 was not found at {}",
                first_path.display()
            )),
            other => other,
        })?;
        let second = match parse_profile_file(second_path) {
            Ok(profiles) => Some(profiles),
            Err(e) if e.is_not_found() => {
                log::warn!(
                    "HMM profile iteration 2 was not found at {}. The first iteration profile will be used alone.",
                    second_path.display()
                );
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self { first, second })
    }

    /// Builds the per-residue feature source for every protein of the store,
    /// in store order.
    pub fn merge(&self, store: &SequenceStore) -> Result<Vec<MergedProfile>> {
        store.iter().map(|seq| self.merge_protein(seq)).collect()
    }

    fn merge_protein(&self, seq: &ProteinSequence) -> Result<MergedProfile> {
        let first = self.first.get(&seq.id).ok_or_else(|| {
            Error::Inconsistent(format!("No HMM profile found for protein {}", seq.id))
        })?;
        check_profile_length(&seq.id, first.len(), seq.len(), 1)?;

        let second = match self.second.as_ref().and_then(|p| p.get(&seq.id)) {
            Some(second) => {
                check_profile_length(&seq.id, second.len(), seq.len(), 2)?;
                second
            }
            None => {
                log::debug!(
                    "{}: no second iteration profile, duplicating the first",
                    seq.id
                );
                first
            }
        };

        let mut values = Vec::with_capacity(seq.len() * FEATURES_PER_RESIDUE);
        for (a, b) in first.iter().zip(second.iter()) {
            values.extend_from_slice(a);
            values.extend_from_slice(b);
        }
        Ok(MergedProfile { values })
    }
}

fn check_profile_length(id: &str, found: usize, expected: usize, iteration: usize) -> Result<()> {
    if found != expected {
        return Err(Error::Inconsistent(format!(
            "Iteration {} profile of {} has {} positions but the sequence has {} residues",
            iteration, id, found, expected
        )));
    }
    Ok(())
}

/// Flat per-residue features of one protein, `FEATURES_PER_RESIDUE` values per residue.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedProfile {
    values: Vec<f64>,
}

impl MergedProfile {
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() % FEATURES_PER_RESIDUE != 0 {
            return Err(Error::Inconsistent(format!(
                "Merged profile of {} values is not a multiple of {}",
                values.len(),
                FEATURES_PER_RESIDUE
            )));
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len() / FEATURES_PER_RESIDUE
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn residue(&self, position: usize) -> &[f64] {
        self.window(position, position)
    }

    /// Features of residues `first..=last` concatenated in position order.
    pub fn window(&self, first: usize, last: usize) -> &[f64] {
        &self.values[first * FEATURES_PER_RESIDUE..(last + 1) * FEATURES_PER_RESIDUE]
    }
}
