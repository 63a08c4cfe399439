use super::MotifDefinition;
use crate::hmm::{MergedProfile, FEATURES_PER_RESIDUE};

/// Classifier input for one anchor position, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureWindow<'a> {
    /// Index of the protein in input order
    pub protein: usize,
    /// Zero-based anchor position
    pub position: usize,
    pub features: &'a [f64],
}

/// Length of every feature vector built for `motif`.
pub fn feature_dimension(motif: &MotifDefinition) -> usize {
    motif.window_len() * FEATURES_PER_RESIDUE
}

/// Windows of one protein, anchors ascending. Anchors whose window would
/// leave the sequence are skipped.
pub fn protein_windows<'a>(
    motif: &'a MotifDefinition,
    protein: usize,
    profile: &'a MergedProfile,
) -> impl Iterator<Item = FeatureWindow<'a>> + 'a {
    motif
        .anchor_range(profile.len())
        .map(move |position| FeatureWindow {
            protein,
            position,
            features: profile.window(
                position - motif.left,
                position + motif.span + motif.right,
            ),
        })
}

/// Windows of all proteins, in protein order then anchor order.
pub fn feature_windows<'a>(
    motif: &'a MotifDefinition,
    profiles: &'a [MergedProfile],
) -> impl Iterator<Item = FeatureWindow<'a>> + 'a {
    profiles
        .iter()
        .enumerate()
        .flat_map(move |(protein, profile)| protein_windows(motif, protein, profile))
}
