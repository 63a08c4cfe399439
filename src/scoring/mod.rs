mod mlp;
mod registry;

use crate::utils::Result;

pub use mlp::{Activation, MlpScorer, OutputActivation};
pub use registry::{model_locators, ScorerRegistry};

/// Classifier output for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub non_motif: f64,
    pub motif: f64,
}

impl ClassProbabilities {
    pub fn from_motif(motif: f64) -> Self {
        Self {
            non_motif: 1.0 - motif,
            motif,
        }
    }
}

/// A stateless per-motif classifier.
pub trait MotifScorer: Send + Sync {
    /// Feature vector length the scorer accepts, when fixed.
    fn input_dimension(&self) -> Option<usize> {
        None
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities>;

    fn predict_batch(&self, rows: &[&[f64]]) -> Result<Vec<ClassProbabilities>> {
        rows.iter().map(|row| self.predict_proba(row)).collect()
    }
}

#[cfg(test)]
pub(crate) struct ConstantScorer(pub ClassProbabilities);

#[cfg(test)]
impl MotifScorer for ConstantScorer {
    fn predict_proba(&self, _features: &[f64]) -> Result<ClassProbabilities> {
        Ok(self.0)
    }
}
