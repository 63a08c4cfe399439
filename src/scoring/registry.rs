use super::{MlpScorer, MotifScorer};
use crate::motifs::{feature_dimension, MotifCatalog};
use crate::utils::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Motif name to scorer.
#[derive(Default)]
pub struct ScorerRegistry {
    scorers: HashMap<String, Box<dyn MotifScorer>>,
}

/// Resolves each catalog motif's model locator against `models_dir`.
pub fn model_locators(catalog: &MotifCatalog, models_dir: &Path) -> Vec<(String, PathBuf)> {
    catalog
        .iter()
        .map(|motif| (motif.name.clone(), models_dir.join(&motif.model)))
        .collect()
}

impl ScorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, motif: &str, scorer: Box<dyn MotifScorer>) {
        self.scorers.insert(motif.to_string(), scorer);
    }

    pub fn get(&self, motif: &str) -> Option<&dyn MotifScorer> {
        self.scorers.get(motif).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Builds a registry from `motif -> locator` pairs using `load` to
    /// materialize each scorer. Every catalog motif must resolve and accept
    /// feature vectors of its window size.
    pub fn from_locators<F>(
        catalog: &MotifCatalog,
        locators: &[(String, PathBuf)],
        load: F,
    ) -> Result<Self>
    where
        F: Fn(&Path) -> Result<Box<dyn MotifScorer>>,
    {
        let locators: HashMap<&str, &PathBuf> =
            locators.iter().map(|(m, p)| (m.as_str(), p)).collect();
        let mut registry = Self::new();
        for motif in catalog.iter() {
            let locator = locators.get(motif.name.as_str()).ok_or_else(|| {
                Error::NotFound(format!("No model resource configured for motif {}", motif.name))
            })?;
            let scorer = load(locator)?;
            let expected = feature_dimension(motif);
            if let Some(found) = scorer.input_dimension() {
                if found != expected {
                    return Err(Error::Parse(format!(
                        "Model {} for motif {} takes {} features but its window produces {}",
                        locator.display(),
                        motif.name,
                        found,
                        expected
                    )));
                }
            }
            log::debug!("Loaded model for {} from {}", motif.name, locator.display());
            registry.insert(&motif.name, scorer);
        }
        Ok(registry)
    }

    /// Loads the MLP model of every catalog motif from `models_dir`.
    pub fn load_models(catalog: &MotifCatalog, models_dir: &Path) -> Result<Self> {
        log::info!("Loading {} motif models from {}", catalog.len(), models_dir.display());
        Self::from_locators(catalog, &model_locators(catalog, models_dir), |path| {
            Ok(Box::new(MlpScorer::from_path(path)?) as Box<dyn MotifScorer>)
        })
    }
}
