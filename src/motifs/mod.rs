mod catalog;
mod window;

pub use catalog::{DomainFamily, MotifCatalog, MotifDefinition};
pub use window::{feature_dimension, feature_windows, protein_windows, FeatureWindow};
