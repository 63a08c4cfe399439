//! Multi-layer perceptron scorer.
//!
//! Models are JSON files laid out like scikit-learn's `MLPClassifier`
//! attributes: `coefs` holds one `[inputs][outputs]` matrix per layer,
//! `intercepts` one bias vector per layer.
//!
use super::{ClassProbabilities, MotifScorer};
use crate::utils::{open_input_reader, Error, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Identity,
    Logistic,
    Tanh,
    Relu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    /// One output unit holding the motif probability
    Logistic,
    /// Two output units, non-motif then motif
    Softmax,
}

fn default_activation() -> Activation {
    Activation::Relu
}

fn default_out_activation() -> OutputActivation {
    OutputActivation::Logistic
}

#[derive(Debug, Deserialize)]
struct MlpModelFile {
    #[serde(default = "default_activation")]
    activation: Activation,
    #[serde(default = "default_out_activation")]
    out_activation: OutputActivation,
    coefs: Vec<Vec<Vec<f64>>>,
    intercepts: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct Layer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct MlpScorer {
    layers: Vec<Layer>,
    activation: Activation,
    out_activation: OutputActivation,
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl MlpScorer {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = open_input_reader(path).map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound(format!("Model {}", path.display())),
            other => other,
        })?;
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json(&json).map_err(|e| match e {
            Error::Parse(msg) => Error::Parse(format!("Model {}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: MlpModelFile =
            serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?;
        Self::from_model(model)
    }

    fn from_model(model: MlpModelFile) -> Result<Self> {
        if model.coefs.is_empty() || model.coefs.len() != model.intercepts.len() {
            return Err(Error::Parse(format!(
                "expected matching non-empty coefs and intercepts, found {} and {}",
                model.coefs.len(),
                model.intercepts.len()
            )));
        }

        let mut layers = Vec::with_capacity(model.coefs.len());
        for (layer_idx, (coefs, bias)) in model.coefs.into_iter().zip(model.intercepts).enumerate() {
            let rows = coefs.len();
            let cols = coefs.first().map_or(0, |r| r.len());
            if rows == 0 || cols == 0 || coefs.iter().any(|r| r.len() != cols) {
                return Err(Error::Parse(format!(
                    "layer {} weights are not a non-empty rectangular matrix",
                    layer_idx
                )));
            }
            if bias.len() != cols {
                return Err(Error::Parse(format!(
                    "layer {} has {} outputs but {} intercepts",
                    layer_idx,
                    cols,
                    bias.len()
                )));
            }
            if let Some(prev) = layers.last().map(|l: &Layer| l.weights.ncols()) {
                if prev != rows {
                    return Err(Error::Parse(format!(
                        "layer {} expects {} inputs but the previous layer has {} outputs",
                        layer_idx, rows, prev
                    )));
                }
            }
            let flat: Vec<f64> = coefs.into_iter().flatten().collect();
            let weights = Array2::from_shape_vec((rows, cols), flat)
                .map_err(|e| Error::Parse(format!("layer {}: {}", layer_idx, e)))?;
            layers.push(Layer {
                weights,
                bias: Array1::from(bias),
            });
        }

        let outputs = layers.last().map_or(0, |l| l.weights.ncols());
        let expected_outputs = match model.out_activation {
            OutputActivation::Logistic => 1,
            OutputActivation::Softmax => 2,
        };
        if outputs != expected_outputs {
            return Err(Error::Parse(format!(
                "{:?} output expects {} units, found {}",
                model.out_activation, expected_outputs, outputs
            )));
        }

        Ok(Self {
            layers,
            activation: model.activation,
            out_activation: model.out_activation,
        })
    }

    fn activate(&self, values: &mut Array2<f64>) {
        match self.activation {
            Activation::Identity => {}
            Activation::Logistic => values.mapv_inplace(logistic),
            Activation::Tanh => values.mapv_inplace(f64::tanh),
            Activation::Relu => values.mapv_inplace(|v| v.max(0.0)),
        }
    }

    /// Forward pass over a `(samples, inputs)` matrix.
    fn forward(&self, mut values: Array2<f64>) -> Vec<ClassProbabilities> {
        let last = self.layers.len() - 1;
        for (idx, layer) in self.layers.iter().enumerate() {
            values = values.dot(&layer.weights) + &layer.bias;
            if idx != last {
                self.activate(&mut values);
            }
        }
        values
            .axis_iter(Axis(0))
            .map(|row| self.output_probabilities(row))
            .collect()
    }

    fn output_probabilities(&self, row: ArrayView1<f64>) -> ClassProbabilities {
        match self.out_activation {
            OutputActivation::Logistic => {
                let motif = logistic(row[0]);
                ClassProbabilities {
                    non_motif: 1.0 - motif,
                    motif,
                }
            }
            OutputActivation::Softmax => {
                let max = row[0].max(row[1]);
                let e0 = (row[0] - max).exp();
                let e1 = (row[1] - max).exp();
                ClassProbabilities {
                    non_motif: e0 / (e0 + e1),
                    motif: e1 / (e0 + e1),
                }
            }
        }
    }

    fn check_row(&self, features: &[f64]) -> Result<()> {
        let expected = self.layers[0].weights.nrows();
        if features.len() != expected {
            return Err(Error::Inconsistent(format!(
                "model expects {} features, got {}",
                expected,
                features.len()
            )));
        }
        Ok(())
    }
}

impl MotifScorer for MlpScorer {
    fn input_dimension(&self) -> Option<usize> {
        Some(self.layers[0].weights.nrows())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities> {
        self.check_row(features)?;
        let input = ArrayView1::from(features)
            .insert_axis(Axis(0))
            .to_owned();
        self.forward(input)
            .pop()
            .ok_or_else(|| Error::Inconsistent("empty model output".into()))
    }

    fn predict_batch(&self, rows: &[&[f64]]) -> Result<Vec<ClassProbabilities>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut input = Array2::zeros((rows.len(), self.layers[0].weights.nrows()));
        for (mut target, row) in input.axis_iter_mut(Axis(0)).zip(rows) {
            self.check_row(row)?;
            target.assign(&ArrayView1::from(*row));
        }
        Ok(self.forward(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_LOGISTIC: &str = r#"{
        "activation": "relu",
        "out_activation": "logistic",
        "coefs": [[[1.0, -1.0], [0.0, 2.0]], [[1.0], [0.5]]],
        "intercepts": [[0.0, 0.0], [-1.0]]
    }"#;

    #[test]
    fn test_logistic_forward_pass() {
        let mlp = MlpScorer::from_json(TINY_LOGISTIC).unwrap();
        // hidden = relu([1, -1 + 2]) = [1, 1]; out = 1 + 0.5 - 1 = 0.5
        let p = mlp.predict_proba(&[1.0, 1.0]).unwrap();
        assert!((p.motif - logistic(0.5)).abs() < 1e-12);
        assert!((p.non_motif + p.motif - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_matches_single_rows() {
        let mlp = MlpScorer::from_json(TINY_LOGISTIC).unwrap();
        let rows: Vec<&[f64]> = vec![&[1.0, 1.0][..], &[-3.0, 0.5][..], &[0.0, 0.0][..]];
        let batch = mlp.predict_batch(&rows).unwrap();
        for (row, p) in rows.iter().zip(batch) {
            let single = mlp.predict_proba(row).unwrap();
            assert!((single.motif - p.motif).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_output() {
        let json = r#"{
            "activation": "identity",
            "out_activation": "softmax",
            "coefs": [[[0.0, 1.0]]],
            "intercepts": [[0.0, 0.0]]
        }"#;
        let mlp = MlpScorer::from_json(json).unwrap();
        let p = mlp.predict_proba(&[0.0]).unwrap();
        assert!((p.motif - 0.5).abs() < 1e-12);
        let p = mlp.predict_proba(&[50.0]).unwrap();
        assert!(p.motif > 0.999);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mlp = MlpScorer::from_json(TINY_LOGISTIC).unwrap();
        assert_eq!(mlp.input_dimension(), Some(2));
        assert!(mlp.predict_proba(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_malformed_models_are_parse_errors() {
        let ragged = r#"{"coefs": [[[1.0, 2.0], [1.0]]], "intercepts": [[0.0, 0.0]]}"#;
        assert!(matches!(MlpScorer::from_json(ragged), Err(Error::Parse(_))));
        let chained = r#"{"coefs": [[[1.0, 2.0]], [[1.0]]], "intercepts": [[0.0, 0.0], [0.0]]}"#;
        assert!(matches!(MlpScorer::from_json(chained), Err(Error::Parse(_))));
        let wrong_out = r#"{"coefs": [[[1.0, 2.0]]], "intercepts": [[0.0, 0.0]]}"#;
        assert!(matches!(MlpScorer::from_json(wrong_out), Err(Error::Parse(_))));
        assert!(matches!(MlpScorer::from_json("not json"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_model_file_is_not_found() {
        let err = MlpScorer::from_path(Path::new("/no/such/model.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_model_file_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MLP_NBS_MHD.json");
        std::fs::write(&path, TINY_LOGISTIC).unwrap();
        assert_eq!(MlpScorer::from_path(&path).unwrap().input_dimension(), Some(2));

        std::fs::write(&path, "not json").unwrap();
        match MlpScorer::from_path(&path) {
            Err(Error::Parse(msg)) => assert!(msg.contains("MLP_NBS_MHD.json")),
            other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
        }
    }
}
