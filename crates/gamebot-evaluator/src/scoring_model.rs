//! Fully-connected scoring network.
//!
//! A [`ScoringModel`] is an ordered list of dense layers. Every layer computes
//! `y = W·x + b`; all layers but the last apply a ReLU, the last one is a single linear
//! regression output.
//!
//! # Parameter Layout
//!
//! [`encode`](ScoringModel::encode) flattens the model layer by layer, in declaration
//! order: first the weight matrix in row-major order (one row per output unit), then the
//! bias vector. [`decode`](ScoringModel::decode) reads the exact same layout back, so
//! `decode(encode(m))` reproduces `m`.
//!
//! ```text
//! shape [2, 2, 1]:
//!   W₁[0][0] W₁[0][1] W₁[1][0] W₁[1][1] b₁[0] b₁[1] W₂[0][0] W₂[0][1] b₂[0]
//! ```

use std::iter;

use rand::Rng;

use crate::state_evaluator::StateEvaluator;

/// Invalid model shape or layer matrices.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("model shape needs at least an input and an output width, got {len} widths")]
    TooFewLayers { len: usize },
    #[display("width #{index} of the model shape is zero")]
    ZeroWidth { index: usize },
    #[display("model must end with a single output, got {width}")]
    OutputWidth { width: usize },
    #[display("layer #{index} must have {rows}x{cols} weights and {rows} biases")]
    LayerMismatch {
        index: usize,
        rows: usize,
        cols: usize,
    },
}

/// Parameter vector whose length does not match the model.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} parameters, got {actual}")]
pub struct ParameterLengthError {
    pub expected: usize,
    pub actual: usize,
}

/// Input vector whose length does not match the first layer.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected an input of width {expected}, got {actual}")]
pub struct InputLengthError {
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    inputs: usize,
    /// `outputs × inputs`, row-major.
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn zeros(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs,
            weights: vec![0.0; inputs * outputs],
            biases: vec![0.0; outputs],
        }
    }

    fn outputs(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        iter::zip(self.weights.chunks_exact(self.inputs), &self.biases)
            .map(|(row, bias)| iter::zip(row, input).map(|(w, x)| w * x).sum::<f32>() + bias)
            .collect()
    }
}

/// Small multi-layer perceptron mapping a feature vector to a single score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    layers: Vec<Layer>,
}

impl ScoringModel {
    /// Creates a model of the given shape with every parameter set to zero.
    ///
    /// `shape` lists the layer widths, `[inputs, hidden..., 1]`.
    pub fn zeros(shape: &[usize]) -> Result<Self, ShapeError> {
        validate_shape(shape)?;
        let layers = shape
            .windows(2)
            .map(|w| Layer::zeros(w[0], w[1]))
            .collect();
        Ok(Self { layers })
    }

    /// Creates a model of the given shape with every weight and bias drawn from
    /// Uniform(-1, 1).
    pub fn random<R>(shape: &[usize], rng: &mut R) -> Result<Self, ShapeError>
    where
        R: Rng + ?Sized,
    {
        let mut model = Self::zeros(shape)?;
        for value in model.scalars_mut() {
            *value = rng.random_range(-1.0..=1.0);
        }
        Ok(model)
    }

    /// Builds a model from explicit `(weights, biases)` pairs.
    ///
    /// Each weight matrix is given as rows, one row per output unit. Consecutive layers
    /// must chain (`cols` of a layer equals `rows` of the previous one) and the last layer
    /// must have a single row.
    pub fn from_layers<I>(layers: I) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = (Vec<Vec<f32>>, Vec<f32>)>,
    {
        let mut built: Vec<Layer> = vec![];
        for (index, (rows, biases)) in layers.into_iter().enumerate() {
            let cols = rows.first().map_or(0, Vec::len);
            let expected_cols = built.last().map_or(cols, Layer::outputs);
            let mismatch = ShapeError::LayerMismatch {
                index,
                rows: biases.len(),
                cols: expected_cols,
            };
            if rows.is_empty() || cols == 0 || cols != expected_cols {
                return Err(mismatch);
            }
            if rows.len() != biases.len() || rows.iter().any(|row| row.len() != cols) {
                return Err(mismatch);
            }
            built.push(Layer {
                inputs: cols,
                weights: rows.into_iter().flatten().collect(),
                biases,
            });
        }
        match built.last() {
            None => Err(ShapeError::TooFewLayers { len: built.len() }),
            Some(last) if last.outputs() != 1 => Err(ShapeError::OutputWidth {
                width: last.outputs(),
            }),
            Some(_) => Ok(Self { layers: built }),
        }
    }

    /// Layer widths, `[inputs, hidden..., 1]`.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        iter::once(self.input_width())
            .chain(self.layers.iter().map(Layer::outputs))
            .collect()
    }

    #[must_use]
    pub fn input_width(&self) -> usize {
        self.layers[0].inputs
    }

    /// Total number of weights and biases.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Flattens every weight and bias into a single vector.
    #[must_use]
    pub fn encode(&self) -> Vec<f32> {
        self.scalars().copied().collect()
    }

    /// Overwrites every weight and bias from a vector laid out like [`encode`](Self::encode).
    ///
    /// Vectors of the wrong length are rejected and leave the model untouched.
    pub fn decode(&mut self, parameters: &[f32]) -> Result<(), ParameterLengthError> {
        let expected = self.parameter_count();
        if parameters.len() != expected {
            return Err(ParameterLengthError {
                expected,
                actual: parameters.len(),
            });
        }
        for (value, parameter) in iter::zip(self.scalars_mut(), parameters) {
            *value = *parameter;
        }
        Ok(())
    }

    /// Runs the forward pass.
    pub fn evaluate(&self, input: &[f32]) -> Result<f32, InputLengthError> {
        let expected = self.input_width();
        if input.len() != expected {
            return Err(InputLengthError {
                expected,
                actual: input.len(),
            });
        }
        Ok(self.forward(input))
    }

    fn forward(&self, input: &[f32]) -> f32 {
        let last = self.layers.len() - 1;
        let mut activations = input.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i < last {
                for value in &mut activations {
                    *value = value.max(0.0);
                }
            }
        }
        activations[0]
    }

    fn scalars(&self) -> impl Iterator<Item = &f32> {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(&l.biases))
    }

    fn scalars_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.weights.iter_mut().chain(l.biases.iter_mut()))
    }
}

impl StateEvaluator for ScoringModel {
    fn input_width(&self) -> usize {
        ScoringModel::input_width(self)
    }

    #[inline]
    fn evaluate_state(&self, features: &[f32]) -> f32 {
        assert_eq!(features.len(), ScoringModel::input_width(self));
        self.forward(features)
    }
}

fn validate_shape(shape: &[usize]) -> Result<(), ShapeError> {
    if shape.len() < 2 {
        return Err(ShapeError::TooFewLayers { len: shape.len() });
    }
    if let Some(index) = shape.iter().position(|w| *w == 0) {
        return Err(ShapeError::ZeroWidth { index });
    }
    match shape.last() {
        Some(&width) if width != 1 => Err(ShapeError::OutputWidth { width }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn reference_model() -> ScoringModel {
        ScoringModel::from_layers([
            (vec![vec![5.0, 2.0], vec![-0.2, -4.3]], vec![0.9, 1.0]),
            (vec![vec![0.46, 0.44]], vec![-0.3]),
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_pass() {
        let model = reference_model();
        assert!((model.evaluate(&[1.0, 1.0]).unwrap() - 3.334).abs() < 1e-4);
        assert!((model.evaluate(&[-0.45, 0.79]).unwrap() - -0.194_2).abs() < 1e-4);
    }

    #[test]
    fn test_input_width_is_checked() {
        let model = reference_model();
        assert_eq!(
            model.evaluate(&[1.0, 1.0, 1.0]),
            Err(InputLengthError {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_parameter_count() {
        let model = ScoringModel::zeros(&[10, 10, 10, 1]).unwrap();
        assert_eq!(model.parameter_count(), 231);
        assert_eq!(model.encode().len(), 231);
        assert_eq!(model.shape(), vec![10, 10, 10, 1]);
    }

    #[test]
    fn test_encode_layout() {
        let model = reference_model();
        assert_eq!(
            model.encode(),
            vec![5.0, 2.0, -0.2, -4.3, 0.9, 1.0, 0.46, 0.44, -0.3]
        );
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut rng = Pcg32::seed_from_u64(7);
        let model = ScoringModel::random(&[43, 5, 1], &mut rng).unwrap();
        let encoded = model.encode();
        assert!(encoded.iter().all(|v| (-1.0..=1.0).contains(v)));

        let mut decoded = ScoringModel::zeros(&[43, 5, 1]).unwrap();
        decoded.decode(&encoded).unwrap();
        assert_eq!(decoded, model);

        // a second cycle changes nothing
        decoded.decode(&decoded.encode()).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let mut model = reference_model();
        let before = model.clone();
        assert_eq!(
            model.decode(&[0.0; 8]),
            Err(ParameterLengthError {
                expected: 9,
                actual: 8
            })
        );
        assert!(model.decode(&[0.0; 10]).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(
            ScoringModel::zeros(&[10]),
            Err(ShapeError::TooFewLayers { len: 1 })
        );
        assert_eq!(
            ScoringModel::zeros(&[10, 0, 1]),
            Err(ShapeError::ZeroWidth { index: 1 })
        );
        assert_eq!(
            ScoringModel::zeros(&[10, 5, 2]),
            Err(ShapeError::OutputWidth { width: 2 })
        );
    }

    #[test]
    fn test_from_layers_rejects_mismatched_matrices() {
        // second layer expects 2 inputs
        let result = ScoringModel::from_layers([
            (vec![vec![1.0, 1.0], vec![1.0, 1.0]], vec![0.0, 0.0]),
            (vec![vec![1.0, 1.0, 1.0]], vec![0.0]),
        ]);
        assert!(matches!(
            result,
            Err(ShapeError::LayerMismatch { index: 1, .. })
        ));

        // ragged rows
        let result =
            ScoringModel::from_layers([(vec![vec![1.0, 1.0], vec![1.0]], vec![0.0, 0.0])]);
        assert!(matches!(
            result,
            Err(ShapeError::LayerMismatch { index: 0, .. })
        ));

        assert_eq!(
            ScoringModel::from_layers(Vec::new()),
            Err(ShapeError::TooFewLayers { len: 0 })
        );
    }
}
