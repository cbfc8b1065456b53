use crate::{Prediction, Predictor};
use intent_common::{ClassLabel, Error, Result, Vocabulary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const ARTIFACT_FORMAT: &str = "linear-bow";
pub const ARTIFACT_VERSION: u32 = 1;

/// On-disk layout of a linear bag-of-n-grams classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub format: String,
    pub version: u32,
    pub labels: Vec<String>,
    /// Per-label intercept, missing labels default to zero
    #[serde(default)]
    pub bias: HashMap<String, f32>,
    /// n-gram -> label -> weight
    #[serde(default)]
    pub features: HashMap<String, HashMap<String, f32>>,
}

/// Compiled linear classifier.
///
/// Scores are the sum of the weights of every unigram and bigram in the
/// input plus the label bias, normalized with a softmax.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    labels: Vec<ClassLabel>,
    bias: Vec<f32>,
    features: HashMap<String, Vec<(usize, f32)>>,
}

impl LinearClassifier {
    /// Compile an artifact, checking it against the vocabulary it will serve
    pub fn from_artifact(artifact: LinearArtifact, vocabulary: Vocabulary) -> Result<Self> {
        if artifact.format != ARTIFACT_FORMAT {
            return Err(incompatible(format!(
                "unsupported artifact format '{}', expected '{}'",
                artifact.format, ARTIFACT_FORMAT
            )));
        }
        if artifact.version != ARTIFACT_VERSION {
            return Err(incompatible(format!(
                "unsupported artifact version {}, expected {}",
                artifact.version, ARTIFACT_VERSION
            )));
        }
        if artifact.labels.is_empty() {
            return Err(incompatible("artifact declares no labels".to_string()));
        }

        let mut labels = Vec::with_capacity(artifact.labels.len());
        let mut index = HashMap::new();
        for name in &artifact.labels {
            let label = ClassLabel::from_str(name)
                .map_err(|_| incompatible(format!("unknown label '{}'", name)))?;
            if !vocabulary.contains(label) {
                return Err(incompatible(format!(
                    "label '{}' is not part of the {:?} vocabulary",
                    name, vocabulary
                )));
            }
            if index.insert(name.as_str(), labels.len()).is_some() {
                return Err(incompatible(format!("duplicate label '{}'", name)));
            }
            labels.push(label);
        }

        let mut bias = vec![0.0; labels.len()];
        for (name, value) in &artifact.bias {
            let idx = lookup(&index, name)?;
            bias[idx] = finite(*value, name)?;
        }

        let mut features = HashMap::with_capacity(artifact.features.len());
        for (ngram, weights) in artifact.features {
            let mut row = Vec::with_capacity(weights.len());
            for (name, weight) in &weights {
                row.push((lookup(&index, name)?, finite(*weight, &ngram)?));
            }
            row.sort_by_key(|(idx, _)| *idx);
            features.insert(ngram.to_lowercase(), row);
        }

        Ok(Self { labels, bias, features })
    }

    /// Raw per-label scores before normalization
    fn logits(&self, text: &str) -> Vec<f32> {
        let mut logits = self.bias.clone();
        for ngram in ngrams(&tokenize(text)) {
            if let Some(row) = self.features.get(&ngram) {
                for (idx, weight) in row {
                    logits[*idx] += weight;
                }
            }
        }
        logits
    }
}

impl Predictor for LinearClassifier {
    fn predict(&self, text: &str) -> Result<Prediction> {
        let probabilities = softmax(&self.logits(text));

        // First label wins ties
        let mut best = 0;
        for (idx, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = idx;
            }
        }

        Ok(Prediction {
            label: self.labels[best],
            confidence: probabilities[best],
            scores: self.labels.iter().copied().zip(probabilities).collect(),
        })
    }

    fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }
}

/// Lowercased alphanumeric runs
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Unigrams followed by space-joined bigrams
pub fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut grams = tokens.to_vec();
    grams.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    grams
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn lookup(index: &HashMap<&str, usize>, name: &str) -> Result<usize> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| incompatible(format!("weight refers to undeclared label '{}'", name)))
}

fn finite(value: f32, context: &str) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(incompatible(format!("non-finite weight for '{}'", context)))
    }
}

fn incompatible(reason: String) -> Error {
    Error::ModelLoadFailed(format!("incompatible artifact: {}", reason))
}
