//! Flat inner-product index over L2-normalized vectors
//!
//! Brute-force scan, exact results. Vectors are normalized on insertion and
//! the query is normalized at search time, so inner product equals cosine
//! similarity. For one document's worth of chunks a flat scan beats any
//! approximate structure on both simplicity and recall.

use crate::error::{Error, Result};

/// Flat inner-product nearest-neighbor index
#[derive(Debug, Default)]
pub struct FlatIpIndex {
    /// Expected dimensionality, fixed by the first insertion
    dimensions: Option<usize>,
    /// Normalized vectors in insertion order
    vectors: Vec<Vec<f32>>,
}

impl FlatIpIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality of the indexed vectors, once known
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Insert a vector, returning its ordinal
    ///
    /// The stored copy is L2-normalized. All vectors after the first must
    /// share its dimensionality.
    pub fn insert(&mut self, vector: &[f32]) -> Result<usize> {
        if vector.is_empty() {
            return Err(Error::Embedding("empty embedding vector".to_string()));
        }

        match self.dimensions {
            Some(expected) if expected != vector.len() => {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            None => self.dimensions = Some(vector.len()),
            _ => {}
        }

        self.vectors.push(normalize(vector));
        Ok(self.vectors.len() - 1)
    }

    /// Return up to `k` `(ordinal, score)` pairs sorted by descending cosine
    /// similarity to the query.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if let Some(expected) = self.dimensions {
            if expected != query.len() {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let query = normalize(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(v, &query)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// L2-normalize a vector. Zero vectors are returned as-is rather than
/// dividing by zero.
fn normalize(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter().map(|x| x / norm).collect()
    } else {
        vector.to_vec()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
