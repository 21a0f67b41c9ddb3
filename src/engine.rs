use crate::error::{AnalogyError, Result};
use crate::table::{VectorTable, normalize};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Default number of neighbours the front ends ask for.
pub const DEFAULT_TOP_N: usize = 5;

// Norms below this are treated as zero vectors.
const EPS: f64 = 1e-12;

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub word: String,
    pub similarity: f64,
}

/// Exact nearest-neighbour search over a fixed vocabulary.
///
/// All vectors live in one flattened buffer, together with their
/// precomputed L2 norms, so a query is a single linear scan. The engine is
/// immutable after `build`, so it can be shared across threads freely.
pub struct AnalogyEngine {
    words: Vec<String>,               // vocabulary - index to word map
    word_map: HashMap<String, usize>, // word to index map
    vectors: Vec<f64>,                // A single, flattened Vec of all vector data
    norms: Vec<f64>,                  // L2 norm of each vector
    dims: usize,                      // The dimension of each vector
}

impl AnalogyEngine {
    /// Take ownership of a table and validate it.
    pub fn build(table: VectorTable) -> Result<AnalogyEngine> {
        if table.is_empty() {
            return Err(AnalogyError::EmptyTable);
        }
        let duplicates = table.duplicates();
        let entries = table.into_entries();

        let dims = entries[0].vector.len();
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dims) {
            return Err(AnalogyError::InconsistentDimension {
                word: bad.word.clone(),
                expected: dims,
                found: bad.vector.len(),
            });
        }
        if dims == 0 {
            return Err(AnalogyError::ZeroDimension);
        }

        let mut words = Vec::with_capacity(entries.len());
        let mut word_map = HashMap::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len() * dims);
        let mut norms = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry_norm = norm(&entry.vector);
            // squares of huge finite components overflow the norm
            if !entry_norm.is_finite() || entry.vector.iter().any(|v| !v.is_finite()) {
                return Err(AnalogyError::NonFiniteValue { word: entry.word });
            }
            norms.push(entry_norm);
            vectors.extend_from_slice(&entry.vector);
            word_map.insert(entry.word.clone(), words.len());
            words.push(entry.word);
        }

        info!(words = words.len(), dims, duplicates, "analogy engine ready");

        Ok(AnalogyEngine {
            words,
            word_map,
            vectors,
            norms,
            dims,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_map.contains_key(&normalize(word))
    }

    pub fn word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    /// Vocabulary in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn get_index(&self, word: &str) -> Option<usize> {
        self.word_map.get(&normalize(word)).copied()
    }

    fn lookup(&self, word: &str) -> Result<usize> {
        let word = normalize(word);
        match self.word_map.get(&word) {
            Some(&idx) => Ok(idx),
            None => Err(AnalogyError::WordNotFound(word)),
        }
    }

    pub(crate) fn get_vector(&self, idx: usize) -> &[f64] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    pub fn vector_of(&self, word: &str) -> Result<&[f64]> {
        Ok(self.get_vector(self.lookup(word)?))
    }

    /// "a is to b as c is to ?" - ranks the vocabulary against
    /// `b - a + c`, leaving out the three input words.
    ///
    /// Missing words are reported in the order a, b, c.
    pub fn resolve(&self, a: &str, b: &str, c: &str, top_n: usize) -> Result<Vec<Neighbor>> {
        if top_n == 0 {
            return Err(AnalogyError::InvalidTopN);
        }
        let a_idx = self.lookup(a)?;
        let b_idx = self.lookup(b)?;
        let c_idx = self.lookup(c)?;

        let va = self.get_vector(a_idx);
        let vb = self.get_vector(b_idx);
        let vc = self.get_vector(c_idx);

        let target: Vec<f64> = (0..self.dims).map(|i| vb[i] - va[i] + vc[i]).collect();

        Ok(self.rank(&target, &[a_idx, b_idx, c_idx], top_n))
    }

    /// Rank the vocabulary against `sum(positive) - sum(negative)`.
    /// Missing words are reported positives first, then negatives.
    pub fn most_similar(
        &self,
        positive: &[&str],
        negative: &[&str],
        top_n: usize,
    ) -> Result<Vec<Neighbor>> {
        if positive.is_empty() && negative.is_empty() {
            return Err(AnalogyError::EmptyQuery);
        }
        if top_n == 0 {
            return Err(AnalogyError::InvalidTopN);
        }
        let pos = positive
            .iter()
            .map(|w| self.lookup(w))
            .collect::<Result<Vec<usize>>>()?;
        let neg = negative
            .iter()
            .map(|w| self.lookup(w))
            .collect::<Result<Vec<usize>>>()?;

        let mut target = vec![0.0; self.dims];
        for &idx in &pos {
            for (t, v) in target.iter_mut().zip(self.get_vector(idx)) {
                *t += v;
            }
        }
        for &idx in &neg {
            for (t, v) in target.iter_mut().zip(self.get_vector(idx)) {
                *t -= v;
            }
        }

        let mut exclude = pos;
        exclude.extend(neg);
        Ok(self.rank(&target, &exclude, top_n))
    }

    /// Nearest words to the sum of `words`.
    pub fn nearest(&self, words: &[&str], top_n: usize) -> Result<Vec<Neighbor>> {
        self.most_similar(words, &[], top_n)
    }

    /// Cosine similarity between two vocabulary words.
    pub fn similarity(&self, w1: &str, w2: &str) -> Result<f64> {
        let i = self.lookup(w1)?;
        let j = self.lookup(w2)?;
        Ok(cosine(
            self.get_vector(i),
            self.norms[i],
            self.get_vector(j),
            self.norms[j],
        ))
    }

    fn rank(&self, target: &[f64], exclude: &[usize], n: usize) -> Vec<Neighbor> {
        let start = Instant::now();
        let target_norm = norm(target);

        // Parallel search over contiguous memory
        let mut scores: Vec<(usize, f64)> = self
            .vectors
            .par_chunks_exact(self.dims)
            .zip(self.norms.par_iter())
            .enumerate()
            .filter(|(i, _)| !exclude.contains(i))
            .map(|(i, (v_slice, &v_norm))| (i, cosine(v_slice, v_norm, target, target_norm)))
            .collect();

        // Partial selection first; the index tie-break makes the order total,
        // so this agrees with a stable sort over the whole vocabulary.
        if n < scores.len() {
            scores.select_nth_unstable_by(n, by_rank);
            scores.truncate(n);
        }
        scores.sort_unstable_by(by_rank);

        debug!(elapsed = ?start.elapsed(), returned = scores.len(), "ranked");

        scores
            .into_iter()
            .map(|(i, similarity)| Neighbor {
                word: self.words[i].clone(),
                similarity,
            })
            .collect()
    }
}

// Descending by score, then ascending by vocabulary position.
fn by_rank(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity with precomputed norms; 0 when either side is a zero
/// vector or the arithmetic leaves the finite range.
fn cosine(x: &[f64], x_norm: f64, y: &[f64], y_norm: f64) -> f64 {
    if x_norm < EPS || y_norm < EPS {
        return 0.0;
    }
    let dot = x.iter().zip(y).map(|(a, b)| a * b).sum::<f64>();
    let sim = dot / (x_norm * y_norm);
    if sim.is_finite() { sim.clamp(-1.0, 1.0) } else { 0.0 }
}
