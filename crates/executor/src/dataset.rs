//! Seeded synthetic vectors.
//!
//! Every batch is generated from its own seed, so a batch is reproducible
//! without generating the ones before it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stream offset separating queries from training vectors.
const QUERY_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// A synthetic dataset of unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dataset {
    dim: usize,
    size: usize,
    num_queries: usize,
    seed: u64,
}

impl Dataset {
    /// Describe a dataset. Nothing is generated until asked for.
    pub fn new(dim: usize, size: usize, num_queries: usize, seed: u64) -> Self {
        Self {
            dim,
            size,
            num_queries,
            seed,
        }
    }

    /// Vector dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of vectors
    pub fn size(&self) -> usize {
        self.size
    }

    /// The vectors in id order, `batch_size` at a time.
    pub fn batches(&self, batch_size: usize) -> impl Iterator<Item = Batch> + '_ {
        let batch_size = batch_size.max(1);
        (0..self.size)
            .step_by(batch_size)
            .enumerate()
            .map(move |(index, start)| {
                let end = (start + batch_size).min(self.size);
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));
                Batch {
                    ids: (start as i64..end as i64).collect(),
                    embeddings: (start..end).map(|_| unit_vector(&mut rng, self.dim)).collect(),
                }
            })
    }

    /// The query set.
    pub fn queries(&self) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ QUERY_STREAM);
        (0..self.num_queries)
            .map(|_| unit_vector(&mut rng, self.dim))
            .collect()
    }
}

/// One insert call worth of vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Point ids
    pub ids: Vec<i64>,
    /// Vectors, parallel to `ids`
    pub embeddings: Vec<Vec<f32>>,
}

fn unit_vector(rng: &mut StdRng, dim: usize) -> Vec<f32> {
    let mut v: Vec<f32> = (0..dim).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}
