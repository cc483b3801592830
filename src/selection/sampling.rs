//! Per-step random vertex sampling.
//!
//! Each step selects afresh. When the host announces the step's candidate
//! vertices, `R` of them are drawn with a ChaCha generator seeded from the
//! policy seed and the step number. Without an announcement the first `R`
//! distinct vertices decided in the step are admitted; their ids are kept in
//! buffers reused from step to step.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct StepSampler {
    step: Option<u64>,
    /// Vertices drawn from announced candidates, if any were announced.
    drawn: Option<HashSet<String>>,
    /// Ids admitted so far in this step are `admitted[..admitted_len]`.
    admitted: Vec<String>,
    admitted_len: usize,
}

impl StepSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `per_step` vertices from `candidates` for `step`.
    pub fn announce(&mut self, step: u64, candidates: &[String], per_step: usize, seed: u64) {
        let mut unique: Vec<&String> = candidates.iter().collect();
        unique.sort();
        unique.dedup();

        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ step.rotate_left(32));
        let amount = per_step.min(unique.len());
        let drawn = index::sample(&mut rng, unique.len(), amount)
            .into_iter()
            .map(|i| unique[i].clone())
            .collect();

        self.step = Some(step);
        self.drawn = Some(drawn);
        self.admitted_len = 0;
    }

    /// Whether `vertex_id` is sampled in `step`.
    pub fn admit(&mut self, step: u64, vertex_id: &str, per_step: usize) -> bool {
        if self.step != Some(step) {
            self.step = Some(step);
            self.drawn = None;
            self.admitted_len = 0;
        }

        if let Some(drawn) = &self.drawn {
            return drawn.contains(vertex_id);
        }
        if self.admitted[..self.admitted_len]
            .iter()
            .any(|admitted| admitted == vertex_id)
        {
            return true;
        }
        if self.admitted_len >= per_step {
            return false;
        }

        match self.admitted.get_mut(self.admitted_len) {
            Some(slot) => {
                slot.clear();
                slot.push_str(vertex_id);
            }
            None => self.admitted.push(vertex_id.to_string()),
        }
        self.admitted_len += 1;
        true
    }
}
