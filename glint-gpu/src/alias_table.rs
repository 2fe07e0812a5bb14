use bytemuck::{Pod, Zeroable};

use crate::WhiteNoise;

/// Single bucket of an alias table (Vose's method).
///
/// A bucket is picked uniformly; then either the bucket's own index is
/// returned (with probability `threshold`) or its `alias`.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable, Debug)]
pub struct AliasEntry {
    pub threshold: f32,
    pub alias: u32,

    /// Original (unnormalized) weight of this bucket's own index.
    pub weight: f32,
}

/// Read-only view over an alias table, used to draw indices in O(1).
#[derive(Clone, Copy, Debug)]
pub struct AliasTableView<'a> {
    entries: &'a [AliasEntry],
    weight_sum: f32,
}

impl<'a> AliasTableView<'a> {
    pub fn new(entries: &'a [AliasEntry], weight_sum: f32) -> Self {
        Self {
            entries,
            weight_sum,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the index selected by bucket `bucket` and uniform sample
    /// `u ∈ <0.0, 1.0)`.
    pub fn sample(&self, bucket: usize, u: f32) -> usize {
        let entry = self.entries[bucket];

        if u < entry.threshold {
            bucket
        } else {
            entry.alias as usize
        }
    }

    /// Draws an index and returns it together with its probability.
    pub fn sample_noise(&self, wnoise: &mut WhiteNoise) -> (usize, f32) {
        let bucket = wnoise.sample_index(self.entries.len());
        let idx = self.sample(bucket, wnoise.sample());

        (idx, self.pdf(idx))
    }

    /// Returns the probability of drawing index `idx`.
    pub fn pdf(&self, idx: usize) -> f32 {
        if self.weight_sum > 0.0 {
            self.entries[idx].weight / self.weight_sum
        } else {
            0.0
        }
    }
}
