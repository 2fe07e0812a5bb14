use crate::gpu::{AliasEntry, AliasTableView};
use crate::{Error, Result};

/// Weighted discrete distribution that can be sampled in O(1), built using
/// Vose's alias method.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    weight_sum: f32,
}

impl AliasTable {
    /// Builds a table out of given weights.
    ///
    /// Fails if there are no weights, if any of them is negative or
    /// non-finite, or if they sum up to zero.
    pub fn new(weights: &[f32]) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::InvalidWeights {
                reason: "no weights given".into(),
            });
        }

        if let Some((idx, weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            return Err(Error::InvalidWeights {
                reason: format!("weight #{idx} is {weight}"),
            });
        }

        // Summing in f64 keeps tables over millions of small weights
        // accurate
        let weight_sum: f64 = weights.iter().map(|&w| w as f64).sum();

        if weight_sum <= 0.0 || !weight_sum.is_finite() {
            return Err(Error::InvalidWeights {
                reason: format!("weights sum up to {weight_sum}"),
            });
        }

        let len = weights.len();
        let scale = (len as f64) / weight_sum;

        let mut probs: Vec<f64> =
            weights.iter().map(|&w| (w as f64) * scale).collect();

        let mut entries: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(idx, &weight)| AliasEntry {
                threshold: 1.0,
                alias: idx as u32,
                weight,
            })
            .collect();

        let mut small = Vec::with_capacity(len);
        let mut large = Vec::with_capacity(len);

        for (idx, &prob) in probs.iter().enumerate() {
            if prob < 1.0 {
                small.push(idx);
            } else {
                large.push(idx);
            }
        }

        while let (Some(&small_idx), Some(&large_idx)) =
            (small.last(), large.last())
        {
            small.pop();

            entries[small_idx].threshold = probs[small_idx] as f32;
            entries[small_idx].alias = large_idx as u32;

            probs[large_idx] -= 1.0 - probs[small_idx];

            if probs[large_idx] < 1.0 {
                large.pop();
                small.push(large_idx);
            }
        }

        // Whatever remains is (up to rounding errors) exactly full, so those
        // buckets always return themselves - that's what entries have been
        // initialized with
        Ok(Self {
            entries,
            weight_sum: weight_sum as f32,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Returns the index selected by bucket `bucket` and uniform sample
    /// `u ∈ <0.0, 1.0)`.
    pub fn sample(&self, bucket: usize, u: f32) -> usize {
        self.view().sample(bucket, u)
    }

    /// Returns the probability of drawing index `idx`.
    pub fn pdf(&self, idx: usize) -> f32 {
        self.view().pdf(idx)
    }

    pub fn view(&self) -> AliasTableView<'_> {
        AliasTableView::new(&self.entries, self.weight_sum)
    }
}
