mod di;
mod mis;

pub use self::di::*;
pub use self::mis::*;
use crate::WhiteNoise;

/// Streaming weighted-sample holder.
///
/// - `w_sum` is the running sum of candidate weights,
/// - `m` is the confidence (number of candidates represented),
/// - `w` is the unbiased contribution weight, computed by
///   [`Self::normalize()`].
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct Reservoir<T> {
    pub sample: T,
    pub w_sum: f32,
    pub m: f32,
    pub w: f32,
}

impl<T> Reservoir<T>
where
    T: Clone + Copy,
{
    /// Returns whether this reservoir represents no candidates at all; an
    /// empty reservoir is the identity of [`Self::merge()`].
    pub fn is_empty(&self) -> bool {
        self.m <= 0.0
    }

    /// Folds a single candidate into this reservoir.
    ///
    /// The candidate becomes the chosen sample with probability
    /// `weight / w_sum` (after adding its weight); non-finite or negative
    /// weights are treated as zero.
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: T,
        weight: f32,
        m: f32,
        max_m: f32,
    ) -> bool {
        let weight = if weight.is_finite() {
            weight.max(0.0)
        } else {
            0.0
        };

        self.w_sum += weight;
        self.m = (self.m + m).min(max_m);

        let is_chosen = if weight > 0.0 {
            wnoise.sample() * self.w_sum < weight
        } else {
            self.w_sum <= 0.0
        };

        if is_chosen {
            self.sample = sample;
        }

        is_chosen
    }

    /// Combines another reservoir into this one, using its stored weight.
    pub fn merge(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        max_m: f32,
    ) -> bool {
        if rhs.is_empty() {
            return false;
        }

        self.update(wnoise, rhs.sample, rhs.w_sum, rhs.m, max_m)
    }

    /// Combines another reservoir into this one, re-weighting its sample by
    /// this reservoir's target function; `pdf` is the target function
    /// evaluated for `rhs.sample`.
    pub fn merge_resampled(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        pdf: f32,
        max_m: f32,
    ) -> bool {
        if rhs.is_empty() {
            return false;
        }

        self.update(wnoise, rhs.sample, pdf * rhs.w * rhs.m, rhs.m, max_m)
    }

    /// Computes the contribution weight `w = w_sum / (m_eff * pdf)`, where
    /// `pdf` is the target function of the chosen sample.
    pub fn normalize(&mut self, pdf: f32, m_eff: f32) {
        let t = m_eff * pdf;

        self.w = if t > 0.0 { self.w_sum / t } else { 0.0 };
    }

    pub fn clamp_m(&mut self, max: f32) {
        self.m = self.m.min(max);
    }
}
