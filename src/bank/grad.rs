//! Closed-form gradients of the kernel bank w.r.t. the raw parameters.
//!
//! Training needs `∂bank/∂low_hz` and `∂bank/∂band_hz`. These are exact
//! partial derivatives of the synthesis formula, not finite differences, so
//! there is no step size to tune and no truncation error.
//!
//! Derivation, per pair, with `u` the unnormalized half-kernel sample and
//! `D = 2·(high − low)` the normalization denominator, `g = u / D`:
//!
//! ```text
//! ∂g/∂low  = (∂u/∂low  + 2g) / D        (∂D/∂low  = −2)
//! ∂g/∂high = (∂u/∂high − 2g) / D        (∂D/∂high = +2)
//!
//! cos:  ∂u/∂low = −2·cos(low·n)·w       ∂u/∂high = 2·cos(high·n)·w
//! sin:  ∂u/∂low = −2·sin(low·n)·w       ∂u/∂high = 2·sin(high·n)·w
//! ```
//!
//! Chained through `low = min_low + |L|` and
//! `high = clamp(low + min_band + |B|, min_low, nyquist)`:
//! `∂low/∂L = sign(L)`, and the clamp contributes a factor of 1 strictly
//! inside its range, 0 once saturated. `sign(0) = 0`, so the only
//! non-differentiable points are the measure-zero `L = 0` / `B = 0` kinks
//! and the clamp boundary itself.

use ndarray::{s, Array3, ArrayViewMut1};

use super::{FilterType, SincFilterbank};

/// A generated bank together with its parameter partials.
///
/// All three arrays have shape `[n_filters, 1, kernel_size]`. Each kernel
/// depends only on its own pair's parameters, so
/// `d_low_hz[[f, 0, k]] = ∂filters[[f, 0, k]] / ∂low_hz[f % n_pairs]`
/// (and likewise for `d_band_hz`); the partials w.r.t. every other pair are
/// identically zero and are not materialized.
#[derive(Debug, Clone)]
pub struct BankGrad {
    /// The bank, identical to [`SincFilterbank::filters_f64`].
    pub filters: Array3<f64>,
    /// Partials w.r.t. the raw `low_hz` parameter of the kernel's own pair.
    pub d_low_hz: Array3<f64>,
    /// Partials w.r.t. the raw `band_hz` parameter of the kernel's own pair.
    pub d_band_hz: Array3<f64>,
}

/// `sign(x)` with `sign(0) = 0` (subgradient convention at the |·| kink).
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl SincFilterbank {
    /// Generate the bank and its partials w.r.t. the raw parameters.
    ///
    /// The `filters` field matches [`filters_f64`](Self::filters_f64)
    /// exactly; a caller backpropagating a loss `ℓ` accumulates
    /// `∂ℓ/∂low_hz[p] = Σ_{f,k} ∂ℓ/∂filters[[f,0,k]] · d_low_hz[[f,0,k]]`
    /// over the two kernels `f ∈ {p, p + n_pairs}` of the pair.
    pub fn filters_with_grad(&self) -> BankGrad {
        let n_pairs = self.cfg.n_pairs();
        let shape = (self.cfg.n_filters, 1, self.cfg.kernel_size);
        let mut filters = Array3::zeros(shape);
        let mut d_low = Array3::zeros(shape);
        let mut d_band = Array3::zeros(shape);

        let nyq = self.cfg.nyquist();
        for i in 0..n_pairs {
            let s_l = sign(self.low_hz[i]);
            let s_b = sign(self.band_hz[i]);

            let low = self.cfg.min_low_hz + self.low_hz[i].abs();
            let pre = low + self.cfg.min_band_hz + self.band_hz[i].abs();
            // `inside` is the clamp's derivative: 0 once saturated.
            let (high, inside) = if pre <= self.cfg.min_low_hz {
                (self.cfg.min_low_hz, 0.0)
            } else if pre >= nyq {
                (nyq, 0.0)
            } else {
                (pre, 1.0)
            };
            let band = high - low;

            for (f, ty) in [(i, FilterType::Cos), (n_pairs + i, FilterType::Sin)] {
                self.fill_kernel_grad(
                    low,
                    high,
                    band,
                    ty,
                    (s_l, s_b, inside),
                    filters.slice_mut(s![f, 0, ..]),
                    d_low.slice_mut(s![f, 0, ..]),
                    d_band.slice_mut(s![f, 0, ..]),
                );
            }
        }

        BankGrad {
            filters,
            d_low_hz: d_low,
            d_band_hz: d_band,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_kernel_grad(
        &self,
        low: f64,
        high: f64,
        band: f64,
        ty: FilterType,
        (s_l, s_b, inside): (f64, f64, f64),
        mut kernel: ArrayViewMut1<f64>,
        mut d_low: ArrayViewMut1<f64>,
        mut d_band: ArrayViewMut1<f64>,
    ) {
        let c = self.cutoff;
        let d = 2.0 * band;

        for k in 0..c {
            let n = self.n[k];
            let w = self.window[k];
            let (u, du_dlow, du_dhigh) = match ty {
                FilterType::Cos => (
                    ((high * n).sin() - (low * n).sin()) / (n / 2.0) * w,
                    -2.0 * (low * n).cos() * w,
                    2.0 * (high * n).cos() * w,
                ),
                FilterType::Sin => (
                    ((low * n).cos() - (high * n).cos()) / (n / 2.0) * w,
                    -2.0 * (low * n).sin() * w,
                    2.0 * (high * n).sin() * w,
                ),
            };
            let g = u / d;
            let dg_dlow = (du_dlow + 2.0 * g) / d;
            let dg_dhigh = (du_dhigh - 2.0 * g) / d;

            // Chain through low(L) and high(L, B).
            let gl = s_l * (dg_dlow + inside * dg_dhigh);
            let gb = s_b * inside * dg_dhigh;

            let flip = match ty {
                FilterType::Cos => 1.0,
                FilterType::Sin => -1.0,
            };
            kernel[k] = g;
            kernel[2 * c - k] = flip * g;
            d_low[k] = gl;
            d_low[2 * c - k] = flip * gl;
            d_band[k] = gb;
            d_band[2 * c - k] = flip * gb;
        }

        // Centers are constant in the parameters: the cos-type center is
        // 2·band/D = 1 exactly, the sin-type center is 0.
        kernel[c] = match ty {
            FilterType::Cos => 2.0 * band / d,
            FilterType::Sin => 0.0,
        };
        d_low[c] = 0.0;
        d_band[c] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BankConfig;

    #[test]
    fn forward_values_match_filters() {
        let fb = SincFilterbank::new(BankConfig {
            n_filters: 16,
            kernel_size: 33,
            ..BankConfig::default()
        })
        .unwrap();
        let g = fb.filters_with_grad();
        let f = fb.filters_f64();
        for (a, b) in g.filters.iter().zip(f.iter()) {
            approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-15);
        }
    }

    #[test]
    fn center_samples_have_zero_gradient() {
        let fb = SincFilterbank::new(BankConfig {
            n_filters: 8,
            kernel_size: 21,
            ..BankConfig::default()
        })
        .unwrap();
        let g = fb.filters_with_grad();
        let c = fb.cutoff();
        for f in 0..8 {
            assert_eq!(g.d_low_hz[[f, 0, c]], 0.0);
            assert_eq!(g.d_band_hz[[f, 0, c]], 0.0);
        }
    }

    #[test]
    fn gradient_mirrors_like_the_kernel() {
        let fb = SincFilterbank::new(BankConfig {
            n_filters: 4,
            kernel_size: 25,
            ..BankConfig::default()
        })
        .unwrap();
        let g = fb.filters_with_grad();
        let c = fb.cutoff();
        for k in 0..c {
            // cos-type pair 0: symmetric partials.
            assert_eq!(g.d_low_hz[[0, 0, k]], g.d_low_hz[[0, 0, 2 * c - k]]);
            // sin-type pair 0: antisymmetric partials.
            assert_eq!(g.d_band_hz[[2, 0, k]], -g.d_band_hz[[2, 0, 2 * c - k]]);
        }
    }
}
