//! Parameterized sinc filterbank.
//!
//! A bank of `n_filters` band-pass FIR kernels generated on the fly from two
//! learnable scalars per band (low cut-on and bandwidth), following the
//! SincNet construction of Ravanelli & Bengio (SLT 2018) extended with the
//! odd/sin-type filters of Pariente et al. (ICASSP 2020). Band placement is
//! initialized along the mel scale; every generated sample is a smooth
//! function of the raw parameters so the bank can sit inside a
//! gradient-trained front-end.
//!
//! - [`SincFilterbank::filters`]: current parameters → `[n_filters, 1,
//!   kernel_size]` convolution weights.
//! - [`grad`]: closed-form partials of the bank w.r.t. the raw parameters.

pub mod grad;

use std::f64::consts::PI;

use anyhow::{bail, Result};
use ndarray::{s, Array1, Array3, ArrayViewMut1};
use tracing::warn;

use crate::config::BankConfig;
use crate::mel::mel_grid;

/// Lower bound of the mel initialization grid (Hz).
const MEL_FLOOR_HZ: f64 = 30.0;

/// Even (cos-type) or odd (sin-type) member of an analytic filter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterType {
    Cos,
    Sin,
}

/// Effective band edges of every filter pair, after floors and Nyquist clamp.
#[derive(Debug, Clone)]
pub struct BandEdges {
    /// Low cut-on per pair, `min_low_hz + |low_hz|`. Always `>= min_low_hz`.
    pub low: Array1<f64>,
    /// High cut-off per pair, clamped into `[min_low_hz, sample_rate/2]`.
    pub high: Array1<f64>,
    /// `high - low`. May fall below `min_band_hz` when the Nyquist clamp
    /// pulled `high` down; that is accepted, not re-enforced.
    pub band: Array1<f64>,
}

/// A filterbank whose band edges are trainable parameters.
///
/// Construction fixes the configuration and two derived buffers (half of a
/// Hamming window, half of a scaled time index); the raw parameter vectors
/// `low_hz` / `band_hz` are the only mutable state and are meant to be
/// updated by an external optimizer between [`filters`](Self::filters) calls.
///
/// ```
/// use sincfb::{BankConfig, SincFilterbank};
///
/// let fb = SincFilterbank::new(BankConfig::default()).unwrap();
/// let bank = fb.filters();
/// assert_eq!(bank.shape(), &[512, 1, 17]);
/// ```
#[derive(Debug, Clone)]
pub struct SincFilterbank {
    cfg: BankConfig, // kernel_size already normalized to odd
    cutoff: usize,
    low_hz: Array1<f64>,
    band_hz: Array1<f64>,
    /// First `cutoff` samples of a symmetric Hamming window of length
    /// `kernel_size`.
    window: Array1<f64>,
    /// `2π·(k − cutoff) / sample_rate` for `k = 0..cutoff`, i.e. the scaled
    /// time index of the left half-kernel. Strictly negative.
    n: Array1<f64>,
}

impl SincFilterbank {
    /// Build a filterbank with mel-initialized band parameters.
    ///
    /// An even `kernel_size` is bumped to the next odd value (with a warning)
    /// so every kernel has a center sample.
    ///
    /// # Errors
    ///
    /// * `n_filters` is zero or odd — the bank is made of cos/sin pairs.
    /// * `kernel_size` ends up below 3 taps — a 1-tap kernel has no
    ///   half-kernel and the band-pass quotient is undefined.
    /// * `sample_rate / 2 - (min_low_hz + min_band_hz)` does not exceed the
    ///   30 Hz grid floor — no room to place the initial bands.
    pub fn new(cfg: BankConfig) -> Result<Self> {
        let mut cfg = cfg;

        if cfg.n_filters == 0 || cfg.n_filters % 2 != 0 {
            bail!(
                "n_filters must be positive and even (cos/sin pairs), got {}",
                cfg.n_filters
            );
        }
        if cfg.kernel_size % 2 == 0 {
            warn!(
                "received kernel_size={}, forcing kernel_size={} so filters are odd",
                cfg.kernel_size,
                cfg.kernel_size + 1
            );
            cfg.kernel_size += 1;
        }
        if cfg.kernel_size < 3 {
            bail!(
                "kernel_size={} leaves no half-kernel samples (need >= 3 taps)",
                cfg.kernel_size
            );
        }

        let cutoff = cfg.kernel_size / 2;

        // Mel-spaced initialization: n_pairs + 1 grid points, low edges from
        // all but the last, bandwidths from first differences.
        let high_hz = cfg.nyquist() - (cfg.min_low_hz + cfg.min_band_hz);
        if high_hz <= MEL_FLOOR_HZ {
            bail!(
                "sample_rate={} Hz leaves no room for mel initialization above {} Hz",
                cfg.sample_rate,
                MEL_FLOOR_HZ
            );
        }
        let hz = mel_grid(MEL_FLOOR_HZ, high_hz, cfg.n_pairs() + 1);
        let low_hz = Array1::from_iter(hz[..hz.len() - 1].iter().copied());
        let band_hz = Array1::from_iter(hz.windows(2).map(|w| w[1] - w[0]));

        let window = Array1::from_shape_fn(cutoff, |i| {
            0.54 - 0.46 * (2.0 * PI * i as f64 / (cfg.kernel_size - 1) as f64).cos()
        });
        let n = Array1::from_shape_fn(cutoff, |k| {
            2.0 * PI * (k as f64 - cutoff as f64) / cfg.sample_rate
        });

        Ok(Self {
            cfg,
            cutoff,
            low_hz,
            band_hz,
            window,
            n,
        })
    }

    /// The configuration, with `kernel_size` as normalized at construction.
    pub fn config(&self) -> &BankConfig {
        &self.cfg
    }

    /// Kernel length in samples. Always odd.
    pub fn kernel_size(&self) -> usize {
        self.cfg.kernel_size
    }

    /// Half-kernel length, `(kernel_size - 1) / 2`.
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Raw low cut-on parameters, one per pair. Pre-floor, any sign.
    pub fn low_hz(&self) -> &Array1<f64> {
        &self.low_hz
    }

    /// Raw bandwidth parameters, one per pair. Pre-floor, any sign.
    pub fn band_hz(&self) -> &Array1<f64> {
        &self.band_hz
    }

    /// Mutable access to the raw low cut-on parameters, for the optimizer.
    pub fn low_hz_mut(&mut self) -> &mut Array1<f64> {
        &mut self.low_hz
    }

    /// Mutable access to the raw bandwidth parameters, for the optimizer.
    pub fn band_hz_mut(&mut self) -> &mut Array1<f64> {
        &mut self.band_hz
    }

    /// Effective band edges for the current parameter values.
    ///
    /// `low = min_low_hz + |low_hz|`;
    /// `high = clamp(low + min_band_hz + |band_hz|, min_low_hz, nyquist)`.
    pub fn band_edges(&self) -> BandEdges {
        let n_pairs = self.cfg.n_pairs();
        let nyq = self.cfg.nyquist();

        let mut low = Array1::zeros(n_pairs);
        let mut high = Array1::zeros(n_pairs);
        let mut band = Array1::zeros(n_pairs);
        for i in 0..n_pairs {
            let l = self.cfg.min_low_hz + self.low_hz[i].abs();
            let h = (l + self.cfg.min_band_hz + self.band_hz[i].abs())
                .clamp(self.cfg.min_low_hz, nyq);
            low[i] = l;
            high[i] = h;
            band[i] = h - l;
        }
        BandEdges { low, high, band }
    }

    /// Generate the kernel bank at full precision.
    ///
    /// Shape `[n_filters, 1, kernel_size]`: the `n_filters/2` cos-type
    /// (symmetric) kernels first, then the sin-type (antisymmetric) kernels
    /// for the same bands. Pure function of the current parameters.
    pub fn filters_f64(&self) -> Array3<f64> {
        let n_pairs = self.cfg.n_pairs();
        let edges = self.band_edges();

        let mut out = Array3::zeros((self.cfg.n_filters, 1, self.cfg.kernel_size));
        for i in 0..n_pairs {
            self.fill_kernel(
                edges.low[i],
                edges.high[i],
                edges.band[i],
                FilterType::Cos,
                out.slice_mut(s![i, 0, ..]),
            );
            self.fill_kernel(
                edges.low[i],
                edges.high[i],
                edges.band[i],
                FilterType::Sin,
                out.slice_mut(s![n_pairs + i, 0, ..]),
            );
        }
        out
    }

    /// Generate the kernel bank as `f32` convolution weights.
    ///
    /// Computed in `f64`, cast on output.
    pub fn filters(&self) -> Array3<f32> {
        self.filters_f64().mapv(|v| v as f32)
    }

    /// Write one normalized band-pass kernel for the band `[low, high]`.
    ///
    /// Left half from the closed-form sinc difference, center sample
    /// `2·band` (cos) or `0` (sin), right half mirrored (cos: copy,
    /// sin: negated); the whole kernel is divided by `2·band`.
    fn fill_kernel(
        &self,
        low: f64,
        high: f64,
        band: f64,
        ty: FilterType,
        mut kernel: ArrayViewMut1<f64>,
    ) {
        let c = self.cutoff;
        let norm = 2.0 * band;

        for k in 0..c {
            // n is strictly negative (k < cutoff), so the quotient is defined.
            let n = self.n[k];
            let num = match ty {
                FilterType::Cos => (high * n).sin() - (low * n).sin(),
                FilterType::Sin => (low * n).cos() - (high * n).cos(),
            };
            let v = num / (n / 2.0) * self.window[k] / norm;
            kernel[k] = v;
            kernel[2 * c - k] = match ty {
                FilterType::Cos => v,
                FilterType::Sin => -v,
            };
        }
        kernel[c] = match ty {
            FilterType::Cos => 2.0 * band / norm,
            FilterType::Sin => 0.0,
        };
    }
}
