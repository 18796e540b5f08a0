//! Filterbank configuration.
//!
//! [`BankConfig`] holds every construction-time setting of the filterbank.
//! All fields have defaults matching the 512-filter / 16 kHz separation
//! recipes, so most callers only override one or two values.

/// Whether the generated kernels are consumed as analysis (encoder) or
/// synthesis (decoder) convolution weights.
///
/// The tag does not change how kernels are computed — it only records how the
/// caller intends to wire the bank into the surrounding model (conv vs
/// transposed conv).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Bank used as weights of a strided 1-D convolution (waveform → features).
    #[default]
    Encoder,
    /// Bank used as weights of a transposed 1-D convolution (features → waveform).
    Decoder,
}

/// Configuration for a [`SincFilterbank`](crate::SincFilterbank).
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use sincfb::BankConfig;
///
/// let cfg = BankConfig {
///     n_filters: 128,      // smaller bank
///     kernel_size: 251,    // SincNet-length kernels
///     ..BankConfig::default()
/// };
/// ```
///
/// Or just call [`BankConfig::default()`] for the recipe settings.
#[derive(Debug, Clone)]
pub struct BankConfig {
    /// Total number of filters in the bank.
    ///
    /// Must be positive and even: the bank is built from `n_filters / 2`
    /// frequency bands, each contributing one even (cos-type) and one odd
    /// (sin-type) kernel.
    ///
    /// Default: `512`.
    pub n_filters: usize,

    /// Length of each filter kernel in samples.
    ///
    /// Forced odd at construction so every kernel has a well-defined center
    /// sample; an even value is bumped to `kernel_size + 1` with a warning.
    ///
    /// Default: `17` (the recipe value 16, already bumped to odd).
    pub kernel_size: usize,

    /// Stride of the convolution the bank is used with.
    ///
    /// Stored for the consumer of the bank; kernel synthesis does not depend
    /// on it.
    ///
    /// Default: `8`.
    pub stride: usize,

    /// Encoder or decoder placement of the bank. See [`Mode`].
    ///
    /// Default: [`Mode::Encoder`].
    pub mode: Mode,

    /// Sampling rate of the signal the bank operates on, in Hz.
    ///
    /// Default: `16000.0`.
    pub sample_rate: f64,

    /// Lowest low cut-on frequency a filter may take, in Hz.
    ///
    /// The effective low edge of every band is `min_low_hz + |low_hz|`, so no
    /// filter can reach below this floor regardless of where training drives
    /// the raw parameter.
    ///
    /// Default: `50.0`.
    pub min_low_hz: f64,

    /// Lowest bandwidth a filter may take before Nyquist clamping, in Hz.
    ///
    /// Added into the high edge as `low + min_band_hz + |band_hz|`; clamping
    /// the high edge to Nyquist may still shrink the realized band below this
    /// value for the topmost filters.
    ///
    /// Default: `50.0`.
    pub min_band_hz: f64,
}

impl Default for BankConfig {
    /// Returns the separation-recipe settings:
    /// 512 filters · 17 taps · stride 8 · encoder · 16 kHz · 50 Hz floors.
    fn default() -> Self {
        Self {
            n_filters: 512,
            kernel_size: 17,
            stride: 8,
            mode: Mode::Encoder,
            sample_rate: 16000.0,
            min_low_hz: 50.0,
            min_band_hz: 50.0,
        }
    }
}

impl BankConfig {
    /// Nyquist frequency (`sample_rate / 2`) in Hz.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of cos/sin filter pairs (`n_filters / 2`).
    pub fn n_pairs(&self) -> usize {
        self.n_filters / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_recipe_config() {
        let cfg = BankConfig::default();
        assert_eq!(cfg.n_filters, 512);
        assert_eq!(cfg.kernel_size, 17);
        assert_eq!(cfg.stride, 8);
        assert_eq!(cfg.mode, Mode::Encoder);
        assert_eq!(cfg.nyquist(), 8000.0);
        assert_eq!(cfg.n_pairs(), 256);
    }
}
