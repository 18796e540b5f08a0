//! Magnitude frequency response of generated kernels.
//!
//! Small FFT helpers for inspecting where a kernel actually passes energy;
//! used by the tests to confirm band placement and by the CLI summary.

use rustfft::{num_complex::Complex, FftPlanner};

/// Magnitude response of `kernel`, zero-padded to `n_fft`.
///
/// Returns the first `n_fft/2 + 1` bins (DC through Nyquist).
/// `n_fft` must be at least the kernel length.
pub fn magnitude_response(kernel: &[f32], n_fft: usize) -> Vec<f32> {
    assert!(
        n_fft >= kernel.len(),
        "n_fft={n_fft} shorter than kernel ({} taps)",
        kernel.len()
    );
    let mut buf: Vec<Complex<f32>> = kernel
        .iter()
        .map(|&v| Complex { re: v, im: 0.0 })
        .chain(std::iter::repeat(Complex::default()))
        .take(n_fft)
        .collect();
    let mut planner: FftPlanner<f32> = FftPlanner::new();
    planner.plan_fft_forward(n_fft).process(&mut buf);
    buf[..n_fft / 2 + 1].iter().map(|c| c.norm()).collect()
}

/// Center frequency in Hz of each bin returned by [`magnitude_response`].
pub fn bin_frequencies(n_fft: usize, sample_rate: f64) -> Vec<f64> {
    (0..n_fft / 2 + 1)
        .map(|k| k as f64 * sample_rate / n_fft as f64)
        .collect()
}

/// Frequency (Hz) of the strongest response bin.
pub fn peak_frequency(kernel: &[f32], n_fft: usize, sample_rate: f64) -> f64 {
    let mag = magnitude_response(kernel, n_fft);
    let mut peak = 0;
    for (k, &m) in mag.iter().enumerate() {
        if m > mag[peak] {
            peak = k;
        }
    }
    peak as f64 * sample_rate / n_fft as f64
}
