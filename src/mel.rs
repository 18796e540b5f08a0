//! Mel-scale frequency conversions (HTK variant).
//!
//! Used to place the initial filter bands perceptually: linear spacing in mel
//! domain, converted back to Hz. The constants follow the HTK formulation
//! (`2595 · log10(1 + f/700)`), not the Slaney piecewise scale, so the
//! forward and inverse conversions round-trip exactly.

/// Convert a frequency in Hz to mels.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert mels back to Hz. Exact inverse of [`hz_to_mel`].
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// `n` frequencies from `low_hz` to `high_hz`, linearly spaced in mel domain.
///
/// With `n == 1` only `low_hz` is returned; with `n >= 2` both endpoints are
/// included (matching `linspace` semantics).
pub fn mel_grid(low_hz: f64, high_hz: f64, n: usize) -> Vec<f64> {
    let m_low = hz_to_mel(low_hz);
    let m_high = hz_to_mel(high_hz);
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            mel_to_hz(m_low + (m_high - m_low) * t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        for hz in [1.0, 30.0, 440.0, 1000.0, 4000.0, 7950.0, 22050.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            approx::assert_relative_eq!(back, hz, max_relative = 1e-12);
        }
    }

    #[test]
    fn known_values() {
        // 1 kHz sits at ~1000 mel on the HTK scale.
        approx::assert_abs_diff_eq!(hz_to_mel(1000.0), 999.98, epsilon = 0.01);
        approx::assert_abs_diff_eq!(hz_to_mel(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn grid_hits_endpoints_and_is_monotonic() {
        let g = mel_grid(30.0, 7900.0, 9);
        assert_eq!(g.len(), 9);
        approx::assert_relative_eq!(g[0], 30.0, max_relative = 1e-12);
        approx::assert_relative_eq!(g[8], 7900.0, max_relative = 1e-12);
        for w in g.windows(2) {
            assert!(w[1] > w[0], "grid not increasing: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn grid_spacing_widens_with_frequency() {
        // Mel spacing is denser at low frequencies.
        let g = mel_grid(30.0, 7900.0, 17);
        let first = g[1] - g[0];
        let last = g[16] - g[15];
        assert!(last > first * 2.0, "expected widening steps, got {first} vs {last}");
    }
}
