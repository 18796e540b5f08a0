use ndarray::arr1;
use sincfb::{BankConfig, SincFilterbank};

// ── Shape and normalization ───────────────────────────────────────────────────

#[test]
fn bank_shape_matches_config() {
    for (n, k) in [(4usize, 5usize), (16, 17), (64, 33), (512, 17)] {
        let fb = SincFilterbank::new(BankConfig {
            n_filters: n,
            kernel_size: k,
            ..BankConfig::default()
        })
        .unwrap();
        assert_eq!(fb.filters().shape(), &[n, 1, k]);
    }
}

#[test]
fn even_kernel_size_is_bumped() {
    let fb = SincFilterbank::new(BankConfig {
        kernel_size: 16,
        ..BankConfig::default()
    })
    .unwrap();
    assert_eq!(fb.kernel_size(), 17);
    assert_eq!(fb.filters().shape(), &[512, 1, 17]);
}

// ── Mel initialization ────────────────────────────────────────────────────────

#[test]
fn mel_init_matches_reference_values() {
    // 4 filters @ 16 kHz, 50/50 Hz floors: 3 mel points from 30 Hz to
    // 7900 Hz put the middle grid point at ≈ 1805.6 Hz.
    let fb = SincFilterbank::new(BankConfig {
        n_filters: 4,
        kernel_size: 5,
        stride: 1,
        ..BankConfig::default()
    })
    .unwrap();

    approx::assert_abs_diff_eq!(fb.low_hz()[0], 30.0, epsilon = 1e-6);
    approx::assert_abs_diff_eq!(fb.low_hz()[1], 1805.6, epsilon = 1.0);
    approx::assert_abs_diff_eq!(fb.band_hz()[0], 1775.6, epsilon = 1.0);
    approx::assert_abs_diff_eq!(fb.band_hz()[1], 6094.4, epsilon = 1.0);
}

// ── Kernel symmetry ───────────────────────────────────────────────────────────

#[test]
fn cos_kernels_are_symmetric_sin_kernels_antisymmetric() {
    let mut fb = SincFilterbank::new(BankConfig {
        n_filters: 6,
        kernel_size: 21,
        ..BankConfig::default()
    })
    .unwrap();
    // Arbitrary raw parameters, signs mixed.
    fb.low_hz_mut().assign(&arr1(&[200.0, -900.0, 3000.0]));
    fb.band_hz_mut().assign(&arr1(&[-120.0, 400.0, 2500.0]));

    let bank = fb.filters();
    let c = fb.cutoff();
    for pair in 0..3 {
        for i in 0..c {
            // cos-type: mirror copy about the center index.
            assert_eq!(
                bank[[pair, 0, c - 1 - i]],
                bank[[pair, 0, c + 1 + i]],
                "cos kernel {pair} not symmetric at offset {i}"
            );
            // sin-type: negated mirror, zero center.
            assert_eq!(
                bank[[3 + pair, 0, c + 1 + i]],
                -bank[[3 + pair, 0, c - 1 - i]],
                "sin kernel {pair} not antisymmetric at offset {i}"
            );
        }
        assert_eq!(bank[[3 + pair, 0, c]], 0.0);
    }
}

// ── Frequency floors and clamps ───────────────────────────────────────────────

#[test]
fn edges_bounded_for_arbitrary_raw_parameters() {
    let mut fb = SincFilterbank::new(BankConfig {
        n_filters: 10,
        ..BankConfig::default()
    })
    .unwrap();
    fb.low_hz_mut()
        .assign(&arr1(&[-7.0, 0.0, 12000.0, -12000.0, 3.5]));
    fb.band_hz_mut()
        .assign(&arr1(&[1e9, -1e9, 0.0, -0.25, 60.0]));

    let edges = fb.band_edges();
    for i in 0..5 {
        assert!(edges.low[i] >= 50.0, "low[{i}] = {}", edges.low[i]);
        assert!(edges.high[i] >= 50.0, "high[{i}] = {}", edges.high[i]);
        assert!(edges.high[i] <= 8000.0, "high[{i}] = {}", edges.high[i]);
    }

    // Kernels stay finite even in the clamped corners.
    for &v in fb.filters().iter() {
        assert!(v.is_finite());
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[test]
fn repeated_generation_is_bit_identical() {
    let mut fb = SincFilterbank::new(BankConfig {
        n_filters: 32,
        ..BankConfig::default()
    })
    .unwrap();
    fb.low_hz_mut()[3] = -77.7;
    let a = fb.filters();
    let b = fb.filters();
    assert_eq!(a, b);
}

// ── Concrete end-to-end scenario ──────────────────────────────────────────────

#[test]
fn four_filter_five_tap_scenario() {
    let fb = SincFilterbank::new(BankConfig {
        n_filters: 4,
        kernel_size: 5,
        stride: 1,
        sample_rate: 16000.0,
        min_low_hz: 50.0,
        min_band_hz: 50.0,
        ..BankConfig::default()
    })
    .unwrap();
    assert_eq!(fb.low_hz().len(), 2);
    assert_eq!(fb.band_hz().len(), 2);
    assert_eq!(fb.cutoff(), 2);

    let bank = fb.filters();
    assert_eq!(bank.shape(), &[4, 1, 5]);

    for f in 0..2 {
        // cos-type: mirror-symmetric about index 2.
        assert_eq!(bank[[f, 0, 0]], bank[[f, 0, 4]]);
        assert_eq!(bank[[f, 0, 1]], bank[[f, 0, 3]]);
        // sin-type: antisymmetric about index 2, zero at the center.
        assert_eq!(bank[[2 + f, 0, 4]], -bank[[2 + f, 0, 0]]);
        assert_eq!(bank[[2 + f, 0, 3]], -bank[[2 + f, 0, 1]]);
        assert_eq!(bank[[2 + f, 0, 2]], 0.0);
    }
}
