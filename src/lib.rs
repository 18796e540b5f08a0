//! # sincfb — parameterized sinc filterbank for learned speech front-ends
//!
//! `sincfb` generates a bank of band-pass FIR kernels from a handful of
//! trainable scalars per filter: instead of learning free convolution
//! weights, a model learns each band's low cut-on and bandwidth, and the
//! time-domain kernels are synthesized from a closed-form Hamming-windowed
//! sinc formula on every forward pass. The construction follows SincNet
//! (Ravanelli & Bengio, SLT 2018) extended with the odd/sin-type filters of
//! "Filterbank design for end-to-end speech separation" (Pariente, Cornell,
//! Deleforge, Vincent, ICASSP 2020), and matches the PyTorch implementation
//! in Asteroid to within floating-point rounding error.
//!
//! ## Data flow
//!
//! ```text
//! BankConfig
//!   │
//!   ├─ SincFilterbank::new()    mel-spaced init of low_hz / band_hz,
//!   │                           fixed buffers (half window, half time index)
//!   │
//!   │        ┌──────────────── external optimizer mutates low_hz / band_hz
//!   ▼        ▼
//! filters() per forward pass → [n_filters, 1, kernel_size] conv weights
//! filters_with_grad()        → weights + ∂weights/∂params for backprop
//! ```
//!
//! The surrounding training loop, data loading, loss computation and the 1-D
//! convolution consuming the weights are external collaborators.
//!
//! ## Quick start
//!
//! ```
//! use sincfb::{BankConfig, SincFilterbank};
//!
//! let fb = SincFilterbank::new(BankConfig {
//!     n_filters: 64,
//!     ..BankConfig::default()
//! }).unwrap();
//!
//! // Cos-type kernels occupy the first 32 slots, sin-type the last 32.
//! let bank = fb.filters();
//! assert_eq!(bank.shape(), &[64, 1, 17]);
//!
//! // Effective band edges after floors and Nyquist clamping.
//! let edges = fb.band_edges();
//! assert!(edges.low.iter().all(|&l| l >= 50.0));
//! assert!(edges.high.iter().all(|&h| h <= 8000.0));
//! ```
//!
//! ## Training step sketch
//!
//! ```
//! use sincfb::{BankConfig, SincFilterbank};
//!
//! let mut fb = SincFilterbank::new(BankConfig {
//!     n_filters: 8,
//!     ..BankConfig::default()
//! }).unwrap();
//!
//! let step = fb.filters_with_grad();
//! // ... convolve with step.filters, backprop a loss to per-sample grads,
//! // contract them against step.d_low_hz / step.d_band_hz ...
//! fb.low_hz_mut()[0] -= 0.5; // optimizer update
//!
//! let next = fb.filters();
//! assert_ne!(next, step.filters.mapv(|v| v as f32));
//! ```

pub mod bank;
pub mod config;
pub mod io;
pub mod mel;
pub mod response;

// ── Crate-root re-exports ─────────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `sincfb::Foo` without having to know the internal module layout.

// bank
pub use bank::{grad::BankGrad, BandEdges, SincFilterbank};

// config
pub use config::{BankConfig, Mode};

// io — safetensors round-trip
pub use io::{read_bank, write_bank, BankFile, TensorFile};

// mel
pub use mel::{hz_to_mel, mel_grid, mel_to_hz};

// response
pub use response::{bin_frequencies, magnitude_response, peak_frequency};
