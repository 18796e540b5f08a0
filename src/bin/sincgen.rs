use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sincfb::{io::write_bank, BankConfig, Mode, SincFilterbank};

#[derive(Parser)]
#[command(name = "sincgen", about = "Generate a parameterized sinc filterbank")]
struct Args {
    /// Total number of filters (even: cos/sin pairs)
    #[arg(long, default_value_t = 512)]
    n_filters: usize,

    /// Kernel length in samples (even values are bumped to odd)
    #[arg(long, default_value_t = 17)]
    kernel_size: usize,

    /// Convolution stride the bank is intended for
    #[arg(long, default_value_t = 8)]
    stride: usize,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 16000.0)]
    sample_rate: f64,

    /// Lowest allowed low cut-on frequency (Hz)
    #[arg(long, default_value_t = 50.0)]
    min_low_hz: f64,

    /// Lowest allowed bandwidth before Nyquist clamping (Hz)
    #[arg(long, default_value_t = 50.0)]
    min_band_hz: f64,

    /// Tag the bank for decoder (transposed-conv) use
    #[arg(long)]
    decoder: bool,

    /// Print per-pair band edges
    #[arg(long)]
    verbose: bool,

    /// bank.safetensors output path
    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let cfg = BankConfig {
        n_filters: args.n_filters,
        kernel_size: args.kernel_size,
        stride: args.stride,
        mode: if args.decoder { Mode::Decoder } else { Mode::Encoder },
        sample_rate: args.sample_rate,
        min_low_hz: args.min_low_hz,
        min_band_hz: args.min_band_hz,
    };

    let fb = SincFilterbank::new(cfg)?;
    let bank = fb.filters();
    println!(
        "Generated {} filters × {} taps @ {} Hz ({:?}, stride {})",
        fb.config().n_filters,
        fb.kernel_size(),
        fb.config().sample_rate,
        fb.config().mode,
        fb.config().stride,
    );

    if args.verbose {
        let edges = fb.band_edges();
        for i in 0..fb.config().n_pairs() {
            println!(
                "  pair {i:3}: {:8.1} – {:8.1} Hz  (band {:7.1} Hz)",
                edges.low[i], edges.high[i], edges.band[i],
            );
        }
    }

    write_bank(&args.output, &bank, fb.low_hz(), fb.band_hz())?;
    println!("Written → {}", args.output.display());

    Ok(())
}
