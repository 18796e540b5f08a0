//! Safetensors I/O for generated banks and their parameters.
//!
//! Hand-rolled format handling: 8-byte little-endian header length, JSON
//! header with `dtype`/`shape`/`data_offsets`, raw little-endian payload.
//! No dependency on the `safetensors` crate's tensor types — we only move
//! raw buffers in and out of ndarray.

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array3};
use std::path::Path;

// ── Writer ────────────────────────────────────────────────────────────────────

/// Safetensors file builder for F32/F64 tensors of arbitrary shape.
///
/// Usage:
/// ```rust,no_run
/// use sincfb::io::TensorFile;
/// use std::path::Path;
/// let mut tf = TensorFile::new();
/// tf.push_f32("kernel", &[0.1_f32, 0.8, 0.1], &[1, 3]);
/// tf.push_f64("low_hz", &[30.0_f64], &[1]);
/// tf.write(Path::new("/tmp/bank.safetensors")).unwrap();
/// ```
pub struct TensorFile {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl TensorFile {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn push_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;

        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(
                name.clone(),
                serde_json::json!({
                    "dtype": dtype,
                    "shape": shape,
                    "data_offsets": [offset, offset + data.len()],
                }),
            );
            offset += data.len();
        }

        // Header padded to a multiple of 8 with trailing spaces.
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes
            .into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();

        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

impl Default for TensorFile {
    fn default() -> Self {
        Self::new()
    }
}

// ── Bank round-trip ───────────────────────────────────────────────────────────

/// A bank and its raw parameters loaded back from a safetensors file.
#[derive(Debug)]
pub struct BankFile {
    /// [n_filters, 1, kernel_size] convolution weights.
    pub filters: Array3<f32>,
    /// Raw low cut-on parameters, one per pair.
    pub low_hz: Array1<f64>,
    /// Raw bandwidth parameters, one per pair.
    pub band_hz: Array1<f64>,
}

/// Write a generated bank plus its raw parameters.
///
/// Keys: `filters` (F32, 3-D), `low_hz` / `band_hz` (F64, 1-D).
pub fn write_bank(
    path: &Path,
    filters: &Array3<f32>,
    low_hz: &Array1<f64>,
    band_hz: &Array1<f64>,
) -> Result<()> {
    let mut tf = TensorFile::new();
    let flat: Vec<f32> = filters.iter().copied().collect();
    tf.push_f32("filters", &flat, filters.shape());
    let low: Vec<f64> = low_hz.iter().copied().collect();
    tf.push_f64("low_hz", &low, &[low.len()]);
    let band: Vec<f64> = band_hz.iter().copied().collect();
    tf.push_f64("band_hz", &band, &[band.len()]);
    tf.write(path)
}

/// Read back a file written by [`write_bank`].
pub fn read_bank(path: &Path) -> Result<BankFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let filters_entry = entry(&header, "filters")?;
    let shape = shape_of(filters_entry)?;
    if shape.len() != 3 {
        bail!("'filters' must be 3-D, got shape {shape:?}");
    }
    let flat = read_f32(&bytes, data_start, filters_entry)?;
    let filters = Array3::from_shape_vec((shape[0], shape[1], shape[2]), flat)?;

    let low_hz = Array1::from_vec(read_f64(&bytes, data_start, entry(&header, "low_hz")?)?);
    let band_hz = Array1::from_vec(read_f64(&bytes, data_start, entry(&header, "band_hz")?)?);

    Ok(BankFile { filters, low_hz, band_hz })
}

// ── Low-level parsing ─────────────────────────────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(serde_json::Value, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().expect("8-byte slice")) as usize;
    if bytes.len() < 8 + n {
        bail!("safetensors header truncated");
    }
    let header: serde_json::Value =
        serde_json::from_slice(&bytes[8..8 + n]).context("parsing safetensors header")?;
    Ok((header, 8 + n))
}

fn entry<'a>(header: &'a serde_json::Value, name: &str) -> Result<&'a serde_json::Value> {
    header
        .get(name)
        .with_context(|| format!("missing '{name}' tensor"))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("missing tensor shape")?
        .iter()
        .map(|v| v.as_u64().map(|n| n as usize).context("bad shape entry"))
        .collect()
}

fn tensor_bytes<'a>(
    bytes: &'a [u8],
    data_start: usize,
    entry: &serde_json::Value,
    dtype: &str,
) -> Result<&'a [u8]> {
    let got = entry["dtype"].as_str().context("missing dtype")?;
    if got != dtype {
        bail!("expected dtype {dtype}, got {got}");
    }
    let offsets = entry["data_offsets"].as_array().context("missing data_offsets")?;
    let s = offsets[0].as_u64().context("bad offset")? as usize;
    let e = offsets[1].as_u64().context("bad offset")? as usize;
    bytes
        .get(data_start + s..data_start + e)
        .context("tensor data out of bounds")
}

fn read_f32(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f32>> {
    let raw = tensor_bytes(bytes, data_start, entry, "F32")?;
    Ok(raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn read_f64(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f64>> {
    let raw = tensor_bytes(bytes, data_start, entry, "F64")?;
    Ok(raw
        .chunks_exact(8)
        .map(|b| f64::from_le_bytes(b.try_into().expect("8-byte chunk")))
        .collect())
}
