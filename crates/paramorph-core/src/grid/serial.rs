//! Serialization for Grid
//!
//! Mixed text header + binary data format.
//!
//! ```text
//! \nGrid Version 1\n
//! type = T, ndim = N, nbytes = B\n
//! dims = D0 D1 ...\n
//! spacing = S0 S1 ...\n
//! <raw sample data, little-endian, B bytes>
//! \n
//! ```
//!
//! `T` is the sample type name (`u8` or `f64`).

use crate::error::{Error, Result};
use crate::grid::Grid;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Grid format version
const GRID_VERSION: i32 = 1;

/// Maximum sample count (2^30)
const MAX_GRID_SAMPLES: u64 = 1 << 30;

/// Maximum input size in bytes.
const MAX_INPUT_SIZE: u64 = 2_000_000_000;

/// Number of non-empty text lines in the header
const HEADER_LINES: usize = 4;

/// Sample types that can be written in the grid format
pub trait SerialSample: Copy + Default {
    /// Name written in the `type = ` header field
    const TYPE_NAME: &'static str;
    /// Bytes per sample
    const SIZE: usize;

    /// Append the little-endian encoding of `self`
    fn write_le(self, writer: &mut impl Write) -> std::io::Result<()>;

    /// Decode one sample from exactly `SIZE` little-endian bytes
    fn read_le(bytes: &[u8]) -> Self;
}

impl SerialSample for u8 {
    const TYPE_NAME: &'static str = "u8";
    const SIZE: usize = 1;

    fn write_le(self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(&[self])
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl SerialSample for f64 {
    const TYPE_NAME: &'static str = "f64";
    const SIZE: usize = 8;

    fn write_le(self, writer: &mut impl Write) -> std::io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        f64::from_le_bytes(raw)
    }
}

impl<T: SerialSample> Grid<T> {
    /// Read a grid from a reader.
    pub fn read_from_reader(reader: &mut impl Read) -> Result<Self> {
        let mut buf = Vec::new();
        reader.take(MAX_INPUT_SIZE + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > MAX_INPUT_SIZE {
            return Err(Error::DecodeError(format!(
                "input too large: exceeds maximum allowed size of {MAX_INPUT_SIZE} bytes"
            )));
        }
        Self::read_from_bytes(&buf)
    }

    /// Read a grid from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_from_reader(&mut BufReader::new(file))
    }

    /// Read a grid from a byte slice.
    pub fn read_from_bytes(data: &[u8]) -> Result<Self> {
        let header = parse_header(data)?;

        if header.type_name != T::TYPE_NAME {
            return Err(Error::DecodeError(format!(
                "sample type mismatch: file holds {} but {} was requested",
                header.type_name,
                T::TYPE_NAME
            )));
        }
        if header.dims.len() != header.ndim || header.spacing.len() != header.ndim {
            return Err(Error::DecodeError(format!(
                "header declares {} axes but lists {} dims and {} spacings",
                header.ndim,
                header.dims.len(),
                header.spacing.len()
            )));
        }

        let nsamples = header
            .dims
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d as u64))
            .unwrap_or(u64::MAX);
        if nsamples > MAX_GRID_SAMPLES {
            return Err(Error::DecodeError(format!(
                "grid too large: {nsamples} samples exceeds maximum {MAX_GRID_SAMPLES}"
            )));
        }
        let expected_nbytes = nsamples * T::SIZE as u64;
        if header.nbytes != expected_nbytes {
            return Err(Error::DecodeError(format!(
                "grid nbytes mismatch: header says {} but dims give {expected_nbytes}",
                header.nbytes
            )));
        }

        let binary_start = header.end;
        let binary_end = binary_start + header.nbytes as usize;
        if data.len() < binary_end {
            return Err(Error::DecodeError(format!(
                "grid data truncated: need {binary_end} bytes but only have {}",
                data.len()
            )));
        }
        let samples: Vec<T> = data[binary_start..binary_end]
            .chunks_exact(T::SIZE)
            .map(T::read_le)
            .collect();

        let mut grid = Grid::from_data(&header.dims, samples)?;
        grid.set_spacing(&header.spacing)?;
        Ok(grid)
    }

    /// Write a grid to a writer.
    pub fn write_to_writer(&self, writer: &mut impl Write) -> Result<()> {
        let nbytes = self.data.len() as u64 * T::SIZE as u64;
        writeln!(writer, "\nGrid Version {GRID_VERSION}")?;
        writeln!(
            writer,
            "type = {}, ndim = {}, nbytes = {nbytes}",
            T::TYPE_NAME,
            self.dims.len()
        )?;
        writeln!(writer, "dims = {}", join(&self.dims))?;
        writeln!(writer, "spacing = {}", join(&self.spacing))?;

        for &val in &self.data {
            val.write_le(writer)?;
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Write a grid to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a grid to a byte vector.
    pub fn write_to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to_writer(&mut buf)?;
        Ok(buf)
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Parsed text header
struct Header {
    type_name: String,
    ndim: usize,
    nbytes: u64,
    dims: Vec<usize>,
    spacing: Vec<f64>,
    end: usize,
}

fn join<V: std::fmt::Display>(values: &[V]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_header(data: &[u8]) -> Result<Header> {
    let end = find_header_end_by_lines(data)?;
    let text = std::str::from_utf8(&data[..end])
        .map_err(|e| Error::DecodeError(format!("grid header is not valid UTF-8: {e}")))?;
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let version_line = lines
        .iter()
        .find_map(|l| l.strip_prefix("Grid Version "))
        .ok_or_else(|| Error::DecodeError("grid version line not found".into()))?;
    let version: i32 = parse_value(version_line, "version")?;
    if version != GRID_VERSION {
        return Err(Error::DecodeError(format!(
            "invalid grid version: {version}"
        )));
    }

    // "type = T, ndim = N, nbytes = B"
    let info_line = lines
        .iter()
        .find(|l| l.starts_with("type = "))
        .ok_or_else(|| Error::DecodeError("grid type line not found".into()))?;
    let parts: Vec<&str> = info_line.split(',').collect();
    if parts.len() < 3 {
        return Err(Error::DecodeError(format!(
            "invalid type line: '{info_line}'"
        )));
    }
    let type_name = key_value(parts[0], "type")?.to_string();
    let ndim: usize = parse_value(key_value(parts[1], "ndim")?, "ndim")?;
    let nbytes: u64 = parse_value(key_value(parts[2], "nbytes")?, "nbytes")?;

    let dims = lines
        .iter()
        .find_map(|l| l.strip_prefix("dims ="))
        .ok_or_else(|| Error::DecodeError("grid dims line not found".into()))
        .and_then(|rest| parse_list::<usize>(rest, "dims"))?;
    if dims.is_empty() || dims.contains(&0) {
        return Err(Error::DecodeError(format!("invalid dimensions: {dims:?}")));
    }
    let spacing = lines
        .iter()
        .find_map(|l| l.strip_prefix("spacing ="))
        .ok_or_else(|| Error::DecodeError("grid spacing line not found".into()))
        .and_then(|rest| parse_list::<f64>(rest, "spacing"))?;

    Ok(Header {
        type_name,
        ndim,
        nbytes,
        dims,
        spacing,
        end,
    })
}

/// Find the byte offset where binary data begins by scanning for text header lines.
///
/// The header has `HEADER_LINES` content lines, possibly preceded by empty
/// lines. Returns the byte offset right after the last one's newline.
fn find_header_end_by_lines(data: &[u8]) -> Result<usize> {
    let scan_limit = data.len().min(4096);
    let mut content_lines_found = 0;
    let mut pos = 0;

    while pos < scan_limit {
        let Some(offset) = data[pos..scan_limit].iter().position(|&b| b == b'\n') else {
            break;
        };
        let line_end = pos + offset;
        let is_content = data[pos..line_end]
            .iter()
            .any(|&b| b != b' ' && b != b'\r');
        if is_content {
            content_lines_found += 1;
            if content_lines_found == HEADER_LINES {
                return Ok(line_end + 1);
            }
        }
        pos = line_end + 1;
    }
    Err(Error::DecodeError(format!(
        "could not find end of text header (expected {HEADER_LINES} header lines)"
    )))
}

/// Extract the value of "key = value"
fn key_value<'a>(s: &'a str, key: &str) -> Result<&'a str> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| Error::DecodeError(format!("missing '=' in {key} field")))?;
    if k.trim() != key {
        return Err(Error::DecodeError(format!(
            "expected field {key}, found {}",
            k.trim()
        )));
    }
    Ok(v.trim())
}

fn parse_value<V: FromStr>(s: &str, key: &str) -> Result<V>
where
    V::Err: std::fmt::Display,
{
    s.trim()
        .parse()
        .map_err(|e| Error::DecodeError(format!("failed to parse {key}: {e}")))
}

fn parse_list<V: FromStr>(s: &str, key: &str) -> Result<Vec<V>>
where
    V::Err: std::fmt::Display,
{
    s.split_whitespace().map(|v| parse_value(v, key)).collect()
}
