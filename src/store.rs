//! Writing and reading scraped datasets.
//!
//! Two independent formats are produced from the same records:
//! - a pretty-printed JSON array (4-space indent), the latest full dump
//! - a gzip-compressed stream with one JSON object per line
//!
//! Both writers truncate the target file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, instrument, warn};

use crate::{Dataset, ProductRecord};

/// Writes `data` as one pretty-printed JSON array.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = data.len()))]
pub fn save_to_json(data: &[ProductRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    data.serialize(&mut serializer)?;
    writer.flush()?;

    info!("Data saved");
    Ok(())
}

/// Writes `data` as gzip-compressed newline-delimited JSON.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = data.len()))]
pub fn save_to_gzip_ndjson(data: &[ProductRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    for record in data {
        serde_json::to_writer(&mut encoder, record)?;
        encoder.write_all(b"\n")?;
    }
    encoder.finish()?.flush()?;

    info!("Data saved");
    Ok(())
}

/// Reads a file written by [`save_to_gzip_ndjson`].
///
/// A missing file yields an empty dataset.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn read_from_gzip_ndjson(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("File not found, returning empty dataset");
            return Ok(Dataset::new());
        }
        Err(e) => return Err(e).wrap_err_with(|| format!("Failed to open {}", path.display())),
    };

    let reader = BufReader::new(GzDecoder::new(BufReader::new(file)));
    let mut data = Dataset::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .wrap_err_with(|| format!("Malformed record on line {}", index + 1))?;
        data.push(record);
    }

    info!(count = data.len(), "Data read");
    Ok(data)
}
