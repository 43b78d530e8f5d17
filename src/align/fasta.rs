//! Query FASTA helpers: header listing and reduced-subset extraction.
//!
//! Reduced query files drive the chain and the hierarchical policy. They are
//! created as named temp files under the configured scratch directory and
//! removed when the owning handle drops, so cleanup holds on every exit path.

use std::collections::HashSet;
use std::io::{BufReader, Write};
use std::path::Path;

use noodles::fasta;
use tempfile::NamedTempFile;

use crate::align::AlignerError;

/// List the sequence identifiers of a FASTA file, in file order.
///
/// Only the identifier token is returned; FASTA description text after the
/// first whitespace never participates in query bookkeeping.
pub fn read_query_ids(path: &Path) -> Result<Vec<String>, AlignerError> {
    let mut reader = std::fs::File::open(path)
        .map(BufReader::new)
        .map(fasta::io::Reader::new)?;

    let mut ids = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AlignerError::Fasta(e.to_string()))?;
        ids.push(String::from_utf8_lossy(record.name()).to_string());
    }

    Ok(ids)
}

/// Write the subset of `src` records whose identifier is in `keep` to a new
/// temp file under `tmp_dir`. The returned handle owns the file; dropping it
/// deletes the file.
pub fn write_query_subset(
    src: &Path,
    keep: &HashSet<String>,
    tmp_dir: &Path,
) -> Result<NamedTempFile, AlignerError> {
    let mut reader = std::fs::File::open(src)
        .map(BufReader::new)
        .map(fasta::io::Reader::new)?;

    let mut buf = Vec::new();
    {
        let mut writer = fasta::io::Writer::new(&mut buf);
        for result in reader.records() {
            let record = result.map_err(|e| AlignerError::Fasta(e.to_string()))?;
            let id = String::from_utf8_lossy(record.name()).to_string();
            if keep.contains(&id) {
                writer
                    .write_record(&record)
                    .map_err(|e| AlignerError::Fasta(e.to_string()))?;
            }
        }
    }

    let mut tmp = tempfile::Builder::new()
        .prefix("seqplace_")
        .suffix(".fasta")
        .tempfile_in(tmp_dir)?;
    tmp.write_all(&buf)?;
    tmp.flush()?;

    Ok(tmp)
}
