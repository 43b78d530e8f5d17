//! Aligner adapters: one wrapper per external tool.
//!
//! Every adapter follows the same contract: check that the database artifact
//! exists on disk, invoke the tool as a blocking subprocess, parse its output
//! into typed hits while applying the identity/coverage thresholds, and run
//! the per-query filter policy native to that tool. Malformed tool output is
//! never skipped silently; it surfaces as [`AlignerError::InvalidOutput`] so
//! tool-version drift is caught immediately.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use tracing::debug;

use crate::align::{filter, AlignerError};
use crate::config::PathsConfig;
use crate::core::hit::AlignmentHit;
use crate::core::types::{RefType, Strand, Thresholds};

/// An external alignment tool wrapped behind a uniform interface
pub trait Aligner {
    /// Stable tool name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Align the query file against one database. Returns hits that passed
    /// the thresholds and the adapter's per-query filter policy.
    fn align(
        &self,
        query: &Path,
        db: &str,
        ref_type: RefType,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError>;
}

/// Tool selector used at the configuration boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerKind {
    Blastn,
    Hsblastn,
    Gmap,
}

impl FromStr for AlignerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blastn" => Ok(Self::Blastn),
            "hsblastn" => Ok(Self::Hsblastn),
            "gmap" => Ok(Self::Gmap),
            other => Err(format!("unknown aligner '{other}'")),
        }
    }
}

impl AlignerKind {
    /// Build the adapter for this tool from the paths configuration
    pub fn build(
        self,
        paths: &PathsConfig,
        threads: usize,
        verbose: bool,
    ) -> Box<dyn Aligner> {
        match self {
            Self::Blastn => Box::new(BlastnAligner {
                app: paths.blastn_app.clone(),
                dbs: paths.blastn_dbs.clone(),
                threads,
                verbose,
            }),
            Self::Hsblastn => Box::new(HsBlastnAligner {
                app: paths.hsblastn_app.clone(),
                dbs: paths.hsblastn_dbs.clone(),
                threads,
                verbose,
            }),
            Self::Gmap => Box::new(GmapAligner {
                app: paths.gmap_app.clone(),
                app_large: paths.gmapl_app.clone(),
                dbs: paths.gmap_dbs.clone(),
                threads,
                verbose,
            }),
        }
    }
}

/// Run a prepared command and return its stdout as text.
///
/// With `verbose` the tool's stderr streams straight to the console and the
/// failure detail stays empty; otherwise stderr is captured into the error.
fn run_tool(tool: &'static str, mut cmd: Command, verbose: bool) -> Result<String, AlignerError> {
    debug!(tool, command = ?cmd, "invoking aligner");

    if verbose {
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output()?;

    if !output.status.success() {
        return Err(AlignerError::ToolFailed {
            tool,
            status: output.status,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn parse_field<T: FromStr>(
    tool: &'static str,
    line_num: usize,
    name: &str,
    raw: &str,
) -> Result<T, AlignerError> {
    raw.trim().parse().map_err(|_| AlignerError::InvalidOutput {
        tool,
        message: format!("line {line_num}: invalid {name} '{raw}'"),
    })
}

/// Parse blast-style tabular output (`-outfmt 6 qseqid qlen sseqid slen length
/// qstart qend sstart send bitscore evalue pident ...`) into hits, applying
/// the thresholds as each line is read.
fn parse_tabular_hits(
    tool: &'static str,
    algorithm: &str,
    text: &str,
    db: &str,
    thresholds: Thresholds,
) -> Result<Vec<AlignmentHit>, AlignerError> {
    let mut hits = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        // comment lines can appear in wrapper output
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            return Err(AlignerError::InvalidOutput {
                tool,
                message: format!("line {line_num} has {} fields, expected 12+", fields.len()),
            });
        }

        let identity: f64 = parse_field(tool, line_num, "identity", fields[11])?;
        if identity < thresholds.min_identity {
            continue;
        }

        let query_len: u64 = parse_field(tool, line_num, "query length", fields[1])?;
        let align_len: u64 = parse_field(tool, line_num, "alignment length", fields[4])?;
        if query_len == 0 {
            return Err(AlignerError::InvalidOutput {
                tool,
                message: format!("line {line_num}: zero query length"),
            });
        }

        let query_coverage = (align_len as f64 / query_len as f64) * 100.0;
        if query_coverage < thresholds.min_coverage {
            continue;
        }

        let score: f64 = parse_field(tool, line_num, "bitscore", fields[9])?;
        let query_start: u64 = parse_field(tool, line_num, "query start", fields[5])?;
        let query_end: u64 = parse_field(tool, line_num, "query end", fields[6])?;
        let s_start: u64 = parse_field(tool, line_num, "subject start", fields[7])?;
        let s_end: u64 = parse_field(tool, line_num, "subject end", fields[8])?;

        // subject coordinates are reported in alignment orientation; the
        // stored range is always forward with the strand carrying orientation
        let (strand, subject_start, subject_end) = if s_start > s_end {
            (Strand::Reverse, s_end, s_start)
        } else {
            (Strand::Forward, s_start, s_end)
        };

        hits.push(AlignmentHit {
            query_id: fields[0].to_string(),
            subject_id: fields[2].to_string(),
            identity,
            query_coverage,
            score,
            strand,
            query_start,
            query_end,
            subject_start,
            subject_end,
            db_id: db.to_string(),
            algorithm: algorithm.to_string(),
        });
    }

    Ok(hits)
}

/// blastn (megablast task), score-policy filtered
pub struct BlastnAligner {
    app: PathBuf,
    dbs: PathBuf,
    threads: usize,
    verbose: bool,
}

impl Aligner for BlastnAligner {
    fn name(&self) -> &'static str {
        "blastn"
    }

    fn align(
        &self,
        query: &Path,
        db: &str,
        _ref_type: RefType,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let db_path = self.dbs.join(db);
        let has_artifact = ["nsq", "nal"]
            .iter()
            .any(|ext| self.dbs.join(format!("{db}.{ext}")).is_file());
        if !has_artifact {
            return Err(AlignerError::DatabaseNotFound {
                tool: self.name(),
                db: db.to_string(),
                path: db_path,
            });
        }

        let mut cmd = Command::new(&self.app);
        cmd.arg("-task")
            .arg("megablast")
            .arg("-dust")
            .arg("no")
            .arg("-soft_masking")
            .arg("false")
            .arg("-query")
            .arg(query)
            .arg("-db")
            .arg(&db_path)
            .arg("-num_threads")
            .arg(self.threads.to_string())
            .arg("-outfmt")
            .arg("6 qseqid qlen sseqid slen length qstart qend sstart send bitscore evalue pident mismatch gapopen");

        let stdout = run_tool(self.name(), cmd, self.verbose)?;
        let hits = parse_tabular_hits(self.name(), "blastn", &stdout, db, thresholds)?;

        Ok(filter::best_score(hits))
    }
}

/// hs-blastn, same output grammar as blastn, score-policy filtered
pub struct HsBlastnAligner {
    app: PathBuf,
    dbs: PathBuf,
    threads: usize,
    verbose: bool,
}

impl Aligner for HsBlastnAligner {
    fn name(&self) -> &'static str {
        "hsblastn"
    }

    fn align(
        &self,
        query: &Path,
        db: &str,
        _ref_type: RefType,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let db_path = self.dbs.join(db);
        if !self.dbs.join(format!("{db}.bwt")).is_file() {
            return Err(AlignerError::DatabaseNotFound {
                tool: self.name(),
                db: db.to_string(),
                path: db_path,
            });
        }

        let mut cmd = Command::new(&self.app);
        cmd.arg("align")
            .arg("-db")
            .arg(&db_path)
            .arg("-query")
            .arg(query)
            .arg("-num_threads")
            .arg(self.threads.to_string())
            .arg("-outfmt")
            .arg("6");

        let stdout = run_tool(self.name(), cmd, self.verbose)?;
        let hits = parse_tabular_hits(self.name(), "hsblastn", &stdout, db, thresholds)?;

        Ok(filter::best_score(hits))
    }
}

/// gmap/gmapl (chosen by reference size class), Pareto filtered.
///
/// gmap enforces the identity and coverage thresholds itself via
/// `--min-identity` / `--min-trimmed-coverage`; the adapter only parses the
/// compressed summary output.
pub struct GmapAligner {
    app: PathBuf,
    app_large: PathBuf,
    dbs: PathBuf,
    threads: usize,
    verbose: bool,
}

impl GmapAligner {
    fn parse_compressed(
        &self,
        text: &str,
        db: &str,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let mut hits = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // chimeric paths carry no usable single placement
            if line.contains("chimera") {
                continue;
            }

            let line_num = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 11 {
                return Err(AlignerError::InvalidOutput {
                    tool: self.name(),
                    message: format!("line {line_num} has {} fields, expected 11+", fields.len()),
                });
            }

            let query_id = fields[0].trim_start_matches('>').to_string();
            let query_coverage: f64 =
                parse_field(self.name(), line_num, "coverage", fields[5])?;
            let identity: f64 = parse_field(self.name(), line_num, "identity", fields[6])?;

            let (query_start, query_end) =
                parse_range(self.name(), line_num, "query range", fields[7])?;

            // subject field is "<name>:<start>..<end>", reversed on minus strand
            let (subject_id, raw_range) =
                fields[9].split_once(':').ok_or_else(|| AlignerError::InvalidOutput {
                    tool: self.name(),
                    message: format!("line {line_num}: invalid subject field '{}'", fields[9]),
                })?;
            let (s1, s2) = parse_range(self.name(), line_num, "subject range", raw_range)?;

            let strand = match fields[10] {
                "+" => Strand::Forward,
                "-" => Strand::Reverse,
                other => {
                    return Err(AlignerError::InvalidOutput {
                        tool: self.name(),
                        message: format!("line {line_num}: wrong strand '{other}'"),
                    })
                }
            };

            let score = (query_end.saturating_sub(query_start)) as f64 * (identity / 100.0);

            hits.push(AlignmentHit {
                query_id,
                subject_id: subject_id.to_string(),
                identity,
                query_coverage,
                score,
                strand,
                query_start,
                query_end,
                subject_start: s1.min(s2),
                subject_end: s1.max(s2),
                db_id: db.to_string(),
                algorithm: "gmap".to_string(),
            });
        }

        Ok(hits)
    }
}

impl Aligner for GmapAligner {
    fn name(&self) -> &'static str {
        "gmap"
    }

    fn align(
        &self,
        query: &Path,
        db: &str,
        ref_type: RefType,
        thresholds: Thresholds,
    ) -> Result<Vec<AlignmentHit>, AlignerError> {
        let db_path = self.dbs.join(db);
        if !db_path.is_dir() {
            return Err(AlignerError::DatabaseNotFound {
                tool: self.name(),
                db: db.to_string(),
                path: db_path,
            });
        }

        let app = match ref_type {
            RefType::Std => &self.app,
            RefType::Big => &self.app_large,
        };

        let mut cmd = Command::new(app);
        cmd.arg("-Z")
            .arg(format!("--min-identity={}", thresholds.min_identity / 100.0))
            .arg(format!(
                "--min-trimmed-coverage={}",
                thresholds.min_coverage / 100.0
            ))
            .arg("-t")
            .arg(self.threads.to_string())
            .arg("-d")
            .arg(db)
            .arg("-D")
            .arg(&self.dbs)
            .arg(query);

        let stdout = run_tool(self.name(), cmd, self.verbose)?;
        let hits = self.parse_compressed(&stdout, db)?;

        Ok(filter::pareto(hits))
    }
}

fn parse_range(
    tool: &'static str,
    line_num: usize,
    name: &str,
    raw: &str,
) -> Result<(u64, u64), AlignerError> {
    let (a, b) = raw.split_once("..").ok_or_else(|| AlignerError::InvalidOutput {
        tool,
        message: format!("line {line_num}: invalid {name} '{raw}'"),
    })?;

    Ok((
        parse_field(tool, line_num, name, a)?,
        parse_field(tool, line_num, name, b)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABULAR: &str = "\
q1\t100\tchr1H\t600000\t95\t1\t95\t2000\t1906\t180.5\t1e-50\t98.5\t1\t0
q1\t100\tchr2H\t500000\t90\t1\t90\t100\t189\t150.0\t1e-40\t97.0\t2\t0
q2\t80\tchr1H\t600000\t40\t1\t40\t500\t539\t75.0\t1e-10\t99.0\t0\t0
";

    #[test]
    fn test_parse_tabular_strand_and_orientation() {
        let thresholds = Thresholds::new(90.0, 40.0);
        let hits = parse_tabular_hits("blastn", "blastn", TABULAR, "db1", thresholds).unwrap();
        assert_eq!(hits.len(), 3);

        let reverse = &hits[0];
        assert_eq!(reverse.strand, Strand::Reverse);
        assert_eq!(reverse.subject_start, 1906);
        assert_eq!(reverse.subject_end, 2000);

        let forward = &hits[1];
        assert_eq!(forward.strand, Strand::Forward);
        assert_eq!(forward.subject_start, 100);
    }

    #[test]
    fn test_parse_tabular_applies_thresholds() {
        // q2 has coverage 40/80 = 50%; cut at 60%
        let thresholds = Thresholds::new(90.0, 60.0);
        let hits = parse_tabular_hits("blastn", "blastn", TABULAR, "db1", thresholds).unwrap();
        assert!(hits.iter().all(|h| h.query_id == "q1"));
    }

    #[test]
    fn test_parse_tabular_rejects_malformed_line() {
        let err =
            parse_tabular_hits("blastn", "blastn", "q1\tgarbage\n", "db1", Thresholds::new(0.0, 0.0))
                .unwrap_err();
        assert!(matches!(err, AlignerError::InvalidOutput { .. }));
    }

    #[test]
    fn test_parse_compressed_gmap() {
        let aligner = GmapAligner {
            app: PathBuf::from("gmap"),
            app_large: PathBuf::from("gmapl"),
            dbs: PathBuf::from("/dbs"),
            threads: 1,
            verbose: false,
        };

        let text = ">q1 db1 0/0 0 0 95.0 98.2 1..90 90 chr3H:1200..1100 -\n";
        let hits = aligner.parse_compressed(text, "db1").unwrap();
        assert_eq!(hits.len(), 1);

        let hit = &hits[0];
        assert_eq!(hit.query_id, "q1");
        assert_eq!(hit.subject_id, "chr3H");
        assert_eq!(hit.strand, Strand::Reverse);
        assert_eq!(hit.subject_start, 1100);
        assert_eq!(hit.subject_end, 1200);
        assert_eq!(hit.identity, 98.2);
    }

    #[test]
    fn test_parse_compressed_skips_chimera() {
        let aligner = GmapAligner {
            app: PathBuf::from("gmap"),
            app_large: PathBuf::from("gmapl"),
            dbs: PathBuf::from("/dbs"),
            threads: 1,
            verbose: false,
        };

        let hits = aligner.parse_compressed("chimera\n", "db1").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_missing_database_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let aligner = BlastnAligner {
            app: PathBuf::from("blastn"),
            dbs: dir.path().to_path_buf(),
            threads: 1,
            verbose: false,
        };

        let query = dir.path().join("q.fasta");
        std::fs::write(&query, ">q1\nACGT\n").unwrap();

        let err = aligner
            .align(&query, "no_such_db", RefType::Std, Thresholds::new(98.0, 95.0))
            .unwrap_err();
        assert!(matches!(err, AlignerError::DatabaseNotFound { .. }));
    }
}
