//! Log scanning: pull embedded JSON records out of a training log.

use crate::record::EpochRecord;
use regex::Regex;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Matches the embedded JSON object on a log line.
///
/// Greedy: spans from the first `{` to the last `}` on the line, so a line
/// with several independent `{...}` groups produces one (unparseable) match.
/// The log format is one object per line, which keeps this correct in
/// practice.
static EMBEDDED_OBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*\}").unwrap());

/// Scan a log file and collect every parseable embedded record, in file
/// order.
///
/// Lines with no `{...}` substring are skipped silently. Lines whose
/// substring fails to parse as a record (malformed JSON, missing or
/// non-numeric `epoch`) are skipped with a warning. Only I/O failures
/// are errors.
pub fn scan_log(path: &Path) -> Result<Vec<EpochRecord>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = std::io::BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IngestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let Some(m) = EMBEDDED_OBJECT.find(&line) else {
            continue;
        };

        match serde_json::from_str::<EpochRecord>(m.as_str()) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "failed to parse embedded JSON, skipping line");
            }
        }
    }

    Ok(records)
}

#[derive(Debug)]
pub enum IngestError {
    Open { path: PathBuf, source: std::io::Error },
    Read { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Open { path, source } => {
                write!(f, "failed to open {}: {source}", path.display())
            }
            IngestError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Open { source, .. } => Some(source),
            IngestError::Read { source, .. } => Some(source),
        }
    }
}
