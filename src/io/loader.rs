use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AqmError, Result};
use crate::models::{CallRecord, Transcript};

/// One transcript file and the outcome of parsing it
#[derive(Debug)]
pub struct LoadedCall {
    pub source: PathBuf,
    pub transcript: Result<Transcript>,
}

/// List every transcript file in a directory, sorted by file name
///
/// Only regular files whose extension is `json` are returned.
pub fn list_transcript_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AqmError::MissingSourceDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if is_json && path.is_file() {
            files.push(path);
        } else {
            debug!("Ignoring non-transcript entry {:?}", path);
        }
    }

    files.sort();
    Ok(files)
}

/// Parse a transcript file
pub fn parse_transcript_file(path: &Path) -> Result<Transcript> {
    let content = std::fs::read_to_string(path).map_err(|e| AqmError::MalformedTranscript {
        path: path.to_path_buf(),
        reason: format!("failed to read file: {e}"),
    })?;
    parse_transcript_json(&content, path)
}

/// Parse a transcript JSON string; `path` names the source in errors
pub fn parse_transcript_json(json: &str, path: &Path) -> Result<Transcript> {
    let record: CallRecord =
        serde_json::from_str(json).map_err(|e| AqmError::MalformedTranscript {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(Transcript::from_record(record))
}

/// Load every transcript in a directory
///
/// A missing directory is fatal. A file that fails to parse is returned as a
/// failed entry and does not stop the rest of the directory from loading.
pub fn load_transcripts(dir: &Path) -> Result<Vec<LoadedCall>> {
    let files = list_transcript_files(dir)?;
    debug!("Found {} transcript files in {:?}", files.len(), dir);

    let calls = files
        .into_iter()
        .map(|source| {
            let transcript = parse_transcript_file(&source);
            if let Err(e) = &transcript {
                warn!("Skipping transcript: {}", e);
            }
            LoadedCall { source, transcript }
        })
        .collect();

    Ok(calls)
}
