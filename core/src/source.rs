//! Reads scene records from the corpus formats: `{"corpus": [...]}`, a bare JSON array, or JSONL.
//! Files ending in `.gz` are decompressed on the fly.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{IndexError, Result};
use crate::index::GROUP_DELIMITER;

/// One scene as it appears in the corpus file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    pub play_id: String,
    pub scene_id: String,
    #[serde(default)]
    pub scene_num: Option<u32>,
    pub text: String,
}

impl SceneRecord {
    pub fn new(play_id: &str, scene_id: &str, text: &str) -> Self {
        Self { play_id: play_id.into(), scene_id: scene_id.into(), scene_num: None, text: text.into() }
    }

    /// The scene id must be `<playId>:<local id>`; group search depends on it.
    fn validate(&self, ordinal: usize) -> Result<()> {
        let malformed = |reason: String| IndexError::MalformedDocument { ordinal, reason };
        let (group, _) = self
            .scene_id
            .split_once(GROUP_DELIMITER)
            .ok_or_else(|| malformed(format!("sceneId {:?} has no ':' delimiter", self.scene_id)))?;
        if group != self.play_id {
            return Err(malformed(format!(
                "sceneId {:?} does not belong to play {:?}",
                self.scene_id, self.play_id
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Wrapped { corpus: Vec<SceneRecord> },
    Bare(Vec<SceneRecord>),
}

fn validated(records: Vec<SceneRecord>, offset: usize) -> Result<Vec<SceneRecord>> {
    for (i, rec) in records.iter().enumerate() {
        rec.validate(offset + i + 1)?;
    }
    Ok(records)
}

/// Parse a whole JSON corpus.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<SceneRecord>> {
    let records = match serde_json::from_reader(reader)? {
        CorpusFile::Wrapped { corpus } => corpus,
        CorpusFile::Bare(records) => records,
    };
    validated(records, 0)
}

/// Parse one record per line, skipping blank lines.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<SceneRecord>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    validated(records, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Jsonl,
}

/// Format named by the file name, looking past a trailing `.gz`, and whether it is gzipped.
fn file_kind(p: &Path) -> (Option<Format>, bool) {
    let name = p.file_name().and_then(|s| s.to_str()).unwrap_or_default();
    let (name, gzipped) = match name.strip_suffix(".gz") {
        Some(inner) => (inner, true),
        None => (name, false),
    };
    let format = if name.ends_with(".jsonl") {
        Some(Format::Jsonl)
    } else if name.ends_with(".json") {
        Some(Format::Json)
    } else {
        None
    };
    (format, gzipped)
}

/// Corpus files under `dir` in file-name order. Any unreadable entry fails the whole walk,
/// since skipping a file would shift the ids of every later document.
fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let path = entry?.into_path();
        if path.is_file() && file_kind(&path).0.is_some() {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_file(path: &Path) -> Result<Vec<SceneRecord>> {
    let (format, gzipped) = file_kind(path);
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if gzipped {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    match format.unwrap_or(Format::Json) {
        Format::Jsonl => read_jsonl(reader),
        Format::Json => read_json(reader),
    }
}

/// Load a corpus from a file, a directory of corpus files (in file-name order), or `-` for
/// uncompressed JSON on stdin.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<SceneRecord>> {
    let path = path.as_ref();
    if path == Path::new("-") {
        return read_json(io::stdin().lock());
    }
    if !path.is_dir() {
        return read_file(path);
    }
    let mut records = Vec::new();
    for file in corpus_files(path)? {
        tracing::debug!(file = %file.display(), "reading corpus file");
        let batch = read_file(&file).map_err(|e| match e {
            IndexError::MalformedDocument { ordinal, reason } => {
                IndexError::MalformedDocument { ordinal: records.len() + ordinal, reason }
            }
            other => other,
        })?;
        records.extend(batch);
    }
    tracing::info!(num_records = records.len(), path = %path.display(), "loaded corpus");
    Ok(records)
}
