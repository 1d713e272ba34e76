//! Request corpus reading
//!
//! The corpus is JSON Lines: one self-describing record per line, holding
//! the request payload under a `request` key (`body` is accepted as an
//! alias for older corpora). Records without a usable payload are skipped
//! while still consuming their ordinal, so scenario ids always match line
//! numbers.

use crate::error::CorpusReadError;
use crate::types::{RequestPayload, Scenario, ScenarioId};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One corpus record; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    #[serde(default)]
    request: Option<Value>,
    // Alias used by older corpora.
    #[serde(default)]
    body: Option<Value>,
}

impl CorpusRecord {
    fn into_payload(self) -> Option<Value> {
        self.request.or(self.body).filter(|v| !v.is_null())
    }
}

/// Lazy, restartable reader over a JSONL request corpus
///
/// `scenarios` reopens the file on every call, so the sequence can be
/// traversed more than once.
#[derive(Debug, Clone)]
pub struct CorpusReader {
    path: PathBuf,
}

impl CorpusReader {
    /// Create reader for a corpus file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Corpus file location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the corpus and return a lazy scenario iterator
    ///
    /// # Errors
    /// `CorpusReadError::Open` if the file cannot be opened. This is the
    /// only corpus error fatal to a run; per-line errors are yielded by
    /// the iterator instead.
    pub fn scenarios(&self) -> Result<ScenarioIter, CorpusReadError> {
        let file = File::open(&self.path).map_err(|source| CorpusReadError::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(ScenarioIter {
            lines: BufReader::new(file).lines(),
            next_ordinal: 0,
        })
    }
}

/// Iterator over corpus scenarios
///
/// Yields `Ok(Some(_))` for usable records, `Ok(None)` for skippable ones
/// (blank line, no request payload) and `Err(_)` for lines that cannot be
/// read or parsed. Every yielded item consumes exactly one ordinal.
#[derive(Debug)]
pub struct ScenarioIter {
    lines: Lines<BufReader<File>>,
    next_ordinal: u64,
}

impl Iterator for ScenarioIter {
    type Item = Result<Option<Scenario>, CorpusReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        let line = match line {
            Ok(line) => line,
            Err(source) => {
                return Some(Err(CorpusReadError::Read {
                    line: ordinal,
                    source,
                }))
            }
        };

        if line.trim().is_empty() {
            return Some(Ok(None));
        }

        let record: CorpusRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(CorpusReadError::Parse {
                    line: ordinal,
                    source,
                }))
            }
        };

        match record.into_payload() {
            Some(payload) => Some(Ok(Some(Scenario {
                id: ScenarioId(ordinal),
                request: RequestPayload::new(payload),
            }))),
            None => {
                tracing::debug!(line = ordinal, "corpus record has no usable request, skipping");
                Some(Ok(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_scenarios_in_order() {
        let file = corpus_file(concat!(
            r#"{"request":{"query":"{a}","variables":{}}}"#,
            "\n",
            r#"{"request":{"query":"{b}","variables":{"x":1}}}"#,
            "\n",
        ));
        let reader = CorpusReader::new(file.path());

        let scenarios: Vec<_> = reader
            .scenarios()
            .unwrap()
            .map(|entry| entry.unwrap().unwrap())
            .collect();

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].id, ScenarioId(0));
        assert_eq!(scenarios[1].id, ScenarioId(1));
        assert_eq!(
            scenarios[1].request.as_value()["variables"]["x"],
            serde_json::json!(1)
        );
    }

    #[test]
    fn skipped_records_still_consume_their_ordinal() {
        let file = corpus_file(concat!(
            r#"{"note":"no request here"}"#,
            "\n",
            r#"{"request":{"query":"{a}"}}"#,
            "\n",
        ));
        let reader = CorpusReader::new(file.path());

        let entries: Vec<_> = reader.scenarios().unwrap().collect();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], Ok(None)));

        let second = entries[1].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(second.id, ScenarioId(1));
    }

    #[test]
    fn blank_lines_are_skips() {
        let file = corpus_file("\n{\"request\":{\"query\":\"{a}\"}}\n");
        let reader = CorpusReader::new(file.path());

        let entries: Vec<_> = reader.scenarios().unwrap().collect();
        assert!(matches!(entries[0], Ok(None)));
        assert!(matches!(entries[1], Ok(Some(_))));
    }

    #[test]
    fn body_alias_is_accepted() {
        let file = corpus_file("{\"body\":{\"query\":\"{a}\"}}\n");
        let reader = CorpusReader::new(file.path());

        let entries: Vec<_> = reader.scenarios().unwrap().collect();
        let scenario = entries[0].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(scenario.request.as_value()["query"], "{a}");
    }

    #[test]
    fn unparseable_line_yields_parse_error_with_ordinal() {
        let file = corpus_file("{\"request\":{\"query\":\"{a}\"}}\nnot json\n");
        let reader = CorpusReader::new(file.path());

        let entries: Vec<_> = reader.scenarios().unwrap().collect();
        assert!(matches!(entries[0], Ok(Some(_))));
        assert!(matches!(
            entries[1],
            Err(CorpusReadError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn missing_corpus_is_fatal_open_error() {
        let reader = CorpusReader::new("/nonexistent/corpus.jsonl");
        let err = reader.scenarios().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn reader_is_restartable() {
        let file = corpus_file("{\"request\":{\"query\":\"{a}\"}}\n");
        let reader = CorpusReader::new(file.path());

        let first: Vec<_> = reader.scenarios().unwrap().collect();
        let second: Vec<_> = reader.scenarios().unwrap().collect();
        assert_eq!(first.len(), second.len());
    }
}
