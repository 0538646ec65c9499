//! On-disk similarity index.
//!
//! The index is a single JSON document holding every chunk's text and
//! vector plus the embedding model that produced them. It is written with an
//! atomic rename and loaded as a unit: either the whole file parses and
//! passes validation, or the load fails.
//!
//! Search is exact cosine similarity over all entries, which is plenty for a
//! knowledge base of a few thousand chunks.

use super::embed::{EmbedError, Embedder};
use super::{Passage, PassageSearch, SearchError};
use crate::error::{Result, ScribeError};
use crate::fs::atomic_write;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// On-disk format version written by this build.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Why an index could not be loaded.
#[derive(Error, Debug)]
pub enum IndexError {
    /// No file at the configured path.
    #[error("no index at '{}'", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read index '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// The file is not a valid index document.
    #[error("index '{}' is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

/// One embedded chunk of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Stable identifier, `{source}#{chunk number}`.
    pub id: String,
    /// Where the chunk came from (file path or `sample`).
    pub source: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// A set of embedded chunks plus the metadata needed to query them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    pub version: u32,
    /// Embedding model used for every entry; queries must use the same one.
    pub model: String,
    pub dimension: usize,
    pub created_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Create an empty index for vectors of `dimension` produced by `model`.
    pub fn new(model: impl Into<String>, dimension: usize) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            model: model.into(),
            dimension,
            created_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry; its vector must match the index dimension.
    pub fn push(&mut self, entry: IndexEntry) -> Result<()> {
        if entry.vector.len() != self.dimension {
            return Err(ScribeError::UserError(format!(
                "chunk '{}' has {} dimensions, index expects {}",
                entry.id,
                entry.vector.len(),
                self.dimension
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Load and validate an index file.
    pub fn load(path: &Path) -> std::result::Result<Self, IndexError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IndexError::NotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(IndexError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let index: VectorIndex =
            serde_json::from_str(&content).map_err(|e| IndexError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        index.validate().map_err(|message| IndexError::Corrupt {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(index)
    }

    /// Write the index atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec(self).map_err(|e| {
            ScribeError::UserError(format!("failed to serialize index: {}", e))
        })?;
        atomic_write(path, &json)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.version != INDEX_FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (expected {})",
                self.version, INDEX_FORMAT_VERSION
            ));
        }
        if self.dimension == 0 {
            return Err("dimension must be greater than 0".to_string());
        }
        if let Some(bad) = self
            .entries
            .iter()
            .find(|e| e.vector.len() != self.dimension)
        {
            return Err(format!(
                "entry '{}' has {} dimensions, expected {}",
                bad.id,
                bad.vector.len(),
                self.dimension
            ));
        }
        Ok(())
    }

    /// Entries ranked by cosine similarity to `query`, best first.
    pub fn nearest(&self, query: &[f32], limit: usize) -> Vec<(&IndexEntry, f32)> {
        let mut scored: Vec<(&IndexEntry, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, cosine_similarity(query, &entry.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// A loaded index paired with the embedder that produced it.
pub struct SemanticSearch {
    index: VectorIndex,
    embedder: Box<dyn Embedder>,
}

impl SemanticSearch {
    pub fn new(index: VectorIndex, embedder: Box<dyn Embedder>) -> Self {
        if embedder.model_name() != index.model {
            tracing::warn!(
                index_model = %index.model,
                query_model = embedder.model_name(),
                "query embedder differs from the model the index was built with"
            );
        }
        Self { index, embedder }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

impl PassageSearch for SemanticSearch {
    fn search(&self, query: &str, limit: usize) -> std::result::Result<Vec<Passage>, SearchError> {
        let query_vector = self
            .embedder
            .embed(&[query])?
            .pop()
            .ok_or_else(|| EmbedError::MalformedResponse("no query embedding".to_string()))?;

        if query_vector.len() != self.index.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.index.dimension,
                actual: query_vector.len(),
            });
        }

        Ok(self
            .index
            .nearest(&query_vector, limit)
            .into_iter()
            .map(|(entry, score)| Passage {
                text: entry.text.clone(),
                source: entry.source.clone(),
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubEmbedder;
    use tempfile::TempDir;

    fn entry(id: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            source: "test".to_string(),
            text: format!("passage {}", id),
            vector,
        }
    }

    /// Five passages whose similarity to the query [1, 0] is strictly
    /// decreasing in the order a, b, c, d, e, inserted shuffled.
    fn five_passage_index() -> VectorIndex {
        let mut index = VectorIndex::new("stub", 2);
        index.push(entry("d", vec![0.2, 1.0])).unwrap();
        index.push(entry("a", vec![1.0, 0.0])).unwrap();
        index.push(entry("e", vec![-1.0, 0.1])).unwrap();
        index.push(entry("c", vec![0.6, 0.8])).unwrap();
        index.push(entry("b", vec![0.9, 0.1])).unwrap();
        index
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn nearest_returns_top_three_in_descending_order() {
        let index = five_passage_index();
        let ids: Vec<&str> = index
            .nearest(&[1.0, 0.0], 3)
            .into_iter()
            .map(|(e, _)| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn semantic_search_returns_top_three_passages() {
        let embedder = StubEmbedder::new("stub").with_vector("query", vec![1.0, 0.0]);
        let search = SemanticSearch::new(five_passage_index(), Box::new(embedder));

        let passages = search.search("query", 3).unwrap();
        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["passage a", "passage b", "passage c"]);
        assert!(passages[0].score >= passages[1].score);
        assert!(passages[1].score >= passages[2].score);
    }

    #[test]
    fn semantic_search_rejects_wrong_query_dimension() {
        let embedder = StubEmbedder::new("stub").with_vector("query", vec![1.0, 0.0, 0.0]);
        let search = SemanticSearch::new(five_passage_index(), Box::new(embedder));

        let err = search.search("query", 3).unwrap_err();
        assert!(matches!(
            err,
            SearchError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn push_rejects_wrong_dimension() {
        let mut index = VectorIndex::new("stub", 2);
        assert!(index.push(entry("x", vec![1.0])).is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn save_then_load_preserves_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".scribe").join("index.json");
        let index = five_passage_index();

        index.save(&path).unwrap();
        let loaded = VectorIndex::load(&path).unwrap();

        assert_eq!(loaded, index);
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = VectorIndex::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[test]
    fn load_garbage_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));
    }

    #[test]
    fn load_rejects_inconsistent_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        let mut index = five_passage_index();
        index.entries[2].vector.push(0.5);
        std::fs::write(&path, serde_json::to_string(&index).unwrap()).unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(err.to_string().contains("has 3 dimensions, expected 2"));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        let mut index = five_passage_index();
        index.version = 99;
        std::fs::write(&path, serde_json::to_string(&index).unwrap()).unwrap();

        let err = VectorIndex::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 99"));
    }
}
