//! Building a [`VectorIndex`] from source documents.
//!
//! Documents come either from files (directories are walked recursively and
//! filtered through glob patterns) or from the built-in sample knowledge.
//! Each document is split into chunks, chunks are embedded in batches, and the
//! resulting entries are collected into one index.

use super::embed::Embedder;
use super::index::{IndexEntry, VectorIndex};
use super::splitter::TextSplitter;
use crate::error::{Result, ScribeError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Source label used for the built-in sample knowledge.
pub const SAMPLE_SOURCE: &str = "sample";

const SAMPLE_KNOWLEDGE: &str = "\
# Technology Content
Artificial Intelligence is revolutionizing industries by automating tasks and improving decision-making.
Machine Learning algorithms learn from data to make predictions without being explicitly programmed.

# Health Content
Regular exercise improves cardiovascular health and boosts mental well-being.
A balanced diet with proteins, vitamins, and minerals is essential for optimal health.

# Business Content
Digital marketing has transformed how businesses reach their customers.
Social media engagement is crucial for brand building and customer loyalty.

# Education Content
Online learning provides flexibility and access to quality education globally.
Critical thinking skills are essential for success in the modern world.
";

/// A document to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
}

/// The built-in sample knowledge base.
pub fn sample_documents() -> Vec<SourceDocument> {
    vec![SourceDocument {
        source: SAMPLE_SOURCE.to_string(),
        text: SAMPLE_KNOWLEDGE.to_string(),
    }]
}

/// Read every file under `paths` whose path matches one of `include`.
///
/// Files named explicitly are always read. Directories are walked
/// recursively and only matching files are kept. The result is sorted by
/// source path so index builds are reproducible.
pub fn collect_documents(paths: &[PathBuf], include: &[String]) -> Result<Vec<SourceDocument>> {
    let filter = build_globset(include)?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            walk(path, path, &filter, &mut files)?;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(ScribeError::UserError(format!(
                "source '{}' does not exist",
                path.display()
            )));
        }
    }

    files.sort();
    files.dedup();

    files
        .into_iter()
        .map(|file| {
            let text = fs::read_to_string(&file).map_err(|e| {
                ScribeError::UserError(format!("failed to read '{}': {}", file.display(), e))
            })?;
            Ok(SourceDocument {
                source: file.to_string_lossy().replace('\\', "/"),
                text,
            })
        })
        .collect()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            ScribeError::ConfigurationError(format!("invalid include pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| {
        ScribeError::ConfigurationError(format!("failed to build include patterns: {}", e))
    })
}

fn walk(root: &Path, dir: &Path, filter: &GlobSet, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScribeError::UserError(format!("failed to read directory '{}': {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            ScribeError::UserError(format!("failed to read directory '{}': {}", dir.display(), e))
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| {
            ScribeError::UserError(format!("failed to read '{}': {}", path.display(), e))
        })?;

        if file_type.is_dir() {
            walk(root, &path, filter, files)?;
            continue;
        }
        // Linked files are read; linked directories are not walked, so a
        // link cycle cannot repeat the same files under new paths.
        if file_type.is_symlink() && !path.is_file() {
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
            continue;
        }

        // Match relative to the walked root so `docs/**/*.md` style
        // patterns behave the same wherever the root lives.
        let relative = path.strip_prefix(root).unwrap_or(&path);
        if filter.is_match(relative) {
            files.push(path);
        }
    }

    Ok(())
}

/// Splits, embeds, and collects documents into an index.
pub struct IndexBuilder<'a> {
    splitter: TextSplitter,
    embedder: &'a dyn Embedder,
    batch_size: usize,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(splitter: TextSplitter, embedder: &'a dyn Embedder, batch_size: usize) -> Self {
        Self {
            splitter,
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Build an index over `documents`.
    ///
    /// Fails if there is nothing to index or the embedder fails; a partial
    /// index is never returned.
    pub fn build(&self, documents: &[SourceDocument]) -> Result<VectorIndex> {
        let chunks: Vec<(String, &str, String)> = documents
            .iter()
            .flat_map(|doc| {
                self.splitter
                    .split(&doc.text)
                    .into_iter()
                    .enumerate()
                    .map(move |(n, text)| {
                        (format!("{}#{}", doc.source, n), doc.source.as_str(), text)
                    })
            })
            .collect();

        if chunks.is_empty() {
            return Err(ScribeError::UserError(
                "no text to index: every source was empty".to_string(),
            ));
        }

        tracing::info!(
            documents = documents.len(),
            chunks = chunks.len(),
            model = self.embedder.model_name(),
            "building index"
        );

        let mut index: Option<VectorIndex> = None;

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|(_, _, text)| text.as_str()).collect();
            let vectors = self
                .embedder
                .embed(&texts)
                .map_err(|e| ScribeError::UserError(format!("failed to embed chunks: {}", e)))?;

            if vectors.len() != batch.len() {
                return Err(ScribeError::UserError(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }

            for ((id, source, text), vector) in batch.iter().zip(vectors) {
                let target = index.get_or_insert_with(|| {
                    VectorIndex::new(self.embedder.model_name(), vector.len())
                });
                target.push(IndexEntry {
                    id: id.clone(),
                    source: source.to_string(),
                    text: text.clone(),
                    vector,
                })?;
            }
        }

        index.ok_or_else(|| ScribeError::UserError("no text to index".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubEmbedder;
    use tempfile::TempDir;

    fn includes() -> Vec<String> {
        vec!["**/*.txt".to_string(), "**/*.md".to_string()]
    }

    #[test]
    fn sample_knowledge_splits_into_four_topics() {
        let splitter = TextSplitter::new(500, 100).unwrap();
        let docs = sample_documents();
        let chunks = splitter.split(&docs[0].text);

        assert!(!chunks.is_empty());
        let all = chunks.join("\n");
        for topic in ["Technology", "Health", "Business", "Education"] {
            assert!(all.contains(topic), "missing {}", topic);
        }
        assert!(chunks.iter().all(|c| c.chars().count() <= 500));
    }

    #[test]
    fn collect_walks_directories_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("nested").join("b.md"), "beta").unwrap();
        fs::write(root.join("nested").join("skip.json"), "{}").unwrap();

        let docs = collect_documents(&[root.to_path_buf()], &includes()).unwrap();

        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "beta"]);
    }

    #[test]
    fn explicit_files_bypass_the_filter() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("notes.json");
        fs::write(&file, "gamma").unwrap();

        let docs = collect_documents(&[file], &includes()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "gamma");
    }

    #[test]
    fn missing_source_is_user_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = collect_documents(&[temp_dir.path().join("nope")], &includes()).unwrap_err();
        assert!(matches!(err, ScribeError::UserError(_)));
    }

    #[test]
    fn invalid_pattern_is_configuration_error() {
        let err = collect_documents(&[], &["[".to_string()]).unwrap_err();
        assert!(matches!(err, ScribeError::ConfigurationError(_)));
    }

    #[test]
    fn build_embeds_every_chunk_in_batches() {
        let embedder = StubEmbedder::new("stub-model");
        let builder = IndexBuilder::new(TextSplitter::new(4, 0).unwrap(), &embedder, 2);
        let docs = vec![
            SourceDocument {
                source: "one".to_string(),
                text: "aa\n\nbb\n\ncc".to_string(),
            },
            SourceDocument {
                source: "two".to_string(),
                text: "dd".to_string(),
            },
        ];

        let index = builder.build(&docs).unwrap();

        assert_eq!(index.model, "stub-model");
        let ids: Vec<&str> = index.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["one#0", "one#1", "one#2", "two#0"]);
        assert_eq!(embedder.batch_sizes(), vec![2, 2]);
    }

    #[test]
    fn build_with_no_text_fails() {
        let embedder = StubEmbedder::new("stub-model");
        let builder = IndexBuilder::new(TextSplitter::new(500, 100).unwrap(), &embedder, 8);
        let docs = vec![SourceDocument {
            source: "empty".to_string(),
            text: "  \n\n ".to_string(),
        }];

        assert!(builder.build(&docs).is_err());
        assert!(embedder.batch_sizes().is_empty());
    }

    #[test]
    fn embedder_failure_is_a_user_error() {
        let embedder = StubEmbedder::failing("model offline");
        let builder = IndexBuilder::new(TextSplitter::new(500, 100).unwrap(), &embedder, 8);

        let err = builder.build(&sample_documents()).unwrap_err();
        match err {
            ScribeError::UserError(ref message) => {
                assert!(message.contains("failed to embed chunks"));
                assert!(message.contains("model offline"));
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_cycle_is_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("a.txt"), "Only once.").unwrap();
        std::os::unix::fs::symlink(&docs, docs.join("loop")).unwrap();

        let found = collect_documents(&[docs], &["**/*.txt".to_string()]).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Only once.");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_read() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        let outside = temp_dir.path().join("outside.txt");
        fs::write(&outside, "Linked notes.").unwrap();
        std::os::unix::fs::symlink(&outside, docs.join("linked.txt")).unwrap();

        let found = collect_documents(&[docs], &["**/*.txt".to_string()]).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Linked notes.");
    }
}
