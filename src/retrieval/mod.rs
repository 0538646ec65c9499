//! Context retrieval.
//!
//! A [`ContextRetriever`] turns a query into a context string built from the
//! top-ranked passages of a similarity index. Retrieval is best-effort: when
//! the index is not configured, missing, corrupt, or a search fails, the
//! retriever returns no passages and generation proceeds with empty context.
//!
//! The index is loaded lazily the first time it is needed, at most once per
//! process, through [`LazyRetrievalIndex`].

pub mod build;
pub mod embed;
pub mod index;
pub mod splitter;

use embed::{EmbedError, Embedder};
use index::{IndexError, SemanticSearch, VectorIndex};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use thiserror::Error;

/// Number of passages joined into the context by default.
pub const DEFAULT_TOP_K: usize = 3;

/// Separator placed between passages in the context string.
pub const CONTEXT_SEPARATOR: &str = "\n";

/// A retrieved chunk of text and its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    pub source: String,
    pub score: f32,
}

/// Failure during a similarity search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error("query vector has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Nearest-neighbour lookup over indexed passages.
pub trait PassageSearch: Send + Sync {
    /// Up to `limit` passages most similar to `query`, best first.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Passage>, SearchError>;
}

/// Why retrieval is switched off for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisabledReason {
    /// Retrieval turned off in configuration.
    NotConfigured,
    /// No index file at the configured path.
    Absent(PathBuf),
    /// An index file exists but could not be loaded.
    Unreadable { path: PathBuf, message: String },
    /// The index loaded but no query embedder could be created.
    NoEmbedder(String),
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisabledReason::NotConfigured => write!(f, "retrieval is disabled in configuration"),
            DisabledReason::Absent(path) => write!(f, "no index at '{}'", path.display()),
            DisabledReason::Unreadable { path, message } => {
                write!(f, "index '{}' could not be loaded: {}", path.display(), message)
            }
            DisabledReason::NoEmbedder(message) => {
                write!(f, "no query embedder available: {}", message)
            }
        }
    }
}

/// The process-wide retrieval state: usable, or disabled with a reason.
pub enum RetrievalIndex {
    Available(Box<dyn PassageSearch>),
    Disabled(DisabledReason),
}

impl fmt::Debug for RetrievalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalIndex::Available(_) => f.write_str("Available"),
            RetrievalIndex::Disabled(reason) => f.debug_tuple("Disabled").field(reason).finish(),
        }
    }
}

impl RetrievalIndex {
    /// Load the index at `path`, pairing it with an embedder built for the
    /// index's model by `embedder_for`.
    ///
    /// Never fails: every problem demotes retrieval to disabled. A missing
    /// index is expected and logged at info; an index that exists but cannot
    /// be loaded is logged as an error.
    pub fn load<F>(path: &Path, embedder_for: F) -> Self
    where
        F: FnOnce(&str) -> crate::error::Result<Box<dyn Embedder>>,
    {
        let index = match VectorIndex::load(path) {
            Ok(index) => index,
            Err(IndexError::NotFound(path)) => {
                tracing::info!(path = %path.display(), "no index found, continuing without context");
                return RetrievalIndex::Disabled(DisabledReason::Absent(path));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "index is unreadable, continuing without context");
                return RetrievalIndex::Disabled(DisabledReason::Unreadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        match embedder_for(&index.model) {
            Ok(embedder) => {
                tracing::info!(
                    path = %path.display(),
                    entries = index.len(),
                    model = %index.model,
                    "index loaded"
                );
                RetrievalIndex::Available(Box::new(SemanticSearch::new(index, embedder)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot embed queries, continuing without context");
                RetrievalIndex::Disabled(DisabledReason::NoEmbedder(e.to_string()))
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RetrievalIndex::Available(_))
    }

    pub fn disabled_reason(&self) -> Option<&DisabledReason> {
        match self {
            RetrievalIndex::Available(_) => None,
            RetrievalIndex::Disabled(reason) => Some(reason),
        }
    }
}

type IndexLoader = Box<dyn FnOnce() -> RetrievalIndex + Send>;

/// A [`RetrievalIndex`] loaded on first use.
///
/// The first caller of [`get`](Self::get) runs the loader; concurrent callers
/// block until it finishes and then share the result. The loader never runs
/// twice.
pub struct LazyRetrievalIndex {
    cell: OnceLock<RetrievalIndex>,
    loader: Mutex<Option<IndexLoader>>,
}

impl LazyRetrievalIndex {
    pub fn new<F>(loader: F) -> Self
    where
        F: FnOnce() -> RetrievalIndex + Send + 'static,
    {
        Self {
            cell: OnceLock::new(),
            loader: Mutex::new(Some(Box::new(loader))),
        }
    }

    /// Wrap an index that is already loaded.
    pub fn ready(index: RetrievalIndex) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(index);
        Self {
            cell,
            loader: Mutex::new(None),
        }
    }

    pub fn get(&self) -> &RetrievalIndex {
        self.cell.get_or_init(|| {
            let loader = self
                .loader
                .lock()
                .unwrap_or_else(|poison| poison.into_inner())
                .take();
            match loader {
                Some(load) => load(),
                None => RetrievalIndex::Disabled(DisabledReason::NotConfigured),
            }
        })
    }

    /// Whether the loader has already run.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Retrieves context for a query from a lazily loaded index.
pub struct ContextRetriever {
    index: LazyRetrievalIndex,
    top_k: usize,
}

impl ContextRetriever {
    pub fn new(index: LazyRetrievalIndex, top_k: usize) -> Self {
        Self {
            index,
            top_k: top_k.max(1),
        }
    }

    /// A retriever over an index that is already loaded.
    pub fn with_index(index: RetrievalIndex, top_k: usize) -> Self {
        Self::new(LazyRetrievalIndex::ready(index), top_k)
    }

    /// A retriever that always returns nothing.
    pub fn disabled() -> Self {
        Self::with_index(
            RetrievalIndex::Disabled(DisabledReason::NotConfigured),
            DEFAULT_TOP_K,
        )
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &RetrievalIndex {
        self.index.get()
    }

    /// The top passages for `query`, best first.
    ///
    /// Returns nothing when retrieval is disabled, the query is blank, or the
    /// search fails.
    pub fn retrieve_passages(&self, query: &str) -> Vec<Passage> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let search = match self.index.get() {
            RetrievalIndex::Available(search) => search,
            RetrievalIndex::Disabled(reason) => {
                tracing::debug!(%reason, "retrieval disabled");
                return Vec::new();
            }
        };

        match search.search(query, self.top_k) {
            Ok(mut passages) => {
                passages.sort_by(|a, b| b.score.total_cmp(&a.score));
                passages.truncate(self.top_k);
                tracing::debug!(passages = passages.len(), "retrieved context");
                passages
            }
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed, continuing without context");
                Vec::new()
            }
        }
    }

    /// The top passage texts for `query`, best first.
    pub fn retrieve(&self, query: &str) -> Vec<String> {
        self.retrieve_passages(query)
            .into_iter()
            .map(|p| p.text)
            .collect()
    }

    /// The context string for `query`: passage texts joined in rank order.
    pub fn context_for(&self, query: &str) -> String {
        join_context(&self.retrieve_passages(query))
    }
}

/// Join passage texts into a context string in the order given.
pub fn join_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
