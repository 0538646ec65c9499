use crate::generation::{BackendError, CompletionBackend, GenerationParams};
use crate::retrieval::embed::{EmbedError, Embedder};
use crate::retrieval::{Passage, PassageSearch, SearchError};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global; serialize tests that move it
        // even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Shared record of calls made to a stub.
#[derive(Clone, Default)]
pub(crate) struct CallLog {
    inputs: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    fn record(&self, input: &str) {
        self.inputs.lock().unwrap().push(input.to_string());
    }

    /// Every input received, in call order.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

/// Completion backend that answers from a script instead of the network.
pub(crate) struct StubBackend {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    log: CallLog,
}

impl StubBackend {
    /// Always reply with `text`.
    pub(crate) fn replying(text: &str) -> Self {
        Self::scripted(Vec::new(), Ok(text.to_string()))
    }

    /// Always fail with `message`.
    pub(crate) fn failing(message: &str) -> Self {
        Self::scripted(Vec::new(), Err(message.to_string()))
    }

    /// Answer from `replies` in order, then from `fallback`.
    pub(crate) fn scripted(
        replies: Vec<Result<String, String>>,
        fallback: Result<String, String>,
    ) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback,
            log: CallLog::default(),
        }
    }

    pub(crate) fn calls(&self) -> CallLog {
        self.log.clone()
    }
}

impl CompletionBackend for StubBackend {
    fn complete(&self, prompt: &str, _params: &GenerationParams) -> Result<String, BackendError> {
        self.log.record(prompt);
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.map_err(|message| BackendError::Status {
            status: 503,
            body: message,
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Embedder returning fixed vectors for known texts and a two-dimensional
/// vector derived from the text length otherwise.
pub(crate) struct StubEmbedder {
    model: String,
    vectors: HashMap<String, Vec<f32>>,
    failure: Option<String>,
    batches: Mutex<Vec<usize>>,
}

impl StubEmbedder {
    pub(crate) fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            vectors: HashMap::new(),
            failure: None,
            batches: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new("stub")
        }
    }

    pub(crate) fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Size of every batch received, in call order.
    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }
}

impl Embedder for StubEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if let Some(message) = &self.failure {
            return Err(EmbedError::Transport {
                url: "stub".to_string(),
                message: message.clone(),
            });
        }
        self.batches.lock().unwrap().push(texts.len());
        Ok(texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| vec![text.chars().count() as f32, 1.0])
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Search returning a fixed passage list regardless of the query.
pub(crate) struct StubSearch {
    passages: Vec<Passage>,
    fail: bool,
    log: CallLog,
}

impl StubSearch {
    pub(crate) fn new(passages: Vec<(&str, f32)>) -> Self {
        Self {
            passages: passages
                .into_iter()
                .map(|(text, score)| Passage {
                    text: text.to_string(),
                    source: "stub".to_string(),
                    score,
                })
                .collect(),
            fail: false,
            log: CallLog::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn queries(&self) -> CallLog {
        self.log.clone()
    }
}

impl PassageSearch for StubSearch {
    fn search(&self, query: &str, _limit: usize) -> Result<Vec<Passage>, SearchError> {
        self.log.record(query);
        if self.fail {
            return Err(SearchError::Embed(EmbedError::MalformedResponse(
                "stub search failure".to_string(),
            )));
        }
        // Returned as configured, not ranked.
        Ok(self.passages.clone())
    }
}
