//! Character-based text splitting for index building.
//!
//! Text is cut on blank lines (lines holding only whitespace count as blank),
//! then the pieces are greedily merged back into chunks of at most
//! `chunk_size` characters. Consecutive chunks share trailing pieces totalling
//! no more than `chunk_overlap` characters, so a sentence near a chunk boundary
//! is retrievable from either side.
//!
//! A single piece longer than `chunk_size` becomes its own oversized chunk;
//! pieces are never cut mid-paragraph.

use crate::error::{Result, ScribeError};
use regex::Regex;
use std::collections::VecDeque;

const PIECE_JOINER: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: Regex,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ScribeError::ConfigurationError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(ScribeError::ConfigurationError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        let separator = Regex::new(r"\n\s*\n").map_err(|e| {
            ScribeError::ConfigurationError(format!("invalid separator pattern: {}", e))
        })?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separator,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into overlapping chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = self
            .separator
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        self.merge(&pieces)
    }

    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let joiner_len = PIECE_JOINER.chars().count();
        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        // Length of `current` once a piece of `len` chars is appended.
        let grown = |total: usize, current_len: usize, len: usize| {
            total + len + if current_len > 0 { joiner_len } else { 0 }
        };

        for &piece in pieces {
            let len = piece.chars().count();

            if grown(total, current.len(), len) > self.chunk_size && !current.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        chars = total,
                        chunk_size = self.chunk_size,
                        "created a chunk larger than chunk_size"
                    );
                }
                chunks.push(join(&current));

                // Drop leading pieces until what remains fits as overlap and
                // leaves room for the next piece.
                while total > self.chunk_overlap
                    || (total > 0 && grown(total, current.len(), len) > self.chunk_size)
                {
                    let Some((_, front_len)) = current.pop_front() else {
                        break;
                    };
                    total -= front_len + if current.is_empty() { 0 } else { joiner_len };
                }
            }

            total = grown(total, current.len(), len);
            current.push_back((piece, len));
        }

        if !current.is_empty() {
            chunks.push(join(&current));
        }

        chunks
    }
}

fn join(pieces: &VecDeque<(&str, usize)>) -> String {
    pieces
        .iter()
        .map(|(p, _)| *p)
        .collect::<Vec<_>>()
        .join(PIECE_JOINER)
}
