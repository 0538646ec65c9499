//! Filesystem utilities: atomic writes for the index, config, and output files.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
