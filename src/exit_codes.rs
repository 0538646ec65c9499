//! Exit code constants for the scribe CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable files)
//! - 2: Validation failure (required template fields missing or empty)
//! - 3: Configuration failure (bad config, missing credentials, incomplete templates)
//! - 4: Generation failure (backend unreachable, timed out, or rejected the request)
//! - 5: Retrieval unavailable (only surfaced by commands that require an index)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or unreadable input.
pub const USER_ERROR: i32 = 1;

/// Validation failure: a required template field was missing or empty.
pub const VALIDATION_FAILURE: i32 = 2;

/// Configuration failure: invalid config, missing credentials, incomplete template table.
pub const CONFIGURATION_FAILURE: i32 = 3;

/// Generation failure: the completion backend call failed.
pub const GENERATION_FAILURE: i32 = 4;

/// Retrieval unavailable: no usable similarity index.
pub const RETRIEVAL_UNAVAILABLE: i32 = 5;
