//! Prompt templates.
//!
//! - **Engine**: single-pass `{placeholder}` substitution
//! - **Builtin**: the compiled-in body for each content type and language
//! - **Registry**: the startup-validated (content type, language) -> template table
//!
//! # Template Syntax
//!
//! ```text
//! Topic: {topic}
//!
//! Relevant Information: {context}
//! ```
//!
//! Use `{{` to escape and render a literal `{`.

mod builtin;
pub mod engine;
mod registry;

pub use builtin::builtin_body;
pub use engine::{TemplateError, placeholders, render_template};
pub use registry::{Template, TemplateId, TemplateOverrides, TemplateRegistry, TemplateSource};
