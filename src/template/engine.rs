//! Placeholder engine for prompt bodies.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of placeholder `name`
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! Rendering is a single pass over the template body. Substituted values are
//! copied into the output as-is and never scanned again, so a value such as
//! `"{nonexistent}"` appears literally in the result.
//!
//! Undefined placeholders are an error rather than an empty substitution.

use std::collections::HashMap;
use std::fmt;

/// Error type for template parsing and rendering failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder was referenced but no value was provided.
    UndefinedVariable {
        /// The name of the undefined placeholder.
        name: String,
        /// Byte offset in the template where the placeholder starts.
        position: usize,
    },
    /// A `{` was found without a matching `}`.
    UnmatchedBrace {
        /// Byte offset of the unmatched `{`.
        position: usize,
    },
    /// An empty placeholder name was found (e.g., `{}`).
    EmptyVariableName {
        /// Byte offset of the empty placeholder.
        position: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedVariable { name, position } => {
                write!(
                    f,
                    "undefined placeholder '{}' at position {} in template",
                    name, position
                )
            }
            TemplateError::UnmatchedBrace { position } => {
                write!(f, "unmatched '{{' at position {} in template", position)
            }
            TemplateError::EmptyVariableName { position } => {
                write!(
                    f,
                    "empty placeholder name '{{}}' at position {} in template",
                    position
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// One piece of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, already unescaped.
    Literal(String),
    /// A placeholder reference.
    Placeholder {
        /// Trimmed placeholder name.
        name: &'a str,
        /// Byte offset of the opening `{`.
        position: usize,
    },
}

/// Split a template body into literal and placeholder segments.
pub fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    literal.push('{');
                    continue;
                }

                let name_start = pos + 1;
                let name_end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some(_) => {}
                        None => return Err(TemplateError::UnmatchedBrace { position: pos }),
                    }
                };

                let name = template[name_start..name_end].trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyVariableName { position: pos });
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder {
                    name,
                    position: pos,
                });
            }
            '}' => {
                // `}}` collapses to one brace; a lone `}` is kept as-is.
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                literal.push('}');
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

/// Distinct placeholder names referenced by a template, in first-use order.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names: Vec<String> = Vec::new();
    for segment in parse(template)? {
        if let Segment::Placeholder { name, .. } = segment
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Render a template by substituting placeholder values.
///
/// # Examples
///
/// ```ignore
/// let vars = HashMap::from([("topic".to_string(), "AI in healthcare".to_string())]);
/// let prompt = render_template("Topic: {topic}", &vars)?;
/// assert_eq!(prompt, "Topic: AI in healthcare");
/// ```
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let segments = parse(template)?;
    let mut result = String::with_capacity(template.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Placeholder { name, position } => match variables.get(name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(TemplateError::UndefinedVariable {
                        name: name.to_string(),
                        position,
                    });
                }
            },
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let vars = vars([("topic", "AI"), ("platform", "LinkedIn")]);
        let result = render_template("{platform} post about {topic}", &vars).unwrap();
        assert_eq!(result, "LinkedIn post about AI");
    }

    #[test]
    fn test_escape_braces() {
        let result = render_template("Use {{var}} for placeholders", &HashMap::new()).unwrap();
        assert_eq!(result, "Use {var} for placeholders");
    }

    #[test]
    fn test_lone_closing_brace() {
        let result = render_template("a } b }} c", &HashMap::new()).unwrap();
        assert_eq!(result, "a } b } c");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = vars([("topic", "{nonexistent}"), ("context", "{topic}")]);
        let result = render_template("T={topic} C={context}", &vars).unwrap();
        assert_eq!(result, "T={nonexistent} C={topic}");
    }

    #[test]
    fn test_escape_sequences_in_values_are_kept() {
        let vars = vars([("features", "{{double}} and }}")]);
        let result = render_template("{features}", &vars).unwrap();
        assert_eq!(result, "{{double}} and }}");
    }

    #[test]
    fn test_undefined_variable_error() {
        let err = render_template("Hello {name}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "name".to_string(),
                position: 6
            }
        );
    }

    #[test]
    fn test_unmatched_brace_error() {
        let err = render_template("Hello {name", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnmatchedBrace { position: 6 });
    }

    #[test]
    fn test_empty_variable_name_error() {
        let err = render_template("Hello { }", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyVariableName { position: 6 });
    }

    #[test]
    fn test_whitespace_in_variable_name() {
        let vars = vars([("topic", "AI")]);
        assert_eq!(render_template("{ topic }", &vars).unwrap(), "AI");
    }

    #[test]
    fn test_multibyte_positions_are_byte_offsets() {
        let err = render_template("தலைப்பு: {topic}", &HashMap::new()).unwrap_err();
        match err {
            TemplateError::UndefinedVariable { name, position } => {
                assert_eq!(name, "topic");
                assert_eq!(position, "தலைப்பு: ".len());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unicode_values() {
        let vars = vars([("topic", "செயற்கை நுண்ணறிவு")]);
        let result = render_template("தலைப்பு: {topic}", &vars).unwrap();
        assert_eq!(result, "தலைப்பு: செயற்கை நுண்ணறிவு");
    }

    #[test]
    fn test_placeholders_in_first_use_order() {
        let names = placeholders("{keyword} {context} \"{keyword}\" {{literal}}").unwrap();
        assert_eq!(names, vec!["keyword", "context"]);
    }

    #[test]
    fn test_placeholders_propagates_syntax_errors() {
        assert_eq!(
            placeholders("broken {topic").unwrap_err(),
            TemplateError::UnmatchedBrace { position: 7 }
        );
    }

    #[test]
    fn test_parse_segments() {
        let segments = parse("a{x}b").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("a".to_string()),
                Segment::Placeholder {
                    name: "x",
                    position: 1
                },
                Segment::Literal("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_display() {
        let err = TemplateError::UndefinedVariable {
            name: "foo".to_string(),
            position: 10,
        };
        assert_eq!(
            err.to_string(),
            "undefined placeholder 'foo' at position 10 in template"
        );
        let err = TemplateError::UnmatchedBrace { position: 5 };
        assert_eq!(err.to_string(), "unmatched '{' at position 5 in template");
    }
}
