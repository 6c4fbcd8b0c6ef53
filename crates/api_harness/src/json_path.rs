//! Minimal JSON path expressions for response assertions.
//!
//! Supported forms:
//!
//! - `name`, `owner.login` for nested object fields
//! - `errors[0].code`, `[0].name` for array indexing
//! - `size()`, `errors.size()` for the length of an array, object or string
//!
//! `size()` may only appear as the last step.

use std::fmt;

use serde_json::Value;

use crate::errors::HarnessError;

#[cfg(test)]
#[path = "json_path_tests.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Field(String),
    Index(usize),
    Size,
}

/// A parsed path into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    source: String,
    steps: Vec<Step>,
}

impl JsonPath {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::MalformedJsonPath` for empty segments,
    /// unterminated or non-numeric indexes, and `size()` anywhere but the end.
    pub fn parse(source: &str) -> Result<Self, HarnessError> {
        let malformed = |reason: &str| HarnessError::MalformedJsonPath {
            path: source.to_string(),
            reason: reason.to_string(),
        };

        if source.trim().is_empty() {
            return Err(malformed("empty path"));
        }

        let mut steps = Vec::new();
        for (position, segment) in split_segments(source).into_iter().enumerate() {
            if segment.is_empty() {
                return Err(malformed("empty segment"));
            }
            if steps.last() == Some(&Step::Size) {
                return Err(malformed("size() must be the last step"));
            }
            if segment == "size()" {
                steps.push(Step::Size);
                continue;
            }

            let (field, mut indexes) = match segment.find('[') {
                Some(open) => segment.split_at(open),
                None => (segment, ""),
            };
            if field.contains(['(', ')', ']']) {
                return Err(malformed("unexpected character in field name"));
            }
            if !field.is_empty() {
                steps.push(Step::Field(field.to_string()));
            } else if position > 0 {
                return Err(malformed("index must follow a field name"));
            }

            while !indexes.is_empty() {
                let rest = indexes
                    .strip_prefix('[')
                    .ok_or_else(|| malformed("expected '['"))?;
                let close = rest
                    .find(']')
                    .ok_or_else(|| malformed("unterminated index"))?;
                let index = rest[..close]
                    .parse::<usize>()
                    .map_err(|_| malformed("index is not a non-negative integer"))?;
                steps.push(Step::Index(index));
                indexes = &rest[close + 1..];
            }
        }

        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    /// Resolves the path against `root`, returning `None` when any step is
    /// absent or applied to the wrong kind of value.
    pub fn resolve(&self, root: &Value) -> Option<Value> {
        let mut current = root;

        for step in &self.steps {
            match step {
                Step::Field(name) => current = current.as_object()?.get(name)?,
                Step::Index(index) => current = current.as_array()?.get(*index)?,
                Step::Size => {
                    let size = match current {
                        Value::Array(items) => items.len(),
                        Value::Object(fields) => fields.len(),
                        Value::String(text) => text.chars().count(),
                        _ => return None,
                    };
                    return Some(Value::from(size));
                }
            }
        }

        Some(current.clone())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// Splits on dots outside brackets so `a[1].b` yields `a[1]` and `b`.
fn split_segments(source: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                segments.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&source[start..]);
    segments
}
