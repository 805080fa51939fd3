// Copyright 2024 The json-match Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mustache-style templates inside pattern strings.
//!
//! Only variable interpolation is supported: `{{ name }}` or `{{ a.b.0 }}`.
//! Sections, partials and comments are rejected as malformed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::error::{MatchError, TemplateError};
use crate::json_match::divergence::{Divergence, DivergenceKind};
use crate::json_match::path::Path;
use crate::variables::Variables;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// `{{{ name }}}` first, so the triple form is not read as `{` + `{{ name }}`.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{\s*([^{}]*?)\s*\}\}\}|\{\{\s*([^{}]*?)\s*\}\}").unwrap()
});
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*(\.[A-Za-z0-9_\-]+)*$").unwrap()
});

/// Cheap check run before the template engine is started.
///
/// `false` means the text is certainly not a template, `true` only means it might be one.
pub fn is_potential_template(text: &str) -> bool {
    text.contains(OPEN) && text.contains(CLOSE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
}

/// A parsed template, ready to be rendered against [`Variables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = vec![];
        let mut last = 0;

        for caps in TAG_PATTERN.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            let before = &source[last..whole.start()];
            if before.ends_with('{') {
                return Err(TemplateError::Malformed {
                    template: source.to_string(),
                    reason: format!("stray '{{' before '{}'", whole.as_str()),
                });
            }
            push_text(source, before, &mut segments)?;

            let expression = caps.get(1).or(caps.get(2)).map_or("", |m| m.as_str());
            if !NAME_PATTERN.is_match(expression) {
                return Err(TemplateError::Malformed {
                    template: source.to_string(),
                    reason: format!("'{}' is not a variable name", whole.as_str()),
                });
            }

            segments.push(Segment::Variable(expression.to_string()));
            last = whole.end();
        }

        push_text(source, &source[last..], &mut segments)?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Expands every tag. A name that does not resolve is an error, not an empty string.
    pub fn render(&self, variables: &Variables) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value =
                        variables
                            .lookup(name)
                            .ok_or_else(|| TemplateError::UnknownVariable {
                                name: name.clone(),
                                template: self.source.clone(),
                            })?;
                    render_value(value, &mut out);
                }
            }
        }

        Ok(out)
    }
}

fn push_text(source: &str, text: &str, segments: &mut Vec<Segment>) -> Result<(), TemplateError> {
    if text.contains(OPEN) {
        return Err(TemplateError::Malformed {
            template: source.to_string(),
            reason: format!("unclosed tag in '{}'", text),
        });
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }

    Ok(())
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

/// Compiles and renders `template` in one step.
pub fn expand(template: &str, variables: &Variables) -> Result<String, TemplateError> {
    Template::compile(template)?.render(variables)
}

/// Compares a pattern string with an actual string at `path`.
///
/// With a scope and a pattern that looks like a template, the pattern is
/// expanded first; otherwise both are compared literally.
pub(crate) fn string_matches<'a>(
    pattern: &'a str,
    actual: &'a str,
    scope: Option<&Variables>,
    path: &Path<'a>,
) -> Result<Option<Divergence<'a>>, MatchError> {
    match scope {
        Some(variables) if is_potential_template(pattern) => {
            let expanded = expand(pattern, variables).map_err(|source| MatchError::Template {
                path: path.to_string(),
                source,
            })?;
            trace!(%path, template = pattern, %expanded, "expanded template");

            if actual == expanded {
                return Ok(None);
            }

            Ok(Some(Divergence::new(
                path.clone(),
                DivergenceKind::TemplateMismatch {
                    template: pattern,
                    expanded,
                    actual,
                },
            )))
        }
        _ if actual != pattern => Ok(Some(Divergence::new(
            path.clone(),
            DivergenceKind::StringMismatch {
                expected: pattern,
                actual,
            },
        ))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json_match::path::Key;
    use serde_json::json;

    fn scope(json: Value) -> Variables {
        Variables::from_json(&json).unwrap()
    }

    #[test]
    fn test_potential_template() {
        assert!(is_potential_template("Hello {{name}}"));
        assert!(is_potential_template("}} {{"));
        assert!(!is_potential_template("Hello {name}"));
        assert!(!is_potential_template("{{ only open"));
    }

    #[test]
    fn test_expand_variables() {
        let variables = scope(json!({
            "name": "World",
            "car": { "id": 7, "tags": ["a", "b"] },
            "nothing": null,
            "ok": true
        }));

        assert_eq!(expand("Hello {{name}}", &variables).unwrap(), "Hello World");
        assert_eq!(expand("{{ name }}!", &variables).unwrap(), "World!");
        assert_eq!(expand("/cars/{{car.id}}", &variables).unwrap(), "/cars/7");
        assert_eq!(expand("{{car.tags.1}}", &variables).unwrap(), "b");
        assert_eq!(expand("[{{nothing}}]", &variables).unwrap(), "[]");
        assert_eq!(expand("{{ok}}", &variables).unwrap(), "true");
        assert_eq!(expand("{{car.tags}}", &variables).unwrap(), "[\"a\",\"b\"]");
        assert_eq!(expand("no tags", &variables).unwrap(), "no tags");
    }

    #[test]
    fn test_unknown_variable() {
        let err = expand("{{protocol}}://{{host}}", &scope(json!({"protocol": "https"})));

        assert_eq!(
            err,
            Err(TemplateError::UnknownVariable {
                name: "host".to_string(),
                template: "{{protocol}}://{{host}}".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed() {
        let variables = scope(json!({"a": 1}));

        assert!(matches!(
            expand("{{a}} and {{", &variables),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            expand("{{}}", &variables),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            expand("{{#a}}x{{/a}}", &variables),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            expand("{{{a}}", &variables),
            Err(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            expand("{{{{a}}}}", &variables),
            Err(TemplateError::Malformed { .. })
        ));
    }

    #[test]
    fn test_triple_braces() {
        let variables = scope(json!({"name": "World", "id": 7}));

        assert_eq!(expand("{{{name}}}", &variables).unwrap(), "World");
        assert_eq!(expand("Hi {{{ name }}}!", &variables).unwrap(), "Hi World!");
        assert_eq!(expand(r#"{"id":{{id}}}"#, &variables).unwrap(), r#"{"id":7}"#);
        assert!(matches!(
            expand("{{{missing}}}", &variables),
            Err(TemplateError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_string_matches_literal_without_scope() {
        let path = Path::Root.append(Key::Field("greeting"));

        assert_eq!(
            string_matches("Hello {{name}}", "Hello {{name}}", None, &path),
            Ok(None)
        );

        let divergence = string_matches("Hello {{name}}", "Hello World", None, &path)
            .unwrap()
            .unwrap();
        assert_eq!(
            divergence.message(),
            "Expected $.greeting to be \"Hello {{name}}\" but it was \"Hello World\""
        );
    }

    #[test]
    fn test_string_matches_template() {
        let path = Path::Root.append(Key::Field("greeting"));
        let world = scope(json!({"name": "World"}));
        let mars = scope(json!({"name": "Mars"}));

        assert_eq!(
            string_matches("Hello {{name}}", "Hello World", Some(&world), &path),
            Ok(None)
        );

        let divergence = string_matches("Hello {{name}}", "Hello World", Some(&mars), &path)
            .unwrap()
            .unwrap();
        let message = divergence.message();
        assert!(message.contains("\"Hello Mars\""));
        assert!(message.contains("Original pattern: \"Hello {{name}}\""));
    }

    #[test]
    fn test_string_matches_template_error_is_usage_error() {
        let path = Path::Root.append(Key::Idx(2));
        let result = string_matches("{{nope}}", "x", Some(&Variables::new()), &path);

        assert!(matches!(
            result,
            Err(MatchError::Template { ref path, .. }) if path == "$[2]"
        ));
    }
}
