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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use serde_json::Value;
use std::fmt::Display;
use thiserror::Error;

mod codec;
mod error;
pub mod json_match;
mod predicate;
pub mod template;
mod variables;

pub use codec::Codec;
pub use error::{MatchError, TemplateError};
pub use json_match::divergence::{Divergence, DivergenceKind};
pub use json_match::path::{Key, Path};
pub use json_match::{
    contains_wildcard, find_divergences, is_wildcard, ArrayOrder, Config, WILDCARD,
};
pub use predicate::JsonPattern;
pub use variables::Variables;

use json_match::Indent;

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------------------";

/// Something that can be turned into a JSON value: raw JSON text or an already parsed [`Value`].
pub trait JsonInput {
    /// `param` names the input in error messages, e.g. `"pattern"` or `"actual"`.
    fn into_json(self, codec: &Codec, param: &'static str) -> Result<Value, AssertionError>;
}

impl JsonInput for &str {
    fn into_json(self, codec: &Codec, param: &'static str) -> Result<Value, AssertionError> {
        codec
            .parse(self)
            .map_err(|source| AssertionError::InvalidInput { param, source })
    }
}

impl JsonInput for &String {
    fn into_json(self, codec: &Codec, param: &'static str) -> Result<Value, AssertionError> {
        self.as_str().into_json(codec, param)
    }
}

impl JsonInput for String {
    fn into_json(self, codec: &Codec, param: &'static str) -> Result<Value, AssertionError> {
        self.as_str().into_json(codec, param)
    }
}

impl JsonInput for Value {
    fn into_json(self, _codec: &Codec, _param: &'static str) -> Result<Value, AssertionError> {
        Ok(self)
    }
}

impl JsonInput for &Value {
    fn into_json(self, _codec: &Codec, _param: &'static str) -> Result<Value, AssertionError> {
        Ok(self.clone())
    }
}

/// Builder for JSON assertions.
///
/// # Examples
///
/// ```
/// use json_match::{ArrayOrder, JsonMatch, Variables};
///
/// let mut variables = Variables::new();
/// variables.insert_string("host".to_string(), "example.com".to_string());
///
/// let result = JsonMatch::new()
///     .with_reason("GET /cars: ")
///     .with_array_order(ArrayOrder::Any)
///     .with_variables(variables)
///     .assert(
///         r#"{ "self": "https://{{host}}/cars", "ids": [2, 1, "..."] }"#,
///         r#"{ "self": "https://example.com/cars", "ids": [1, 2, 3] }"#,
///     );
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonMatch<'a> {
    reason: Option<&'a str>,
    config: Config,
    variables: Option<Variables>,
    codec: Codec,
}

impl<'a> JsonMatch<'a> {
    /// Constructs a new builder: ordered arrays, no templates, default [`Codec`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a text put in front of the failure report.
    pub fn with_reason(mut self, reason: &'a str) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_array_order(mut self, array_order: ArrayOrder) -> Self {
        self.config = self.config.array_order(array_order);
        self
    }

    /// Limits how deep the pattern is followed; deeper nodes are a usage error.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config = self.config.max_depth(max_depth);
        self
    }

    /// Sets the variables templates in pattern strings are expanded with.
    ///
    /// Without variables, template syntax in the pattern is compared literally.
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Matches and returns the divergence messages, empty on a match.
    pub fn divergence_messages<P, A>(&self, pattern: P, actual: A) -> Result<Vec<String>, AssertionError>
    where
        P: JsonInput,
        A: JsonInput,
    {
        let pattern = pattern.into_json(&self.codec, "pattern")?;
        let actual = actual.into_json(&self.codec, "actual")?;

        let divergences = find_divergences(&pattern, &actual, &self.config, self.variables.as_ref())?;
        Ok(divergences.iter().map(|d| d.message()).collect())
    }

    /// Matches and turns any divergence into an [`AssertionError::Mismatch`] carrying a full [`Report`].
    pub fn assert<P, A>(&self, pattern: P, actual: A) -> Result<(), AssertionError>
    where
        P: JsonInput,
        A: JsonInput,
    {
        let pattern = pattern.into_json(&self.codec, "pattern")?;
        let actual = actual.into_json(&self.codec, "actual")?;

        let divergences = find_divergences(&pattern, &actual, &self.config, self.variables.as_ref())?;
        if divergences.is_empty() {
            return Ok(());
        }

        Err(AssertionError::Mismatch(Report {
            reason: self.reason.map(str::to_string),
            divergences: divergences.iter().map(|d| d.message()).collect(),
            actual: self.codec.print(&actual),
            pattern: self.codec.print(&pattern),
            scope: self
                .variables
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(Variables::describe),
        }))
    }
}

/// Failure report of a mismatching assertion.
///
/// Lists every divergence and dumps the actual value, the pattern and, if
/// templates were used, the variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    reason: Option<String>,
    divergences: Vec<String>,
    actual: String,
    pattern: String,
    scope: Option<String>,
}

impl Report {
    /// Messages of all divergences, in the order they were found.
    pub fn divergences(&self) -> &[String] {
        &self.divergences
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(reason) = &self.reason {
            write!(f, "{}", reason)?;
        }

        let noun = if self.divergences.len() == 1 {
            "divergence"
        } else {
            "divergences"
        };
        writeln!(
            f,
            "JSON does not match pattern ({} {}):",
            self.divergences.len(),
            noun
        )?;
        for (idx, divergence) in self.divergences.iter().enumerate() {
            writeln!(f, "{}", format!("{}. {}", idx + 1, divergence).indent(2))?;
        }

        write!(
            f,
            "\n{sep}\nActual JSON\n{sep}\n{}\n\n{sep}\nPattern\n{sep}\n{}",
            self.actual,
            self.pattern,
            sep = SEPARATOR
        )?;

        if let Some(scope) = &self.scope {
            write!(f, "\n\n{sep}\nScope\n{sep}\n{}", scope, sep = SEPARATOR)?;
        }

        Ok(())
    }
}

/// Error type for JSON assertions.
#[derive(Error, Debug)]
pub enum AssertionError {
    /// Pattern or actual text is not valid JSON.
    #[error("Failed to parse {param} as JSON: {source}")]
    InvalidInput {
        param: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The pattern cannot be applied, e.g. a template refers to an unknown variable.
    #[error(transparent)]
    Usage(#[from] MatchError),
    /// The actual value does not match the pattern.
    #[error("{0}")]
    Mismatch(Report),
}

/// Asserts that `actual` matches `pattern` with ordered arrays and no templates.
///
/// ```
/// json_match::assert_json_matches(
///     r#"{ "greeting": "Hello, World!", "id": "..." }"#,
///     r#"{ "greeting": "Hello, World!", "id": 12 }"#,
/// )
/// .unwrap();
/// ```
pub fn assert_json_matches<P: JsonInput, A: JsonInput>(
    pattern: P,
    actual: A,
) -> Result<(), AssertionError> {
    JsonMatch::new().assert(pattern, actual)
}

/// Like [`assert_json_matches`], but arrays may be in any order.
pub fn assert_json_matches_any_order<P: JsonInput, A: JsonInput>(
    pattern: P,
    actual: A,
) -> Result<(), AssertionError> {
    JsonMatch::new()
        .with_array_order(ArrayOrder::Any)
        .assert(pattern, actual)
}

/// Like [`assert_json_matches`], expanding templates in pattern strings with `variables`.
pub fn assert_json_matches_with_variables<P: JsonInput, A: JsonInput>(
    pattern: P,
    actual: A,
    variables: Variables,
) -> Result<(), AssertionError> {
    JsonMatch::new()
        .with_variables(variables)
        .assert(pattern, actual)
}

/// Panics with the full failure report unless `actual` matches `pattern`.
///
/// ```
/// json_match::assert_json_match!(r#"[1, "..."]"#, r#"[1, 2, 3]"#);
/// ```
#[macro_export]
macro_rules! assert_json_match {
    ($pattern:expr, $actual:expr $(,)?) => {
        if let Err(err) = $crate::assert_json_matches($pattern, $actual) {
            panic!("{}", err);
        }
    };

    ($pattern:expr, $actual:expr, $variables:expr $(,)?) => {
        if let Err(err) = $crate::assert_json_matches_with_variables($pattern, $actual, $variables) {
            panic!("{}", err);
        }
    };
}
