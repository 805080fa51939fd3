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

use std::fmt;

use crate::{ArrayOrder, AssertionError, JsonMatch, Variables};

/// A JSON pattern usable as a yes/no predicate on JSON text.
///
/// The divergence report is only built when a mismatch is described.
///
/// ```
/// use json_match::JsonPattern;
///
/// let pattern = JsonPattern::new(r#"{ "id": "...", "...": "..." }"#);
/// assert!(pattern.matches(r#"{ "id": 1, "name": "x" }"#));
/// assert!(!pattern.matches(r#"{ "name": "x" }"#));
/// assert!(pattern.describe_mismatch(r#"{}"#).unwrap().contains("Missing property $.id"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonPattern {
    pattern: String,
    matcher: JsonMatch<'static>,
}

impl JsonPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            matcher: JsonMatch::new(),
        }
    }

    /// Compare arrays regardless of element order.
    pub fn any_order(mut self) -> Self {
        self.matcher = self.matcher.with_array_order(ArrayOrder::Any);
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.matcher = self.matcher.with_variables(variables);
        self
    }

    /// `Ok(false)` on divergences; invalid JSON and usage errors are returned as `Err`.
    pub fn try_matches(&self, actual: &str) -> Result<bool, AssertionError> {
        match self.matcher.assert(self.pattern.as_str(), actual) {
            Ok(()) => Ok(true),
            Err(AssertionError::Mismatch(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// True if `actual` matches. Anything that keeps it from matching, including
    /// invalid JSON, counts as no match.
    pub fn matches(&self, actual: &str) -> bool {
        self.try_matches(actual).unwrap_or(false)
    }

    /// Full failure text for `actual`, or `None` if it matches.
    pub fn describe_mismatch(&self, actual: &str) -> Option<String> {
        self.matcher
            .assert(self.pattern.as_str(), actual)
            .err()
            .map(|err| err.to_string())
    }
}

impl fmt::Display for JsonPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matches JSON {}", self.pattern)
    }
}

#[cfg(feature = "predicate-adapter")]
mod adapter {
    use super::JsonPattern;
    use predicates_core::reflection::{Case, PredicateReflection, Product};
    use predicates_core::Predicate;

    impl PredicateReflection for JsonPattern {}

    impl Predicate<str> for JsonPattern {
        fn eval(&self, variable: &str) -> bool {
            self.matches(variable)
        }

        fn find_case<'a>(&'a self, expected: bool, variable: &str) -> Option<Case<'a>> {
            let mismatch = self.describe_mismatch(variable);
            let result = mismatch.is_none();
            if result != expected {
                return None;
            }

            let case = Case::new(Some(self), result);
            Some(match mismatch {
                Some(description) => case.add_product(Product::new("mismatch", description)),
                None => case,
            })
        }
    }
}
