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

pub mod divergence;
mod misc;
pub mod path;

pub(crate) use misc::Indent;

use divergence::{Divergence, DivergenceKind};
use misc::Kind;
use path::{Key, Path};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::MatchError;
use crate::template::string_matches;
use crate::variables::Variables;

/// Reserved string meaning "anything" in a value position, "any further
/// elements" as the last array element and "any further properties" as an
/// object key mapped to itself.
pub const WILDCARD: &str = "...";

/// How arrays in the pattern are compared with arrays in the actual value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ArrayOrder {
    /// Element `i` of the pattern is compared with element `i` of the actual array.
    #[default]
    Ordered,
    /// Every pattern element must match some element of the actual array.
    Any,
}

/// Configuration for how a pattern is matched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub(crate) array_order: ArrayOrder,
    pub(crate) max_depth: Option<usize>,
}

impl Config {
    /// Create a new [`Config`] with ordered arrays and no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the config's array order.
    pub fn array_order(mut self, array_order: ArrayOrder) -> Self {
        self.array_order = array_order;
        self
    }

    /// Refuse to descend deeper than `max_depth` path steps below the root.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// True if the node is the bare wildcard string.
pub fn is_wildcard(node: &Value) -> bool {
    node.as_str() == Some(WILDCARD)
}

/// Checks whether a container permits additional elements or properties.
///
/// Arrays do when their last element is the wildcard, objects when they map
/// the wildcard key to the wildcard. Any other node is a usage error.
pub fn contains_wildcard(node: &Value) -> Result<bool, MatchError> {
    match node {
        Value::Array(arr) => Ok(arr.last().is_some_and(is_wildcard)),
        Value::Object(obj) => Ok(has_wildcard_key(obj)),
        other => Err(MatchError::WildcardOnScalar {
            path: Path::Root.to_string(),
            kind: other.kind(),
        }),
    }
}

fn has_wildcard_key(obj: &Map<String, Value>) -> bool {
    obj.get(WILDCARD).is_some_and(is_wildcard)
}

/// Matches `actual` against `pattern` and returns every divergence found.
///
/// An empty list means the values match. Usage errors, such as a broken
/// template in the pattern, abort the match and are returned as `Err`.
pub fn find_divergences<'a>(
    pattern: &'a Value,
    actual: &'a Value,
    config: &Config,
    scope: Option<&Variables>,
) -> Result<Vec<Divergence<'a>>, MatchError> {
    debug!(
        array_order = ?config.array_order,
        templates = scope.is_some(),
        "matching JSON against pattern"
    );

    let mut acc = vec![];
    match_with(pattern, actual, config, scope, Path::Root, &mut acc)?;

    debug!(divergences = acc.len(), "finished matching");
    Ok(acc)
}

fn match_with<'a>(
    pattern: &'a Value,
    actual: &'a Value,
    config: &Config,
    scope: Option<&Variables>,
    path: Path<'a>,
    acc: &mut Vec<Divergence<'a>>,
) -> Result<(), MatchError> {
    if let Some(limit) = config.max_depth {
        if path.depth() > limit {
            return Err(MatchError::DepthLimitExceeded {
                path: path.to_string(),
                limit,
            });
        }
    }

    let mut folder = MatchFolder {
        actual,
        path,
        acc,
        config,
        scope,
    };

    fold_pattern(pattern, &mut folder)
}

#[derive(Debug)]
struct MatchFolder<'a, 'b> {
    actual: &'a Value,
    path: Path<'a>,
    acc: &'b mut Vec<Divergence<'a>>,
    config: &'b Config,
    scope: Option<&'b Variables>,
}

impl<'a, 'b> MatchFolder<'a, 'b> {
    fn push(&mut self, path: Path<'a>, kind: DivergenceKind<'a>) {
        self.acc.push(Divergence::new(path, kind));
    }

    fn on_type_mismatch(&mut self, pattern: &'a Value) {
        self.push(
            self.path.clone(),
            DivergenceKind::TypeMismatch {
                expected: pattern,
                actual: self.actual,
            },
        );
    }

    fn on_scalar(&mut self, pattern: &'a Value) {
        if pattern.to_string() != self.actual.to_string() {
            self.push(
                self.path.clone(),
                DivergenceKind::ValueMismatch {
                    expected: pattern,
                    actual: self.actual,
                },
            );
        }
    }

    fn on_string(&mut self, pattern: &'a str, actual: &'a str) -> Result<(), MatchError> {
        if let Some(divergence) = string_matches(pattern, actual, self.scope, &self.path)? {
            self.acc.push(divergence);
        }
        Ok(())
    }

    fn on_object(
        &mut self,
        pattern: &'a Map<String, Value>,
        actual: &'a Map<String, Value>,
    ) -> Result<(), MatchError> {
        let wildcard = has_wildcard_key(pattern);

        for (key, expected) in pattern.iter() {
            if wildcard && key == WILDCARD {
                continue;
            }

            let path = self.path.append(Key::Field(key));
            match actual.get(key) {
                Some(actual) => {
                    match_with(expected, actual, self.config, self.scope, path, self.acc)?
                }
                None => self.push(path, DivergenceKind::MissingProperty { expected }),
            }
        }

        if !wildcard {
            for (key, actual) in actual.iter() {
                if !pattern.contains_key(key) {
                    let path = self.path.append(Key::Field(key));
                    self.push(path, DivergenceKind::UnexpectedProperty { actual });
                }
            }
        }

        Ok(())
    }

    fn on_array(&mut self, pattern: &'a [Value], actual: &'a [Value]) -> Result<(), MatchError> {
        let wildcard = pattern.last().is_some_and(is_wildcard);
        let required = if wildcard {
            pattern.len() - 1
        } else {
            pattern.len()
        };

        if wildcard && actual.len() < required {
            self.push(
                self.path.clone(),
                DivergenceKind::ArrayTooShort {
                    required,
                    actual: actual.len(),
                },
            );
        } else if !wildcard && actual.len() != pattern.len() {
            self.push(
                self.path.clone(),
                DivergenceKind::ArraySizeMismatch {
                    expected: pattern.len(),
                    actual: actual.len(),
                },
            );
        }

        let required = &pattern[..required];
        match self.config.array_order {
            ArrayOrder::Ordered => {
                for (idx, (expected, actual)) in required.iter().zip(actual.iter()).enumerate() {
                    let path = self.path.append(Key::Idx(idx));
                    match_with(expected, actual, self.config, self.scope, path, self.acc)?;
                }
            }
            ArrayOrder::Any => {
                for (idx, expected) in required.iter().enumerate() {
                    let path = self.path.append(Key::Idx(idx));
                    if !self.found_in_any_order(expected, actual, &path)? {
                        self.push(
                            self.path.clone(),
                            DivergenceKind::ElementNotFound {
                                index: idx,
                                element: expected,
                                wildcard,
                            },
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// True if some element of `actual` matches `expected` without divergences.
    ///
    /// Divergences of the probes are dropped; the first clean match wins and
    /// an actual element may serve as witness for several pattern elements.
    fn found_in_any_order(
        &self,
        expected: &'a Value,
        actual: &'a [Value],
        path: &Path<'a>,
    ) -> Result<bool, MatchError> {
        for (candidate_idx, candidate) in actual.iter().enumerate() {
            let mut probe = vec![];
            match_with(
                expected,
                candidate,
                self.config,
                self.scope,
                path.clone(),
                &mut probe,
            )?;

            if probe.is_empty() {
                trace!(%path, candidate = candidate_idx, "pattern element found");
                return Ok(true);
            }
        }

        trace!(%path, "pattern element not found in any order");
        Ok(false)
    }
}

fn fold_pattern<'a>(pattern: &'a Value, folder: &mut MatchFolder<'a, '_>) -> Result<(), MatchError> {
    if is_wildcard(pattern) {
        return Ok(());
    }

    match (pattern, folder.actual) {
        (Value::Object(expected), Value::Object(actual)) => folder.on_object(expected, actual),
        (Value::Array(expected), Value::Array(actual)) => folder.on_array(expected, actual),
        (Value::String(expected), Value::String(actual)) => folder.on_string(expected, actual),
        (Value::Number(_), Value::Number(_))
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Null, Value::Null) => {
            folder.on_scalar(pattern);
            Ok(())
        }
        _ => {
            folder.on_type_mismatch(pattern);
            Ok(())
        }
    }
}
