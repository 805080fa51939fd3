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

use super::misc::{Indent, Kind, Preview};
use super::path::Path;
use serde_json::Value;
use std::fmt;

/// What went wrong at a location.
#[derive(Debug, Clone, PartialEq)]
pub enum DivergenceKind<'a> {
    /// The actual node is of a different JSON kind than the pattern node.
    TypeMismatch {
        expected: &'a Value,
        actual: &'a Value,
    },
    /// A property listed in the pattern is absent from the actual object.
    MissingProperty { expected: &'a Value },
    /// The actual object has a property the pattern neither lists nor permits.
    UnexpectedProperty { actual: &'a Value },
    /// A pattern array ending in the wildcard requires more elements.
    ArrayTooShort { required: usize, actual: usize },
    /// A pattern array without wildcard requires exactly as many elements.
    ArraySizeMismatch { expected: usize, actual: usize },
    /// Two strings differ and the pattern was compared literally.
    StringMismatch {
        expected: &'a str,
        actual: &'a str,
    },
    /// Two numbers, booleans or nulls differ.
    ValueMismatch {
        expected: &'a Value,
        actual: &'a Value,
    },
    /// A string differs from the expansion of the template in the pattern.
    TemplateMismatch {
        template: &'a str,
        expanded: String,
        actual: &'a str,
    },
    /// No actual element matches the pattern element at `index` (any order).
    ElementNotFound {
        index: usize,
        element: &'a Value,
        wildcard: bool,
    },
}

/// A single mismatch between the pattern and the actual value.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence<'a> {
    pub(crate) path: Path<'a>,
    pub(crate) kind: DivergenceKind<'a>,
}

impl<'a> Divergence<'a> {
    pub(crate) fn new(path: Path<'a>, kind: DivergenceKind<'a>) -> Self {
        Self { path, kind }
    }

    /// Location of the mismatch, following the shape of the pattern.
    pub fn path(&self) -> &Path<'a> {
        &self.path
    }

    pub fn kind(&self) -> &DivergenceKind<'a> {
        &self.kind
    }

    /// The human readable description, identical to the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl<'a> fmt::Display for Divergence<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let path = &self.path;

        match &self.kind {
            DivergenceKind::TypeMismatch { expected, actual } => match expected {
                Value::Array(_) | Value::Object(_) => write!(
                    f,
                    "Type of {} does not match. Expected {} but it was {}",
                    path,
                    expected.kind(),
                    actual.kind()
                ),
                _ => write!(
                    f,
                    "Type of {} does not match. Expected {} ({}) but it was {}",
                    path,
                    expected.kind(),
                    expected.preview(),
                    actual.kind()
                ),
            },
            DivergenceKind::MissingProperty { expected } => write!(
                f,
                "Missing property {}. Expected value: {}",
                path,
                expected.preview()
            ),
            DivergenceKind::UnexpectedProperty { actual } => write!(
                f,
                "Unexpected property {} with value {}",
                path,
                actual.preview()
            ),
            DivergenceKind::ArrayTooShort { required, actual } => write!(
                f,
                "Array {} is too short. Expected at least {} elements but it had {}",
                path, required, actual
            ),
            DivergenceKind::ArraySizeMismatch { expected, actual } => write!(
                f,
                "Size of array {} does not match. Expected {} elements but it had {}",
                path, expected, actual
            ),
            DivergenceKind::StringMismatch { expected, actual } => write!(
                f,
                "Expected {} to be \"{}\" but it was \"{}\"",
                path, expected, actual
            ),
            DivergenceKind::ValueMismatch { expected, actual } => write!(
                f,
                "Expected {} to be {} but it was {}",
                path, expected, actual
            ),
            DivergenceKind::TemplateMismatch {
                template,
                expanded,
                actual,
            } => {
                writeln!(
                    f,
                    "Expected {} to be \"{}\" but it was \"{}\"",
                    path, expanded, actual
                )?;
                writeln!(f, "{}", "Pattern was evaluated as template".indent(8))?;
                write!(f, "{}", format!("Original pattern: \"{}\"", template).indent(8))
            }
            DivergenceKind::ElementNotFound {
                index,
                element,
                wildcard: true,
            } => write!(
                f,
                "Array {} does not contain an element matching pattern element [{}]: {}",
                path,
                index,
                element.preview()
            ),
            DivergenceKind::ElementNotFound {
                index,
                element,
                wildcard: false,
            } => write!(
                f,
                "Array {} cannot be reordered to match the pattern. No element matches pattern element [{}]: {}",
                path,
                index,
                element.preview()
            ),
        }
    }
}
