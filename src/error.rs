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

use thiserror::Error;

/// Failures of the template engine. These mean the pattern itself is broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("malformed template '{template}': {reason}")]
    Malformed { template: String, reason: String },

    #[error("unknown variable '{name}' in template '{template}'")]
    UnknownVariable { name: String, template: String },
}

/// Usage errors raised while matching. Unlike divergences they abort the match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("only array and object nodes can contain wildcards, found {kind} at {path}")]
    WildcardOnScalar { path: String, kind: &'static str },

    #[error("failed to evaluate template at {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: TemplateError,
    },

    #[error("maximum depth of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: String, limit: usize },
}
