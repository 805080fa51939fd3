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

use serde_json::Value;

/// Longest preview of a value quoted in a divergence message.
pub(crate) const PREVIEW_LEN: usize = 40;

pub trait Indent {
    fn indent(&self, level: u32) -> String;
}

impl<T> Indent for T
where
    T: ToString,
{
    fn indent(&self, level: u32) -> String {
        let mut indent = String::new();
        for _ in 0..level {
            indent.push(' ');
        }

        self.to_string()
            .lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compact JSON text of a value, cut at [`PREVIEW_LEN`] characters.
pub trait Preview {
    fn preview(&self) -> String;
}

impl Preview for Value {
    fn preview(&self) -> String {
        let text = self.to_string();
        if text.chars().count() <= PREVIEW_LEN {
            return text;
        }

        let mut cut: String = text.chars().take(PREVIEW_LEN).collect();
        cut.push('…');
        cut
    }
}

/// Human readable name of the JSON kind of a value.
pub trait Kind {
    fn kind(&self) -> &'static str;
}

impl Kind for Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
