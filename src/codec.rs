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

/// Options for turning JSON text into values and values back into text.
///
/// Unknown fields are always accepted, since values are untyped trees.
///
/// # Examples
///
/// ```
/// use json_match::Codec;
///
/// let codec = Codec::new().pretty_print(false);
/// let value = codec.parse(r#"{ "a": 1, /* ignored */ "b": null }"#).unwrap();
/// assert_eq!(codec.print(&value), r#"{"a":1}"#);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Codec {
    allow_comments: bool,
    pretty_print: bool,
    omit_nulls: bool,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            allow_comments: true,
            pretty_print: true,
            omit_nulls: true,
        }
    }
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `//` and `/* */` comments in parsed text.
    pub fn allow_comments(mut self, allow_comments: bool) -> Self {
        self.allow_comments = allow_comments;
        self
    }

    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    /// Leave out object members whose value is `null` when printing.
    pub fn omit_nulls(mut self, omit_nulls: bool) -> Self {
        self.omit_nulls = omit_nulls;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Value, serde_json::Error> {
        if self.allow_comments {
            serde_json::from_str(&strip_comments(text))
        } else {
            serde_json::from_str(text)
        }
    }

    pub fn print(&self, value: &Value) -> String {
        let stripped;
        let value = if self.omit_nulls {
            stripped = without_nulls(value);
            &stripped
        } else {
            value
        };

        if self.pretty_print {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        } else {
            value.to_string()
        }
    }
}

/// Removes comments outside of string literals. Line breaks are kept so that
/// parse errors still point at the right line.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut comment = String::new();
                let mut closed = false;
                while let Some(next) = chars.next() {
                    if comment.ends_with('*') && next == '/' {
                        closed = true;
                        break;
                    }
                    comment.push(next);
                }

                if closed {
                    out.extend(comment.chars().filter(|&c| c == '\n'));
                    out.push(' ');
                } else {
                    // left in place so the parser rejects the truncated text
                    out.push_str("/*");
                    out.push_str(&comment);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(without_nulls).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_with_comments() {
        let text = r#"
            {
                // line comment
                "url": "http://example.com/a//b", /* block
                comment */ "n": 1
            }
        "#;

        assert_eq!(
            Codec::new().parse(text).unwrap(),
            json!({"url": "http://example.com/a//b", "n": 1})
        );
        assert!(Codec::new().allow_comments(false).parse(text).is_err());
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        let text = r#"{"a": "/* not a comment */", "b": "escaped \" // quote"}"#;

        assert_eq!(
            Codec::new().parse(text).unwrap(),
            json!({"a": "/* not a comment */", "b": "escaped \" // quote"})
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(Codec::new().parse(r#"{"a": 1} /* never closed"#).is_err());
        assert!(Codec::new().parse(r#"{"a": 1} /* x"#).is_err());
        assert!(Codec::new().parse(r#"{"a": /* */ 1}"#).is_ok());
        assert!(Codec::new().parse(r#"{"a": 1} /**/"#).is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(Codec::new().parse("{\"a\": }").is_err());
        assert!(Codec::new().parse("").is_err());
    }

    #[test]
    fn test_print_omits_nulls() {
        let value = json!({"a": null, "b": [null, {"c": null, "d": 1}]});

        assert_eq!(
            Codec::new().pretty_print(false).print(&value),
            r#"{"b":[null,{"d":1}]}"#
        );
        assert_eq!(
            Codec::new()
                .pretty_print(false)
                .omit_nulls(false)
                .print(&value),
            r#"{"a":null,"b":[null,{"c":null,"d":1}]}"#
        );
    }

    #[test]
    fn test_print_pretty() {
        assert_eq!(Codec::new().print(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }
}
