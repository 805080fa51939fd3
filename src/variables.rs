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

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Variables available to templates in pattern strings.
///
/// A pattern string such as `"{{ baseUrl }}/cars/{{ car.id }}"` is expanded
/// against these variables before it is compared with the actual string.
///
/// # Examples
///
/// Variables can be passed one by one with specified type:
///
/// ```
/// # use json_match::Variables;
/// let mut variables = Variables::new();
/// variables.insert_string("name".to_string(), "John".to_string());
/// variables.insert_int("age".to_string(), 30);
/// ```
///
/// Alternatively, they can be passed as a JSON object:
///
/// ```
/// # use json_match::Variables;
/// let json = r#"{"name": "John", "age": 30}"#;
/// let variables = Variables::from_json(&serde_json::from_str(json).unwrap()).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    map: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Constructs `Variables` from a JSON object, one variable per property.
    pub fn from_json(json: &Value) -> Result<Self, String> {
        let mut map = HashMap::new();

        if let Value::Object(obj) = json {
            for (key, value) in obj {
                map.insert(key.clone(), value.clone());
            }
        } else {
            return Err("variables must be an object".to_string());
        }

        Ok(Self { map })
    }

    /// Constructs `Variables` from any serializable struct or map, one variable per field.
    ///
    /// ```
    /// # use json_match::Variables;
    /// #[derive(serde::Serialize)]
    /// struct Scope {
    ///     protocol: &'static str,
    ///     host: &'static str,
    /// }
    ///
    /// let variables = Variables::from_serialize(&Scope {
    ///     protocol: "https",
    ///     host: "example.com",
    /// })
    /// .unwrap();
    /// assert!(variables.lookup("host").is_some());
    /// ```
    pub fn from_serialize<T: Serialize>(scope: &T) -> Result<Self, String> {
        let json = serde_json::to_value(scope).map_err(|e| e.to_string())?;
        Self::from_json(&json)
    }

    /// Inserts a `Value`, overwriting any variable with the same name.
    pub fn insert_value(&mut self, name: String, value: Value) {
        self.map.insert(name, value);
    }

    pub fn insert_string(&mut self, name: String, value: String) {
        self.map.insert(name, Value::String(value));
    }

    pub fn insert_int(&mut self, name: String, value: i64) {
        self.map
            .insert(name, Value::Number(serde_json::Number::from(value)));
    }

    /// Inserts an `f64`. Non-finite numbers have no JSON form and are stored as `null`.
    pub fn insert_float(&mut self, name: String, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.map.insert(name, value);
    }

    pub fn insert_bool(&mut self, name: String, value: bool) {
        self.map.insert(name, Value::Bool(value));
    }

    pub fn insert_null(&mut self, name: String) {
        self.map.insert(name, Value::Null);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolves a dotted name such as `car.owners.0.name`.
    ///
    /// The first segment names a variable, the following ones walk into
    /// objects by key and into arrays by index.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut segments = name.split('.');
        let mut current = self.map.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(obj) => obj.get(segment)?,
                Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Renders all variables as aligned `key = value` lines, sorted by name.
    pub fn describe(&self) -> String {
        let mut names = self.map.keys().collect::<Vec<_>>();
        names.sort();
        let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);

        names
            .into_iter()
            .map(|name| format!("{:<width$} = {}", name, self.map[name], width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_requires_object() {
        assert!(Variables::from_json(&json!({"a": 1})).is_ok());
        assert_eq!(
            Variables::from_json(&json!([1, 2])),
            Err("variables must be an object".to_string())
        );
    }

    #[test]
    fn test_lookup_dotted() {
        let variables = Variables::from_json(&json!({
            "car": { "id": 7, "owners": [{ "name": "Ann" }] },
            "flag": true
        }))
        .unwrap();

        assert_eq!(variables.lookup("car.id"), Some(&json!(7)));
        assert_eq!(variables.lookup("car.owners.0.name"), Some(&json!("Ann")));
        assert_eq!(variables.lookup("flag"), Some(&json!(true)));
        assert_eq!(variables.lookup("car.owners.1.name"), None);
        assert_eq!(variables.lookup("flag.x"), None);
        assert_eq!(variables.lookup("missing"), None);
    }

    #[test]
    fn test_insert_float_non_finite() {
        let mut variables = Variables::new();
        variables.insert_float("ratio".to_string(), 0.5);
        variables.insert_float("nan".to_string(), f64::NAN);

        assert_eq!(variables.lookup("ratio"), Some(&json!(0.5)));
        assert_eq!(variables.lookup("nan"), Some(&Value::Null));
        assert_eq!(variables.lookup("ratio.value"), None);
    }

    #[test]
    fn test_describe_aligned() {
        let mut variables = Variables::new();
        variables.insert_string("host".to_string(), "example.com".to_string());
        variables.insert_int("port".to_string(), 8080);
        variables.insert_bool("tls".to_string(), true);

        assert_eq!(
            variables.describe(),
            "host = \"example.com\"\nport = 8080\ntls  = true"
        );
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct Scope {
            protocol: String,
            port: u16,
        }

        let variables = Variables::from_serialize(&Scope {
            protocol: "https".to_string(),
            port: 443,
        })
        .unwrap();

        assert_eq!(variables.lookup("protocol"), Some(&json!("https")));
        assert_eq!(variables.lookup("port"), Some(&json!(443)));
        assert!(Variables::from_serialize(&"not an object").is_err());
    }
}
