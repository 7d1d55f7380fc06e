//! Raw request parameters as seen by the rule evaluator.

use indexmap::IndexMap;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ValidationError;

/// Ordered mapping of field name to raw JSON value for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    values: IndexMap<String, Value>,
}

/// Returns `true` for absent, `null`, empty or whitespace-only values.
pub fn is_missing_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an application/x-www-form-urlencoded query string.
    /// Every value is a string; the first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let mut values = IndexMap::new();
        for (k, v) in form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(k.into_owned())
                .or_insert_with(|| Value::String(v.into_owned()));
        }
        Self { values }
    }

    /// Build from a JSON object, keeping each value's JSON type.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            Value::Null => Ok(Self::new()),
            _ => Err(ValidationError::input_invalid("body", "must be a JSON object")),
        }
    }

    /// Parse a raw request body. An empty body is an empty set.
    pub fn from_body(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|_| ValidationError::input_invalid("body", "is not valid JSON"))?;
        Self::from_json(value)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut values = IndexMap::new();
        for (k, v) in pairs {
            values.entry(k.into()).or_insert(v.into());
        }
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// String value of a field, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    pub fn is_missing(&self, field: &str) -> bool {
        is_missing_value(self.values.get(field))
    }

    pub fn is_present(&self, field: &str) -> bool {
        !self.is_missing(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_values_are_strings_and_first_wins() {
        let params = ParameterSet::from_query("limit=10&filter=favorites&limit=20&x=a%20b");
        assert_eq!(params.get("limit"), Some(&json!("10")));
        assert_eq!(params.get_str("x"), Some("a b"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn missing_covers_null_and_blank() {
        let params = ParameterSet::from_pairs([
            ("a", json!(null)),
            ("b", json!("")),
            ("c", json!("  ")),
            ("d", json!("0")),
            ("e", json!(false)),
        ]);
        assert!(params.is_missing("a"));
        assert!(params.is_missing("b"));
        assert!(params.is_missing("c"));
        assert!(params.is_present("d"));
        assert!(params.is_present("e"));
        assert!(params.is_missing("zzz"));
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(ParameterSet::from_body(b"").unwrap().is_empty());
        let params = ParameterSet::from_body(br#"{"favorites": true}"#).unwrap();
        assert_eq!(params.get("favorites"), Some(&json!(true)));

        let err = ParameterSet::from_body(b"[1,2]").unwrap_err();
        assert_eq!(err.description, "body: must be a JSON object");
        let err = ParameterSet::from_body(b"{nope").unwrap_err();
        assert_eq!(err.description, "body: is not valid JSON");
    }
}
