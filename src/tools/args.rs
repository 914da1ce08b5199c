//! Typed access to a tool call's `arguments` object.

use serde_json::{Map, Value};

use crate::error::{Result, ServerError};

/// Borrowed view over the arguments of one tool call. Optional values fall
/// back to a default when absent or of the wrong JSON type.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Args<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// A required string argument.
    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        match self.map.get(key) {
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(ServerError::InvalidArguments(format!("{} must be a string", key))),
            None => Err(ServerError::InvalidArguments(format!("missing required argument: {}", key))),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.map.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Non-negative integer. Floats from loosely typed clients are truncated.
    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        match self.map.get(key) {
            Some(v) => v
                .as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(default),
            None => default,
        }
    }

    /// String array; non-string items are skipped.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.map
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn array(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.map.get(key).and_then(Value::as_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_str() {
        let m = map(json!({"path": "/tmp", "n": 3}));
        let args = Args::new(&m);
        assert_eq!(args.required_str("path").unwrap(), "/tmp");
        assert!(matches!(
            args.required_str("n"),
            Err(ServerError::InvalidArguments(_))
        ));
        assert!(args.required_str("missing").is_err());
    }

    #[test]
    fn test_defaults_apply_on_wrong_type() {
        let m = map(json!({"recursive": "yes", "maxDepth": -2}));
        let args = Args::new(&m);
        assert!(args.bool_or("recursive", true));
        assert_eq!(args.u64_or("maxDepth", 5), 5);
        assert_eq!(args.u64_or("absent", 7), 7);
    }

    #[test]
    fn test_float_integers_accepted() {
        let m = map(json!({"chunkNumber": 2.0}));
        assert_eq!(Args::new(&m).u64_or("chunkNumber", 0), 2);
    }

    #[test]
    fn test_strings_skip_non_strings() {
        let m = map(json!({"fileTypes": ["rs", 1, "go"]}));
        assert_eq!(Args::new(&m).strings("fileTypes"), vec!["rs", "go"]);
    }
}
