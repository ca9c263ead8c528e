//! Problem record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalog entry
///
/// Only the id is interpreted. Every other field is carried through as-is, so
/// the record serializes back out with the same payload it was loaded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "Id", alias = "id")]
    pub id: String,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Problem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: Map::new(),
        }
    }

    /// Attach a payload field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_passes_through() {
        let raw = json!({
            "Id": "fib",
            "title": "Fibonacci",
            "testCases": [{"input": [1], "output": 1}]
        });
        let problem: Problem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(problem.id, "fib");
        assert_eq!(problem.payload.len(), 2);
        assert_eq!(serde_json::to_value(&problem).unwrap(), raw);
    }

    #[test]
    fn test_lowercase_id_accepted() {
        let problem: Problem = serde_json::from_str(r#"{"id": "sort"}"#).unwrap();
        assert_eq!(problem.id, "sort");
        assert_eq!(serde_json::to_string(&problem).unwrap(), r#"{"Id":"sort"}"#);
    }

    #[test]
    fn test_payload_keeps_load_order() {
        let raw = r#"{"Id":"fib","zeta":1,"title":"Fibonacci","alpha":[2,1]}"#;
        let problem: Problem = serde_json::from_str(raw).unwrap();
        let keys: Vec<&str> = problem.payload.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "title", "alpha"]);
        assert_eq!(serde_json::to_string(&problem).unwrap(), raw);
    }

    #[test]
    fn test_missing_id_rejected() {
        assert!(serde_json::from_str::<Problem>(r#"{"title": "No id"}"#).is_err());
    }
}
