//! Order-independent, deterministic string encoding of JSON values.
//!
//! Mappings are emitted with keys sorted. Sequences are emitted with
//! their elements sorted by each element's own canonical string, so
//! `[1, 2]` and `[2, 1]` encode identically. Scalars use the standard
//! compact JSON text.

use serde_json::Value;

/// Canonical string form of `value`. Total over every `Value`.
pub fn canonicalize(value: &Value) -> String
{   match value
    {   Value::Object(map) => {
          let mut entries: Vec<(&String, String)> = map
            .iter()
            .map(|(k, v)| (k, canonicalize(v)))
            .collect();
          entries.sort_by(|a, b| a.0.cmp(b.0));
          let body: Vec<String> = entries
            .into_iter()
            .map(|(k, v)| format!("{}:{}", encode_key(k), v))
            .collect();
          format!("{{{}}}", body.join(","))
        }
      , Value::Array(items) => {
          let mut encoded: Vec<String>
            = items.iter().map(canonicalize).collect();
          encoded.sort();
          format!("[{}]", encoded.join(","))
        }
      , scalar => scalar.to_string()
    }
}

fn encode_key(key: &str) -> String
{   Value::String(key.to_string()).to_string()
}
