//! Order-file parsing.
//!
//! Order JSON schema (one order per file, dropped into the inbox):
//! - identifier: string (required)
//! - scope: string (required)
//! - created_at: ISO-8601 string (optional, defaults to now, flagged)
//! - acte_parent: string (optional, defaults to the root act tag)
//! - metadata: object of strings (optional, defaults to {})
//! - consumed_at: ISO-8601 string (must be absent or valid)
//!
//! Parsing never fails hard: every malformation is converted into a named
//! error code and a placeholder field, so the processor can always reject
//! the file with an inspectable reason instead of crashing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{Order, ROOT_ACT};

/// Outcome of parsing one order file.
#[derive(Debug, Clone)]
pub struct ParsedOrder {
    pub order: Order,
    pub errors: Vec<String>,
    pub defaulted_created_at: bool,
}

impl ParsedOrder {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse one order file. `now` supplies the default `created_at`.
pub fn parse_order_file(path: &Path, now: DateTime<Utc>) -> ParsedOrder {
    let data = match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(_) => return placeholder(now, vec!["invalid_json".to_string()]),
        },
        Err(_) => return placeholder(now, vec!["invalid_json".to_string()]),
    };

    let object = match data.as_object() {
        Some(object) => object,
        None => return placeholder(now, vec!["invalid_payload".to_string()]),
    };

    let mut errors: Vec<String> = Vec::new();

    let identifier = non_empty_string(object.get("identifier"));
    if identifier.is_none() {
        errors.push("missing_identifier".to_string());
    }
    let scope = non_empty_string(object.get("scope"));
    if scope.is_none() {
        errors.push("missing_scope".to_string());
    }

    let mut defaulted_created_at = false;
    let created_at = match object.get("created_at").and_then(Value::as_str) {
        Some(raw) => match parse_timestamp(raw) {
            Some(ts) => ts,
            None => {
                errors.push("invalid_created_at".to_string());
                now
            }
        },
        None => {
            defaulted_created_at = true;
            now
        }
    };

    let acte_parent = non_empty_string(object.get("acte_parent"))
        .unwrap_or_else(|| ROOT_ACT.to_string());

    let metadata = match object.get("metadata") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect(),
        Some(_) => {
            errors.push("invalid_metadata".to_string());
            BTreeMap::new()
        }
    };

    let consumed_at = match object.get("consumed_at") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => match parse_timestamp(raw) {
            Some(ts) => Some(ts),
            None => {
                errors.push("invalid_consumed_at".to_string());
                None
            }
        },
        Some(_) => {
            errors.push("invalid_consumed_at".to_string());
            None
        }
    };

    ParsedOrder {
        order: Order {
            identifier: identifier.unwrap_or_else(|| "unknown".to_string()),
            scope: scope.unwrap_or_else(|| "unknown".to_string()),
            created_at,
            acte_parent,
            consumed_at,
            metadata,
        },
        errors,
        defaulted_created_at,
    }
}

fn placeholder(now: DateTime<Utc>, errors: Vec<String>) -> ParsedOrder {
    ParsedOrder {
        order: Order {
            identifier: "unknown".to_string(),
            scope: "unknown".to_string(),
            created_at: now,
            acte_parent: ROOT_ACT.to_string(),
            consumed_at: None,
            metadata: BTreeMap::new(),
        },
        errors,
        defaulted_created_at: false,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write_order(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_parse_complete_order() {
        let dir = tempdir().unwrap();
        let path = write_order(
            dir.path(),
            "order.json",
            r#"{"identifier":"order-1","scope":"local",
                "created_at":"2026-08-30T10:00:00Z",
                "metadata":{"action":"deploy.up","target":"app-1","release_ref":"v1.0.0"}}"#,
        );
        let parsed = parse_order_file(&path, Utc::now());
        assert!(parsed.is_valid());
        assert!(!parsed.defaulted_created_at);
        assert_eq!(parsed.order.identifier, "order-1");
        assert_eq!(parsed.order.acte_parent, ROOT_ACT);
        assert_eq!(parsed.order.metadata.get("action").unwrap(), "deploy.up");
    }

    #[test]
    fn test_missing_created_at_is_defaulted_and_flagged() {
        let dir = tempdir().unwrap();
        let path = write_order(
            dir.path(),
            "order.json",
            r#"{"identifier":"order-1","scope":"local"}"#,
        );
        let now = Utc::now();
        let parsed = parse_order_file(&path, now);
        assert!(parsed.is_valid());
        assert!(parsed.defaulted_created_at);
        assert_eq!(parsed.order.created_at, now);
    }

    #[test]
    fn test_missing_identifier_and_scope_collected_together() {
        let dir = tempdir().unwrap();
        let path = write_order(dir.path(), "order.json", r#"{"metadata":{}}"#);
        let parsed = parse_order_file(&path, Utc::now());
        assert!(parsed.errors.contains(&"missing_identifier".to_string()));
        assert!(parsed.errors.contains(&"missing_scope".to_string()));
        assert_eq!(parsed.order.identifier, "unknown");
        assert_eq!(parsed.order.scope, "unknown");
    }

    #[test]
    fn test_invalid_json_yields_named_code() {
        let dir = tempdir().unwrap();
        let path = write_order(dir.path(), "order.json", "not json at all {");
        let parsed = parse_order_file(&path, Utc::now());
        assert_eq!(parsed.errors, vec!["invalid_json".to_string()]);
    }

    #[test]
    fn test_non_object_payload_yields_named_code() {
        let dir = tempdir().unwrap();
        let path = write_order(dir.path(), "order.json", r#"["not", "an", "object"]"#);
        let parsed = parse_order_file(&path, Utc::now());
        assert_eq!(parsed.errors, vec!["invalid_payload".to_string()]);
    }

    #[test]
    fn test_invalid_timestamps_are_flagged() {
        let dir = tempdir().unwrap();
        let path = write_order(
            dir.path(),
            "order.json",
            r#"{"identifier":"o","scope":"s","created_at":"yesterday","consumed_at":42}"#,
        );
        let parsed = parse_order_file(&path, Utc::now());
        assert!(parsed.errors.contains(&"invalid_created_at".to_string()));
        assert!(parsed.errors.contains(&"invalid_consumed_at".to_string()));
        assert!(parsed.order.consumed_at.is_none());
    }
}
