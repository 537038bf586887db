//! Parsing and validation of badge source documents.
//!
//! The published document is an object keyed by badge id whose values are badge
//! records; scraper output is a plain array of records. Both keep document order.

use std::collections::HashSet;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::Badge;

/// Parse a source document into an ordered, validated badge list.
pub fn parse_document(body: &str) -> Result<Vec<Badge>, AppError> {
    let value: Value = serde_json::from_str(body)?;
    badges_from_value(value)
}

/// Convert an already-decoded document into an ordered, validated badge list.
pub fn badges_from_value(value: Value) -> Result<Vec<Badge>, AppError> {
    let records: Vec<(String, Value)> = match value {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (format!("[{}]", index), item))
            .collect(),
        other => {
            return Err(AppError::SourceDecode(format!(
                "Expected an object or array of badges, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut badges = Vec::with_capacity(records.len());
    let mut seen = HashSet::with_capacity(records.len());

    for (key, record) in records {
        let badge: Badge = serde_json::from_value(record)
            .map_err(|e| AppError::SourceDecode(format!("Badge {} is malformed: {}", key, e)))?;

        badge
            .validate()
            .map_err(|e| AppError::SourceDecode(format!("Badge {} is invalid: {}", key, e)))?;

        if !seen.insert(badge.id.clone()) {
            return Err(AppError::SourceDecode(format!(
                "Duplicate badge id {} at {}",
                badge.id, key
            )));
        }

        badges.push(badge);
    }

    Ok(badges)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
