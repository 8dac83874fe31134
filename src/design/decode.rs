//! Boundary decoding for design payloads.
//!
//! The list endpoint is duck-typed: nested objects can arrive either as JSON
//! values or as JSON-encoded strings, keys can be camelCase or snake_case, and
//! numbers can arrive as strings. Every field goes through exactly one
//! decode step here with an explicit fallback. A field that cannot be decoded
//! is replaced with its zero value and reported with `log::warn!`. It is never
//! surfaced as an error. Only a broken envelope (no `data`) is an error.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::design::design_model::{AnalyzeOutcome, DesignResult, ModelType, SavedDesign, Stats, clamp_stat};

/// Decode `{data: SavedDesign[]}`, keeping the backend's newest-first order.
pub fn decode_design_list(body: &Value) -> Result<Vec<SavedDesign>, ApiError> {
    let data = envelope_data(body, "design list")?;
    let rows = match data {
        Value::Array(rows) => rows,
        other => {
            return Err(ApiError::MalformedPayload {
                context: "design list".to_string(),
                detail: format!("expected array under 'data', got {}", kind_of(other)),
            });
        }
    };

    // The backend already orders rows newest first. Timestamps are display
    // data only; an unparseable one must not move its row.
    Ok(rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| decode_saved_design(row, i))
        .collect())
}

/// Decode `{data: DesignResult}` from the detail endpoint.
pub fn decode_design_detail(body: &Value) -> Result<DesignResult, ApiError> {
    let data = envelope_data(body, "design detail")?;
    let data = unwrap_encoded(data, "design detail", "data");
    Ok(decode_design_result(&data, "detail"))
}

/// Decode `{data: DesignResult, designId}` from the analyze endpoint.
pub fn decode_analyze_response(body: &Value) -> Result<AnalyzeOutcome, ApiError> {
    let data = envelope_data(body, "analyze response")?;
    let data = unwrap_encoded(data, "analyze response", "data");
    let result = decode_design_result(&data, "analyze");
    let design_id = body
        .get("designId")
        .or_else(|| body.get("design_id"))
        .and_then(id_string);

    Ok(AnalyzeOutcome { result, design_id })
}

/// Pull the `{error}` message out of a rejected response body, if there is one.
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("error").or_else(|| body.get("message"))? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(o) => o
            .get("message")
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        _ => None,
    }
}

fn envelope_data<'a>(body: &'a Value, context: &str) -> Result<&'a Value, ApiError> {
    body.get("data").ok_or_else(|| ApiError::MalformedPayload {
        context: context.to_string(),
        detail: "response has no 'data' field".to_string(),
    })
}

fn decode_saved_design(row: &Value, index: usize) -> Option<SavedDesign> {
    let Some(id) = row.get("id").and_then(id_string) else {
        log::warn!("design list row {} has no usable id; skipping it", index);
        return None;
    };

    let result_source = match row.get("result") {
        Some(nested) => unwrap_encoded(nested, &id, "result"),
        None => row.clone(),
    };
    let result = decode_design_result(&result_source, &id);

    let name = row
        .get("name")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .unwrap_or_else(|| result.name.clone());
    let prompt = row
        .get("prompt")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let created_at = decode_created_at(field(row, "createdAt", "created_at"), &id);

    Some(SavedDesign {
        id,
        name,
        prompt,
        created_at,
        result,
    })
}

/// Decode a design result from a JSON object, applying per-field fallbacks.
pub fn decode_design_result(value: &Value, origin: &str) -> DesignResult {
    if !value.is_object() {
        log::warn!(
            "design {}: expected object for result, got {}; using empty result",
            origin,
            kind_of(value)
        );
        return DesignResult::default();
    }

    let stats = field(value, "stats", "stats")
        .map(|v| decode_stats(&unwrap_encoded(v, origin, "stats"), origin))
        .unwrap_or_default();
    let design_suggestions = field(value, "designSuggestions", "design_suggestions")
        .map(|v| decode_suggestions(&unwrap_encoded(v, origin, "designSuggestions"), origin))
        .unwrap_or_default();
    let technical_specs = field(value, "technicalSpecs", "technical_specs")
        .map(|v| decode_specs(&unwrap_encoded(v, origin, "technicalSpecs"), origin))
        .unwrap_or_default();
    let analysis = field(value, "analysis", "analysis")
        .map(decode_analysis)
        .unwrap_or_default();
    let model_type = field(value, "modelType", "model_type")
        .and_then(Value::as_str)
        .and_then(ModelType::parse);

    DesignResult {
        equipment_type: text(field(value, "equipmentType", "equipment_type")),
        model_type,
        name: text(value.get("name")),
        description: text(value.get("description")),
        stats,
        design_suggestions,
        technical_specs,
        analysis,
    }
}

fn decode_stats(value: &Value, origin: &str) -> Stats {
    let Some(obj) = value.as_object() else {
        log::warn!("design {}: stats is {}; using zero stats", origin, kind_of(value));
        return Stats::default();
    };

    let stat = |key: &str| -> u8 {
        match obj.get(key) {
            None | Some(Value::Null) => 0,
            Some(v) => match number(v) {
                Some(n) => clamp_stat(n),
                None => {
                    log::warn!("design {}: stats.{} is not a number; using 0", origin, key);
                    0
                }
            },
        }
    };

    Stats {
        speed: stat("speed"),
        armor: stat("armor"),
        firepower: stat("firepower"),
        stealth: stat("stealth"),
    }
}

fn decode_suggestions(value: &Value, origin: &str) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            log::warn!(
                "design {}: designSuggestions is {}; using empty list",
                origin,
                kind_of(other)
            );
            Vec::new()
        }
    }
}

fn decode_specs(value: &Value, origin: &str) -> BTreeMap<String, String> {
    match value {
        Value::Object(obj) => obj
            .iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k.clone(), s.clone())),
                Value::Null => None,
                other => Some((k.clone(), other.to_string())),
            })
            .collect(),
        Value::Null => BTreeMap::new(),
        other => {
            log::warn!(
                "design {}: technicalSpecs is {}; using empty map",
                origin,
                kind_of(other)
            );
            BTreeMap::new()
        }
    }
}

fn decode_analysis(value: &Value) -> String {
    match value {
        // A JSON-encoded string decodes to itself; plain prose stays as is.
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::String(inner)) => inner,
            _ => s.clone(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_created_at(value: Option<&Value>, origin: &str) -> DateTime<Utc> {
    let parsed = match value {
        Some(Value::String(s)) => parse_timestamp(s),
        Some(Value::Number(n)) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        log::warn!("design {}: createdAt missing or unparseable; using epoch", origin);
        DateTime::<Utc>::UNIX_EPOCH
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQL-style timestamps without a zone are taken as UTC.
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// If `value` is a string holding JSON, return the parsed value. Strings that
/// are not JSON are returned unchanged so the field decoder can reject them.
fn unwrap_encoded(value: &Value, origin: &str, field_name: &str) -> Value {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!(
                    "design {}: {} is a string but not valid JSON ({})",
                    origin,
                    field_name,
                    e
                );
                value.clone()
            }
        },
        _ => value.clone(),
    }
}

fn field<'a>(value: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    value.get(camel).or_else(|| value.get(snake))
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_accepts_strings_and_floats() {
        assert_eq!(number(&json!(42)), Some(42));
        assert_eq!(number(&json!(41.6)), Some(42));
        assert_eq!(number(&json!(" 7 ")), Some(7));
        assert_eq!(number(&json!("fast")), None);
        assert_eq!(number(&json!(true)), None);
    }

    #[test]
    fn sql_timestamps_parse_as_utc() {
        let dt = parse_timestamp("2024-05-01 08:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn analysis_unwraps_encoded_string_only() {
        assert_eq!(decode_analysis(&json!("\"quoted\"")), "quoted");
        assert_eq!(decode_analysis(&json!("plain prose")), "plain prose");
        assert_eq!(decode_analysis(&Value::Null), "");
    }
}
