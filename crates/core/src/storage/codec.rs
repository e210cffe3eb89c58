use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::Expense;

/// Encode the full ledger as the JSON array stored in the expenses slot.
pub fn encode_expenses(expenses: &[Expense]) -> Result<String, CoreError> {
    serde_json::to_string(expenses)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses: {e}")))
}

/// Decode the expenses slot, tolerating legacy and hand-edited records.
///
/// Fails only when the blob is not JSON or not an array. Records are coerced
/// rather than rejected: a `criadoEm` that is not RFC 3339 is parsed
/// leniently, then derived from `data`, then set to [`UNDATED`]. Only items
/// that are not JSON objects are skipped. The result is sorted newest first.
pub fn decode_expenses(raw: &str) -> Result<Vec<Expense>, CoreError> {
    let value: Value = serde_json::from_str(raw)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::Deserialization(format!(
                "expected an array of expenses, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut expenses: Vec<Expense> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let decoded = decode_expense(item);
            if decoded.is_none() {
                tracing::warn!(index = idx, kind = json_kind(item), "skipping stored expense that is not an object");
            }
            decoded
        })
        .collect();

    expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(expenses)
}

fn decode_expense(item: &Value) -> Option<Expense> {
    if !item.is_object() {
        return None;
    }

    let stored_date = item
        .get("data")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    let created_at = match item.get("criadoEm").and_then(parse_timestamp) {
        Some(ts) => ts,
        None => match stored_date.and_then(local_midnight) {
            Some(ts) => ts,
            None => {
                tracing::warn!(criado_em = ?item.get("criadoEm"), "stored expense has no usable timestamp, keeping it undated");
                UNDATED
            }
        },
    };
    let date = stored_date.unwrap_or_else(|| created_at.date_naive());

    let id = item
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    Some(Expense {
        id,
        description: coerce_text(item.get("descricao")),
        amount: coerce_amount(item.get("valor").unwrap_or(&Value::Null)),
        category: coerce_text(item.get("categoria")),
        date,
        created_at,
    })
}

/// Timestamp given to stored records whose `criadoEm` and `data` are both
/// unusable. Sorts after every real record and falls in no current month.
pub const UNDATED: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Zone-less layouts seen in hand-edited or legacy slots, read as local time.
const NAIVE_TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a stored `criadoEm`: RFC 3339, a zone-less date-time in local
/// time, or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            NAIVE_TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .and_then(from_local)
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    from_local(date.and_time(NaiveTime::MIN))
}

fn from_local(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Numeric coercion for stored amounts.
///
/// Numbers pass through, numeric strings are parsed (blank → 0), booleans
/// map to 1/0 and null to 0. Anything else, or a non-finite result,
/// becomes 0.
pub fn coerce_amount(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
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

/// Serde helper for numeric fields that may have been stored as strings.
pub fn deserialize_lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <Value as serde::Deserialize>::deserialize(deserializer)?;
    Ok(coerce_amount(&value))
}

/// Decode a JSON array slot item by item, skipping items that do not fit `T`.
/// Fails only when the blob is not a JSON array.
pub fn decode_lenient_list<T>(raw: &str) -> Result<Vec<T>, CoreError>
where
    T: serde::de::DeserializeOwned,
{
    let value: Value = serde_json::from_str(raw)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::Deserialization(format!(
                "expected an array, found {}",
                json_kind(&other)
            )))
        }
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "skipping unreadable stored item");
                None
            }
        })
        .collect())
}
