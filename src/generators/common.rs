//! Common helpers for the template engines.
//!
//! Value lookup, truthiness and string conversion follow the loose conventions
//! template authors expect from JSON data: `0`, `""`, `false` and `null` are
//! falsy, and integral numbers print without a fractional part.

use serde_json::{Number, Value};

/// Whether a value counts as "present" for substitution purposes.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Objects, arrays and `null` are composite; they never match a bare `{key}`.
pub fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Array(_) | Value::Object(_))
}

/// Top-level entries of a data record, in property order.
///
/// Index-like keys (`"0"`, `"12"`) come first in ascending numeric order, the
/// rest keep their insertion order. Arrays expose their indices as keys.
pub fn entries(data: &Value) -> Vec<(String, &Value)> {
    match data {
        Value::Object(map) => {
            let mut indexed: Vec<(u32, &String, &Value)> = Vec::new();
            let mut named: Vec<(String, &Value)> = Vec::new();
            for (key, value) in map {
                match array_index(key) {
                    Some(index) => indexed.push((index, key, value)),
                    None => named.push((key.clone(), value)),
                }
            }
            indexed.sort_by_key(|(index, _, _)| *index);
            indexed
                .into_iter()
                .map(|(_, key, value)| (key.clone(), value))
                .chain(named)
                .collect()
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Canonical array index: digits only, no leading zero, below `u32::MAX`.
fn array_index(key: &str) -> Option<u32> {
    let digits_only = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

/// String form used when a value is written into a document.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => format_float(f),
        None => n.to_string(),
    }
}

/// Shortest round-trip form, exponential outside `[1e-6, 1e21)` like `1e+21` and `1.5e-7`.
fn format_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", f);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    f.to_string()
}

/// Walk `parts` from `data`, one field at a time.
///
/// Returns `None` as soon as the current value is falsy or the next field is
/// missing. Arrays and strings accept numeric indices and `length`.
pub fn lookup(data: &Value, parts: &[&str]) -> Option<Value> {
    let mut current = data;
    for (i, part) in parts.iter().enumerate() {
        if !is_truthy(current) {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(*part)?,
            Value::Array(items) => {
                if *part == "length" {
                    return lookup_owned(Value::from(items.len()), &parts[i + 1..]);
                }
                part.parse::<usize>().ok().and_then(|idx| items.get(idx))?
            }
            Value::String(s) => {
                let next = if *part == "length" {
                    Value::from(s.chars().count())
                } else {
                    let idx = part.parse::<usize>().ok()?;
                    Value::String(s.chars().nth(idx)?.to_string())
                };
                return lookup_owned(next, &parts[i + 1..]);
            }
            _ => return None,
        };
    }
    Some(current.clone())
}

fn lookup_owned(value: Value, rest: &[&str]) -> Option<Value> {
    if rest.is_empty() {
        Some(value)
    } else {
        lookup(&value, rest)
    }
}

/// Escape special characters for XML text nodes.
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(3.0)), "3");
        assert_eq!(display_value(&json!(2.5)), "2.5");
        assert_eq!(display_value(&json!(-7)), "-7");
    }

    #[test]
    fn test_display_number_exponent_thresholds() {
        assert_eq!(display_value(&json!(1e21)), "1e+21");
        assert_eq!(display_value(&json!(2.5e22)), "2.5e+22");
        assert_eq!(display_value(&json!(1e20)), "100000000000000000000");
        assert_eq!(display_value(&json!(0.000001)), "0.000001");
        assert_eq!(display_value(&json!(1e-7)), "1e-7");
        assert_eq!(display_value(&json!(-1.5e-7)), "-1.5e-7");
        assert_eq!(display_value(&json!(-0.0)), "0");
    }

    #[test]
    fn test_display_arrays_and_objects() {
        assert_eq!(display_value(&json!(["a", 1, null, true])), "a,1,,true");
        assert_eq!(display_value(&json!([[1, 2], 3])), "1,2,3");
        assert_eq!(display_value(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_lookup_nested() {
        let data = json!({"a": {"b": {"c": "deep"}}, "list": ["x", "y"]});
        assert_eq!(lookup(&data, &["a", "b", "c"]), Some(json!("deep")));
        assert_eq!(lookup(&data, &["list", "1"]), Some(json!("y")));
        assert_eq!(lookup(&data, &["list", "length"]), Some(json!(2)));
        assert_eq!(lookup(&data, &["a", "missing", "c"]), None);
        assert_eq!(lookup(&data, &["list", "9"]), None);
    }

    #[test]
    fn test_lookup_stops_at_falsy() {
        let data = json!({"zero": 0, "empty": ""});
        assert_eq!(lookup(&data, &["zero"]), Some(json!(0)));
        assert_eq!(lookup(&data, &["zero", "x"]), None);
        assert_eq!(lookup(&data, &["empty", "length"]), None);
    }

    #[test]
    fn test_lookup_string_index() {
        let data = json!({"word": "héllo"});
        assert_eq!(lookup(&data, &["word", "1"]), Some(json!("é")));
        assert_eq!(lookup(&data, &["word", "length"]), Some(json!(5)));
    }

    #[test]
    fn test_entries_keep_property_order() {
        let data: Value =
            serde_json::from_str(r#"{"b": 1, "10": 2, "a": 3, "2": 4, "01": 5}"#).unwrap();
        let keys: Vec<String> = entries(&data).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["2", "10", "b", "a", "01"]);
    }

    #[test]
    fn test_entries_of_array() {
        let data = json!(["first", "second"]);
        let keys: Vec<String> = entries(&data).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "1"]);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
