//! Conversion between plain JSON and Firestore's typed value encoding.

use serde_json::{json, Value};

use crate::{errors::StoreError, repositories::document_store::Fields};

/// Encodes document fields into a Firestore `fields` object.
pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), encode_value(value)))
            .collect(),
    )
}

/// Strings always stay `stringValue`; timestamps are stored as text.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decodes a Firestore `fields` object. A missing object decodes as empty.
pub fn decode_fields(fields: Option<&Value>) -> Result<Fields, StoreError> {
    match fields {
        None | Some(Value::Null) => Ok(Fields::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| Ok((key.clone(), decode_value(value)?)))
            .collect(),
        Some(other) => Err(StoreError::Decode(format!("fields is not an object: {other}"))),
    }
}

pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let typed = value
        .as_object()
        .and_then(|map| map.iter().next())
        .map(|(kind, raw)| (kind.as_str(), raw))
        .ok_or_else(|| StoreError::Decode(format!("untyped value: {value}")))?;

    match typed {
        ("nullValue", _) => Ok(Value::Null),
        ("booleanValue", b @ Value::Bool(_)) => Ok(b.clone()),
        ("integerValue", Value::String(raw)) => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| StoreError::Decode(format!("integerValue {raw}: {e}"))),
        ("integerValue", n @ Value::Number(_)) => Ok(n.clone()),
        ("doubleValue", Value::Number(n)) => Ok(Value::Number(n.clone())),
        // Firestore spells NaN and the infinities as strings; JSON can't carry them.
        ("doubleValue", Value::String(_)) => Ok(Value::Null),
        ("stringValue", s @ Value::String(_)) => Ok(s.clone()),
        ("timestampValue", s @ Value::String(_)) => Ok(s.clone()),
        ("referenceValue", s @ Value::String(_)) => Ok(s.clone()),
        ("bytesValue", s @ Value::String(_)) => Ok(s.clone()),
        ("geoPointValue", point) => Ok(point.clone()),
        ("arrayValue", array) => array
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
            .transpose()
            .map(|items| Value::Array(items.unwrap_or_default())),
        ("mapValue", map) => decode_fields(map.get("fields")).map(Value::Object),
        (kind, raw) => Err(StoreError::Decode(format!("unsupported {kind}: {raw}"))),
    }
}
