use serde_json::{Map, Value};

use crate::record::{ParameterMap, StringMap};

/// Ordered JSON object built for a single event. Keys keep insertion order.
pub type Document = Map<String, Value>;

/// One entry of a field catalog: the key it writes, the toggle that enables
/// it and how to read its value from an event.
///
/// Extractors return `None` when the event carries no data for the field;
/// the key is then left out of the document.
pub(crate) struct FieldSpec<C, E> {
    pub key: &'static str,
    pub enabled: fn(&C) -> bool,
    pub extract: fn(&E) -> Option<Value>,
}

/// Evaluate `catalog` in declared order against one event.
pub(crate) fn fill_document<C, E>(
    document: &mut Document,
    catalog: &[FieldSpec<C, E>],
    config: &C,
    event: &E,
) {
    for field in catalog {
        if !(field.enabled)(config) {
            continue;
        }
        if let Some(value) = (field.extract)(event) {
            document.insert(field.key.to_string(), value);
        }
    }
}

/// Nested string map, or `None` if there is nothing to show.
pub(crate) fn string_map_value(map: &StringMap) -> Option<Value> {
    if map.is_empty() {
        return None;
    }
    let object = map
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Some(Value::Object(object))
}

/// Nested map of string lists, or `None` if there is nothing to show.
pub(crate) fn parameter_map_value(map: &ParameterMap) -> Option<Value> {
    if map.is_empty() {
        return None;
    }
    let object = map
        .iter()
        .map(|(key, values)| {
            let values = values.iter().cloned().map(Value::String).collect();
            (key.clone(), Value::Array(values))
        })
        .collect();
    Some(Value::Object(object))
}

pub(crate) fn string_value(value: &Option<String>) -> Option<Value> {
    value.as_ref().map(|s| Value::String(s.clone()))
}

pub(crate) fn body_value(body: &Option<Vec<u8>>) -> Option<Value> {
    body.as_ref()
        .map(|bytes| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
