use serde_json::Value;

use crate::mapper::{self, DisplayRecord};

/// Structural shape of a raw lookup payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadShape<'a> {
    /// Top-level array of records.
    List(&'a [Value]),
    /// Object carrying its records under `results`.
    Wrapped(&'a [Value]),
    /// Anything else is one record.
    Single(&'a Value),
}

impl<'a> PayloadShape<'a> {
    pub fn classify(payload: &'a Value) -> Self {
        match payload {
            Value::Array(items) => Self::List(items),
            Value::Object(obj) => match obj.get("results") {
                Some(Value::Array(items)) => Self::Wrapped(items),
                _ => Self::Single(payload),
            },
            _ => Self::Single(payload),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Wrapped(_) => "wrapped",
            Self::Single(_) => "single",
        }
    }

    pub fn records(&self) -> Vec<&'a Value> {
        match *self {
            Self::List(items) | Self::Wrapped(items) => items.iter().collect(),
            Self::Single(value) => vec![value],
        }
    }
}

fn pass_through(value: &Value) -> DisplayRecord {
    match value {
        Value::Object(record) => DisplayRecord::PassThrough(record.clone()),
        other => DisplayRecord::Scalar { raw: other.clone() },
    }
}

pub fn handle_multiple_results(payload: &Value, auto_map: bool) -> Vec<DisplayRecord> {
    let shape = PayloadShape::classify(payload);
    tracing::debug!(shape = shape.label(), auto_map, "normalizing payload");
    shape
        .records()
        .into_iter()
        .map(|record| {
            if auto_map {
                mapper::auto_map_fields(record)
            } else {
                pass_through(record)
            }
        })
        .collect()
}
