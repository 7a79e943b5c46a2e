use serde::Serialize;
use serde_json::{Map, Value};

/// An untrusted, schema-less record as returned by the lookup API.
pub type RawRecord = Map<String, Value>;

/// Canonical slot name paired with its source aliases, highest priority first.
pub const ALIASES: [(&str, &[&str]); 4] = [
    ("name", &["name", "fullname", "user"]),
    ("mobile", &["mobile", "phone", "number"]),
    ("email", &["email", "mail"]),
    ("address", &["address", "location"]),
];

/// Display schema shared by every lookup source.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CanonicalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub others: Option<RawRecord>,
}

impl CanonicalRecord {
    pub fn slot(&self, slot: &str) -> Option<&Value> {
        match slot {
            "name" => self.name.as_ref(),
            "mobile" => self.mobile.as_ref(),
            "email" => self.email.as_ref(),
            "address" => self.address.as_ref(),
            _ => None,
        }
    }

    fn slot_mut(&mut self, slot: &str) -> Option<&mut Option<Value>> {
        match slot {
            "name" => Some(&mut self.name),
            "mobile" => Some(&mut self.mobile),
            "email" => Some(&mut self.email),
            "address" => Some(&mut self.address),
            _ => None,
        }
    }

    /// Canonical slots that hold a value, in display order.
    pub fn present_slots(&self) -> Vec<(&'static str, &Value)> {
        ALIASES
            .iter()
            .filter_map(|(slot, _)| self.slot(slot).map(|v| (*slot, v)))
            .collect()
    }
}

/// One normalized record, ready for display or export.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayRecord {
    Canonical(CanonicalRecord),
    PassThrough(RawRecord),
    Scalar { raw: Value },
}

/// Falsy values are null, false, zero, and empty strings, arrays or objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn is_aliased(key: &str) -> bool {
    ALIASES
        .iter()
        .any(|(_, aliases)| aliases.iter().any(|alias| *alias == key))
}

pub fn map_record(record: &RawRecord) -> CanonicalRecord {
    let mut mapped = CanonicalRecord::default();
    for (slot, aliases) in ALIASES.iter() {
        let picked = aliases
            .iter()
            .filter_map(|alias| record.get(*alias))
            .find(|v| is_truthy(v));
        if let (Some(value), Some(target)) = (picked, mapped.slot_mut(slot)) {
            *target = Some(value.clone());
        }
    }

    let others: RawRecord = record
        .iter()
        .filter(|(k, _)| !is_aliased(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !others.is_empty() {
        mapped.others = Some(others);
    }
    mapped
}

/// Maps any payload element onto the display schema. Non-mappings are
/// wrapped as `{"raw": value}` without going through the alias table.
pub fn auto_map_fields(value: &Value) -> DisplayRecord {
    match value {
        Value::Object(record) => DisplayRecord::Canonical(map_record(record)),
        other => DisplayRecord::Scalar { raw: other.clone() },
    }
}
