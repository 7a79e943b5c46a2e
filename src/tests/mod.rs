use proptest::prelude::*;
use serde_json::{json, Map, Value};

use crate::client::{mock_lookup, LookupClient};
use crate::mapper::{self, DisplayRecord, ALIASES};
use crate::normalizer::handle_multiple_results;

fn map(value: Value) -> Value {
    serde_json::to_value(mapper::auto_map_fields(&value)).unwrap()
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::from),
    ]
}

fn alias_key() -> impl Strategy<Value = String> {
    let all: Vec<&'static str> = ALIASES
        .iter()
        .flat_map(|(_, aliases)| aliases.iter().copied())
        .collect();
    prop::sample::select(all).prop_map(str::to_string)
}

fn plain_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,10}".prop_filter("not an alias", |k| !mapper::is_aliased(k))
}

fn raw_record() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(
        (prop_oneof![alias_key(), plain_key()], scalar()),
        0..8,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

#[test]
fn phone_without_mobile_fills_mobile() {
    assert_eq!(
        map(json!({"phone": "555-0101", "city": "Delhi"})),
        json!({"mobile": "555-0101", "others": {"city": "Delhi"}})
    );
}

#[test]
fn mobile_beats_phone() {
    assert_eq!(
        map(json!({"phone": "2", "mobile": "1"})),
        json!({"mobile": "1"})
    );
}

#[test]
fn unrecognized_only_record_is_all_others() {
    let input = json!({"id": 7, "tags": ["a"], "meta": {"k": null}});
    assert_eq!(map(input.clone()), json!({ "others": input }));
}

#[test]
fn list_payload_maps_in_order() {
    let out = handle_multiple_results(&json!([{"name": "A"}, {"name": "B"}]), true);
    assert_eq!(
        serde_json::to_value(out).unwrap(),
        json!([{"name": "A"}, {"name": "B"}])
    );
}

#[test]
fn results_wrapper_maps_phone() {
    let out = handle_multiple_results(&json!({"results": [{"phone": "123"}]}), true);
    assert_eq!(serde_json::to_value(out).unwrap(), json!([{"mobile": "123"}]));
}

#[test]
fn scalar_payload_is_raw() {
    let out = handle_multiple_results(&json!("hello"), true);
    assert_eq!(out, vec![DisplayRecord::Scalar { raw: json!("hello") }]);
}

#[test]
fn mock_lookup_is_stable_across_clients() {
    let a = LookupClient::mock().lookup("9876543210");
    let b = LookupClient::mock().lookup("9876543210");
    assert_eq!(a, b);
    assert_eq!(a.payload, mock_lookup("9876543210"));
}

proptest! {
    #[test]
    fn others_hold_exactly_the_unaliased_keys(record in raw_record()) {
        let out = mapper::map_record(&record);
        let others = out.others.clone().unwrap_or_default();
        for (k, v) in record.iter() {
            if mapper::is_aliased(k) {
                prop_assert!(!others.contains_key(k));
            } else {
                prop_assert_eq!(others.get(k), Some(v));
            }
        }
        prop_assert_eq!(others.len(), record.keys().filter(|k| !mapper::is_aliased(k)).count());
        prop_assert!(out.others.as_ref().map(|o| !o.is_empty()).unwrap_or(true));
    }

    #[test]
    fn each_slot_takes_first_truthy_alias(record in raw_record()) {
        let out = mapper::map_record(&record);
        for (slot, aliases) in ALIASES.iter() {
            let expected = aliases
                .iter()
                .filter_map(|a| record.get(*a))
                .find(|v| mapper::is_truthy(v));
            prop_assert_eq!(out.slot(slot), expected);
        }
    }

    #[test]
    fn list_length_and_order_survive(records in prop::collection::vec(raw_record(), 0..6)) {
        let payload = Value::Array(records.iter().cloned().map(Value::Object).collect());
        let out = handle_multiple_results(&payload, true);
        prop_assert_eq!(out.len(), records.len());
        for (got, record) in out.iter().zip(records.iter()) {
            prop_assert_eq!(got, &DisplayRecord::Canonical(mapper::map_record(record)));
        }
        let raw = handle_multiple_results(&payload, false);
        for (got, record) in raw.iter().zip(records.iter()) {
            prop_assert_eq!(got, &DisplayRecord::PassThrough(record.clone()));
        }
    }

    #[test]
    fn mock_selection_is_deterministic(term in "\\PC{0,16}") {
        let picked = mock_lookup(&term);
        prop_assert_eq!(&picked, &mock_lookup(&term));
        prop_assert_eq!(picked["mobile"].as_str(), Some(term.as_str()));
    }
}
