use normcore_store::Instance;
use normcore_types::{FieldValue, IdKey, InstanceId, REF_KEY};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn fields_from(value: Value) -> BTreeMap<String, FieldValue> {
    match FieldValue::from(value) {
        FieldValue::Object(fields) => fields,
        _ => BTreeMap::new(),
    }
}

fn make_todo(id: i64) -> Instance {
    Instance::new(
        "Todo",
        Some(IdKey::Int(id)),
        fields_from(json!({"id": id, "test": true, "description": "write tests"})),
    )
}

// ── Construction ──────────────────────────────────────────────────

#[test]
fn new_assigns_fresh_handles() {
    let a = make_todo(1);
    let b = make_todo(1);
    assert_ne!(a.uid(), b.uid());
}

#[test]
fn model_and_key_accessors() {
    let todo = make_todo(7);
    assert_eq!(todo.model(), "Todo");
    assert_eq!(todo.key(), Some(&IdKey::Int(7)));
}

#[test]
fn keyless_instance() {
    let inst = Instance::new("Todo", None, fields_from(json!({"description": "x"})));
    assert_eq!(inst.key(), None);
}

// ── Field access ──────────────────────────────────────────────────

#[test]
fn typed_getters() {
    let todo = make_todo(3);
    assert_eq!(todo.get_i64("id"), Some(3));
    assert_eq!(todo.get_bool("test"), Some(true));
    assert_eq!(todo.get_str("description"), Some("write tests"));
    assert_eq!(todo.get_f64("id"), Some(3.0));
}

#[test]
fn getters_miss_on_absent_fields() {
    let todo = make_todo(3);
    assert_eq!(todo.get("nope"), None);
    assert_eq!(todo.get_bool("description"), None);
    assert!(!todo.contains_field("nope"));
}

#[test]
fn get_ref_reads_relation_fields() {
    let target = InstanceId::new();
    let mut todo = make_todo(3);
    todo.set("item", target);
    assert_eq!(todo.get_ref("item"), Some(target));
    assert_eq!(todo.get_ref("description"), None);
}

#[test]
fn fields_iterate_in_name_order() {
    let todo = make_todo(1);
    let names: Vec<&str> = todo.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["description", "id", "test"]);
    assert_eq!(todo.field_count(), 3);
}

// ── Mutation ──────────────────────────────────────────────────────

#[test]
fn set_returns_previous_value() {
    let mut todo = make_todo(1);
    let prev = todo.set("test", false);
    assert_eq!(prev, Some(FieldValue::Bool(true)));
    assert_eq!(todo.get_bool("test"), Some(false));
}

#[test]
fn unset_removes_field() {
    let mut todo = make_todo(1);
    assert_eq!(todo.unset("test"), Some(FieldValue::Bool(true)));
    assert_eq!(todo.unset("test"), None);
    assert!(!todo.contains_field("test"));
}

#[test]
fn merge_overwrites_mentioned_fields_only() {
    let mut todo = make_todo(1);
    todo.merge_fields(fields_from(json!({"test": false, "extra": 9})));
    assert_eq!(todo.get_bool("test"), Some(false));
    assert_eq!(todo.get_i64("extra"), Some(9));
    // untouched by the merge
    assert_eq!(todo.get_str("description"), Some("write tests"));
}

#[test]
fn merge_with_empty_data_changes_nothing() {
    let mut todo = make_todo(1);
    let before = todo.clone();
    todo.merge_fields(BTreeMap::new());
    assert_eq!(todo, before);
}

// ── Copies and export ─────────────────────────────────────────────

#[test]
fn detached_copy_shares_data_not_handle() {
    let todo = make_todo(5);
    let copy = todo.detached_copy();
    assert_ne!(copy.uid(), todo.uid());
    assert_eq!(copy.model(), todo.model());
    assert_eq!(copy.key(), todo.key());
    assert_eq!(copy.fields_cloned(), todo.fields_cloned());
}

#[test]
fn to_json_exports_fields() {
    let todo = make_todo(2);
    assert_eq!(
        todo.to_json(),
        json!({"description": "write tests", "id": 2, "test": true})
    );
}

#[test]
fn to_json_renders_refs_as_markers() {
    let target = InstanceId::new();
    let mut todo = make_todo(2);
    todo.set("item", target);
    let exported = todo.to_json();
    assert_eq!(exported["item"], json!({ REF_KEY: target.to_string() }));
}
