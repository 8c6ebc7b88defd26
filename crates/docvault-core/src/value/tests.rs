use super::*;
use chrono::TimeZone;

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn v_map(entries: &[(&str, Value)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect(),
    )
}

// ---- emptiness ---------------------------------------------------------

#[test]
fn zero_values_have_no_value() {
    for value in [
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Uint(0),
        Value::Float(0.0),
        v_txt(""),
        Value::Timestamp(DateTime::default()),
        Value::List(Vec::new()),
        Value::Array(vec![Value::Uint(0), Value::Text(String::new())]),
        v_map(&[]),
        Value::Struct(StructValue::new("Empty", vec![("a", Value::Int(0))])),
    ] {
        assert!(!value.has_value(), "{value:?}");
    }
}

#[test]
fn non_zero_values_have_value() {
    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    for value in [
        Value::Bool(true),
        Value::Int(-1),
        Value::Float(-0.0),
        v_txt(" "),
        Value::Timestamp(stamp),
        Value::List(vec![Value::Null]),
        Value::Array(vec![Value::Uint(0), Value::Uint(3)]),
        v_map(&[("k", Value::Null)]),
        Value::Struct(StructValue::new("Set", vec![("a", Value::Int(1))])),
    ] {
        assert!(value.has_value(), "{value:?}");
    }
}

// ---- shape -------------------------------------------------------------

#[test]
fn len_counts_chars_and_entries() {
    assert_eq!(v_txt("héllo").len(), Some(5));
    assert_eq!(Value::List(vec![Value::Null; 3]).len(), Some(3));
    assert_eq!(v_map(&[("a", Value::Null)]).len(), Some(1));
    assert_eq!(Value::Int(5).len(), None);
}

#[test]
fn into_storable_flattens_struct_snapshots() {
    let nested = Value::Struct(StructValue::new(
        "Outer",
        vec![
            ("name", v_txt("x")),
            (
                "inner",
                Value::List(vec![Value::Struct(StructValue::new(
                    "Inner",
                    vec![("n", Value::Uint(1))],
                ))]),
            ),
        ],
    ));

    let expected = v_map(&[
        ("name", v_txt("x")),
        ("inner", Value::List(vec![v_map(&[("n", Value::Uint(1))])])),
    ]);
    assert_eq!(nested.into_storable(), expected);
}

#[test]
fn option_converts_to_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("a")), v_txt("a"));
}

// ---- document ----------------------------------------------------------

#[test]
fn lookup_walks_maps_and_lists() {
    let doc: Document = [
        ("address".to_string(), v_map(&[("city", v_txt("Paris"))])),
        ("tags".to_string(), Value::List(vec![v_txt("a"), v_txt("b")])),
    ]
    .into_iter()
    .collect();

    assert_eq!(doc.lookup(&["address", "city"]), Some(&v_txt("Paris")));
    assert_eq!(doc.lookup(&["tags", "1"]), Some(&v_txt("b")));
    assert_eq!(doc.lookup(&["tags", "x"]), None);
    assert_eq!(doc.lookup(&["missing"]), None);
    assert_eq!(doc.lookup::<&str>(&[]), None);
}

#[test]
fn serializes_as_plain_json() {
    let doc: Document = [
        ("name".to_string(), v_txt("Ada")),
        ("age".to_string(), Value::Uint(36)),
        ("nick".to_string(), Value::Null),
        (
            "meta".to_string(),
            Value::Struct(StructValue::new("Meta", vec![("ok", Value::Bool(true))])),
        ),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Ada",
            "age": 36,
            "nick": null,
            "meta": { "ok": true },
        })
    );
}
