use super::*;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

#[test]
fn kinds_of_builtin_types() {
    assert_eq!(true.kind(), Kind::Bool);
    assert_eq!(5i16.kind(), Kind::Int);
    assert_eq!(5usize.kind(), Kind::Uint);
    assert_eq!(1.5f32.kind(), Kind::Float);
    assert_eq!(String::new().kind(), Kind::String);
    assert_eq!(DateTime::<Utc>::default().kind(), Kind::Time);
    assert_eq!(Some(1u8).kind(), Kind::Pointer);
    assert_eq!(Box::new(1u8).kind(), Kind::Pointer);
    assert_eq!(Vec::<u8>::new().kind(), Kind::Slice);
    assert_eq!([0u8; 2].kind(), Kind::Array);
    assert_eq!(BTreeMap::<String, u8>::new().kind(), Kind::Map);
    assert_eq!(Value::Null.kind(), Kind::Dynamic);
    assert!(!Kind::Chan.is_supported());
    assert!(!Kind::Func.is_supported());
    assert_eq!(Kind::Pointer.to_string(), "ptr");
}

#[test]
fn emptiness_follows_zero_values() {
    assert!(!0u32.has_value());
    assert!(!None::<u32>.has_value());
    assert!(Some(0u32).has_value());
    assert!(Box::new(0u32).has_value());
    assert!(!Vec::<u32>::new().has_value());
    assert!(![0u32; 3].has_value());
    assert!([0u32, 7].has_value());
    assert!(![0u32; 0].has_value());
    assert!(!HashMap::<String, u32>::new().has_value());
}

#[test]
fn integers_assign_within_range() {
    let mut small = 0u8;
    small.assign(Value::Int(200)).unwrap();
    assert_eq!(small, 200);

    assert_eq!(
        small.assign(Value::Int(300)),
        Err(AssignError::OutOfRange {
            target: "u8",
            value: "300".to_string(),
        })
    );
    assert!(small.assign(Value::Int(-1)).is_err());
    assert!(small.assign(Value::from("1")).is_err());
    assert_eq!(small, 200);

    let mut signed = 0i64;
    signed.assign(Value::Uint(7)).unwrap();
    assert_eq!(signed, 7);
}

#[test]
fn floats_widen_from_integers() {
    let mut wide = 0f64;
    wide.assign(Value::Int(-3)).unwrap();
    assert!((wide + 3.0).abs() < f64::EPSILON);

    let mut narrow = 0f32;
    assert!(narrow.assign(Value::Float(f64::MAX)).is_err());
    narrow.assign(Value::Float(0.5)).unwrap();
    assert!((narrow - 0.5).abs() < f32::EPSILON);
}

#[test]
fn timestamps_accept_rfc3339_text() {
    let mut stamp = DateTime::<Utc>::default();
    stamp.assign(Value::from("2024-03-01T10:00:00+02:00")).unwrap();

    assert_eq!(stamp, Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
}

#[test]
fn option_assign_sets_and_clears() {
    let mut slot: Option<String> = None;

    slot.assign(Value::from("x")).unwrap();
    assert_eq!(slot.as_deref(), Some("x"));
    assert!(slot.pointee_mut().is_some());

    slot.assign(Value::Null).unwrap();
    assert_eq!(slot, None);
    assert!(slot.pointee_mut().is_none());
}

#[test]
fn arrays_require_exact_length() {
    let mut pair = [0u8; 2];

    pair.assign(Value::List(vec![Value::Uint(1), Value::Uint(2)]))
        .unwrap();
    assert_eq!(pair, [1, 2]);
    assert_eq!(
        pair.assign(Value::List(vec![Value::Uint(1)])),
        Err(AssignError::Length {
            expected: 2,
            found: 1,
        })
    );
    assert_eq!(
        <[u8; 2]>::from_value(Value::List(Vec::new())).map_err(|e| e.to_string()),
        Err("expected 2 elements, found 0".to_string())
    );
}

#[test]
fn arrays_snapshot_as_arrays() {
    let codes = [0u8, 0, 0];

    assert_eq!(codes.to_value(), Value::Array(vec![Value::Uint(0); 3]));
    assert_eq!(codes.to_value().into_storable(), Value::List(vec![Value::Uint(0); 3]));
    assert!(!codes.to_value().has_value());
}

#[test]
fn hash_map_entries_are_sorted() {
    let mut map: HashMap<String, u8> = ["c", "a", "b"]
        .iter()
        .map(|k| ((*k).to_string(), 0))
        .collect();

    let keys: Vec<_> = map.entries_mut().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn sequences_expose_their_elements() {
    let mut items = vec![1u8, 2, 3];

    for element in items.elements_mut() {
        element.assign(Value::Uint(9)).unwrap();
    }
    assert_eq!(items, [9, 9, 9]);
}

#[test]
fn field_source_hands_out_named_fields() {
    let value = Value::Map(BTreeMap::from([
        ("name".to_string(), Value::from("Ada")),
        ("age".to_string(), Value::Uint(36)),
    ]));
    let mut source = FieldSource::new("Person", value).unwrap();

    assert_eq!(source.take::<String>("name").unwrap(), "Ada");
    assert_eq!(source.take::<u8>("age").unwrap(), 36);
    assert_eq!(
        source.take::<bool>("admin"),
        Err(AssignError::MissingField {
            type_name: "Person",
            field: "admin",
        })
    );
    assert!(FieldSource::new("Person", Value::Int(1)).is_err());
}

#[test]
fn unsupported_kinds_refuse_assignment() {
    let (mut sender, _receiver) = std::sync::mpsc::channel::<u8>();

    assert_eq!(sender.kind(), Kind::Chan);
    assert_eq!(
        sender.assign(Value::Null),
        Err(AssignError::Unsupported("chan"))
    );
}
