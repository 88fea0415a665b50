#![cfg(feature = "serde")]
//! Serialization tests for records, schemas and bit vectors.

use fixed_key_map::bits::BitVector;
use fixed_key_map::fixed::{RecordFactory, Schema};
use rstest::rstest;

#[rstest]
fn test_record_serializes_members_in_slot_order() {
    let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
    let mut record = factory.create_record();
    record.put("age", serde_json::json!(30)).unwrap();
    record.put("name", serde_json::json!("shi")).unwrap();

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        serde_json::json!({"name": "shi", "age": 30})
    );
}

#[rstest]
fn test_schema_round_trip_feeds_factory() {
    let schema = Schema::new(["id", "name"]).unwrap();
    let json = serde_json::to_string(&schema).unwrap();
    let restored: Schema = serde_json::from_str(&json).unwrap();

    let factory = RecordFactory::from_schema(restored);
    assert_eq!(factory.index_of("name"), Some(1));
}

#[rstest]
#[case(r#"["a","b","a"]"#)]
#[case(r#"["x","x"]"#)]
fn test_schema_rejects_duplicates(#[case] json: &str) {
    let error = serde_json::from_str::<Schema>(json).unwrap_err();
    assert!(error.to_string().contains("duplicated"));
}

#[rstest]
fn test_presence_serializes_as_set_positions() {
    let factory = RecordFactory::new(["id", "name", "age"]).unwrap();
    let presence = factory.presence_of(["id", "age"]).unwrap();

    let value = serde_json::to_value(&presence).unwrap();
    assert_eq!(value, serde_json::json!({"len": 3, "set": [0, 2]}));

    let restored: BitVector = serde_json::from_value(value).unwrap();
    assert_eq!(restored, presence);
}

#[rstest]
fn test_bit_vector_rejects_out_of_range_position() {
    let result = serde_json::from_str::<BitVector>(r#"{"len":2,"set":[5]}"#);
    assert!(result.is_err());
}
