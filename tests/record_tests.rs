//! Scenario tests for records, factories and views.

use fixed_key_map::fixed::{FixedMapError, Record, RecordFactory, RecordMode};
use rstest::{fixture, rstest};

#[fixture]
fn person_factory() -> RecordFactory {
    RecordFactory::new(["id", "name", "age"]).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Text(&'static str),
    Number(i64),
}

// =============================================================================
// Tracked records
// =============================================================================

#[rstest]
fn test_tracked_person_scenario(person_factory: RecordFactory) {
    let mut record: Record<Column> = person_factory.create_record();

    record.put("name", Column::Text("shi")).unwrap();
    assert_eq!(record.get("name"), Some(&Column::Text("shi")));
    assert_eq!(record.len(), 1);
    assert!(!record.contains_key("age"));

    record.put("age", Column::Number(30)).unwrap();
    assert_eq!(record.len(), 2);

    let entries: Vec<_> = record.entries().iter().collect();
    assert_eq!(
        entries,
        vec![
            ("name", Some(&Column::Text("shi"))),
            ("age", Some(&Column::Number(30))),
        ]
    );

    assert_eq!(record.remove("name").unwrap(), Some(Column::Text("shi")));
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("name"), None);
}

#[rstest]
fn test_unknown_key_scenario() {
    let factory = RecordFactory::new(["x"]).unwrap();
    let mut record = factory.create_record();

    assert_eq!(
        record.put("y", 1).unwrap_err(),
        FixedMapError::UnknownKey {
            key: "y".to_string()
        }
    );
    assert_eq!(record.get("y"), None);
    assert!(!record.contains_key("y"));
    assert_eq!(record.remove("y").unwrap(), None);
}

#[rstest]
fn test_len_counts_puts_minus_removes(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    record.put("id", 1).unwrap();
    record.put("name", 2).unwrap();
    record.put("id", 3).unwrap();
    assert_eq!(record.len(), 2);

    record.remove("id").unwrap();
    assert_eq!(record.len(), 1);

    record.clear();
    assert_eq!(record.len(), 0);
    assert!(record.is_empty());
}

#[rstest]
fn test_put_after_remove_reports_no_previous(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    record.put("age", 30).unwrap();
    record.remove("age").unwrap();
    assert_eq!(record.put("age", 31).unwrap(), None);
}

#[rstest]
fn test_put_after_clear_reports_no_previous(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    record.put("age", 30).unwrap();
    record.clear();
    assert_eq!(record.put("age", 31).unwrap(), None);
    assert_eq!(record.len(), 1);
}

#[rstest]
fn test_presence_is_a_cache_key(person_factory: RecordFactory) {
    use std::collections::HashMap;

    let mut statements = HashMap::new();
    for touched in [vec!["age"], vec!["name", "age"], vec!["age"]] {
        let mut record = person_factory.create_record();
        for key in &touched {
            record.put(key, 0).unwrap();
        }
        *statements.entry(record.presence().clone()).or_insert(0) += 1;
    }

    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[&person_factory.presence_of(["age"]).unwrap()],
        2
    );
}

#[rstest]
fn test_clone_is_independent(person_factory: RecordFactory) {
    let mut original = person_factory.create_record();
    original.put("id", 1).unwrap();

    let mut copy = original.clone();
    copy.put("name", 2).unwrap();
    copy.remove("id").unwrap();

    assert_eq!(original.get("id"), Some(&1));
    assert!(!original.contains_key("name"));
    assert_ne!(original, copy);
}

#[rstest]
fn test_records_of_different_modes_differ() {
    let factory = RecordFactory::new(["a"]).unwrap();
    let dense = factory.create_record_from(vec![Some(1)]).unwrap();
    let tracked = factory
        .create_record_with(RecordMode::Tracked, Some(vec![Some(1)]))
        .unwrap();
    assert_ne!(dense, tracked);
}

// =============================================================================
// Dense records
// =============================================================================

#[rstest]
fn test_dense_scenario() {
    let factory = RecordFactory::new(["a", "b"]).unwrap();
    let mut record = factory.create_record_from(vec![Some(1), Some(2)]).unwrap();

    record.clear();
    assert_eq!(record.get("a"), None);
    assert!(record.contains_key("a"));
    assert_eq!(record.len(), 2);

    assert!(matches!(
        record.remove("a"),
        Err(FixedMapError::UnsupportedOperation {
            mode: RecordMode::Dense,
            ..
        })
    ));
}

#[rstest]
fn test_dense_empty_schema_is_empty() {
    let factory = RecordFactory::new(Vec::<String>::new()).unwrap();
    let record: Record<i32> = factory.create_record_from(Vec::new()).unwrap();
    assert!(record.is_empty());
    assert_eq!(record.iter().count(), 0);
}

#[rstest]
fn test_dense_row_source(person_factory: RecordFactory) {
    let rows = vec![
        vec![Some(1), Some(10), None],
        vec![Some(2), None, Some(40)],
    ];

    let records: Vec<Record<i32>> = rows
        .into_iter()
        .map(|row| person_factory.create_record_from(row))
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(records.iter().all(|record| record.len() == 3));
    assert_eq!(records[1].get("age"), Some(&40));
    assert!(records[0].contains_value(None));
    assert_eq!(
        records[1].vacant_keys().count(),
        0,
        "dense records have no vacant keys"
    );
}

// =============================================================================
// Views
// =============================================================================

#[rstest]
fn test_removal_paths_converge(person_factory: RecordFactory) {
    let mut base = person_factory.create_record();
    base.put_all([("id", 1), ("name", 2), ("age", 3)]).unwrap();

    let mut direct = base.clone();
    direct.remove("name").unwrap();

    let mut through_keys = base.clone();
    through_keys.keys_mut().retain(|key| key != "name").unwrap();

    let mut through_entries = base.clone();
    {
        let mut entries = through_entries.entries_mut();
        let mut cursor = entries.cursor();
        while let Some((key, _)) = cursor.advance() {
            if key == "name" {
                cursor.remove().unwrap();
            }
        }
    }

    let mut through_values = base;
    through_values
        .values_mut()
        .retain(|value| value != Some(&2))
        .unwrap();

    for record in [&through_keys, &through_entries, &through_values] {
        assert_eq!(record.presence(), direct.presence());
        assert_eq!(record, &direct);
    }
}

#[rstest]
fn test_view_sizes_track_mutations(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    let check = |record: &Record<i32>| {
        let len = record.len();
        assert_eq!(record.keys().len(), len);
        assert_eq!(record.values().len(), len);
        assert_eq!(record.entries().len(), len);
        assert_eq!(record.keys().iter().count(), len);
    };

    check(&record);
    record.put("age", 1).unwrap();
    check(&record);
    record.put("id", 2).unwrap();
    check(&record);
    record.remove("age").unwrap();
    check(&record);
    record.entries_mut().clear().unwrap();
    check(&record);
}

#[rstest]
fn test_cursor_remove_reports_presence(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    record.put("id", 1).unwrap();

    let mut values = record.values_mut();
    let mut cursor = values.cursor();
    assert_eq!(cursor.remove(), Ok(false));
    assert_eq!(cursor.advance(), Some(Some(&1)));
    assert_eq!(cursor.remove(), Ok(true));
    assert_eq!(cursor.remove(), Ok(false));
    assert_eq!(cursor.advance(), None);
}

#[rstest]
fn test_for_loop_over_record(person_factory: RecordFactory) {
    let mut record = person_factory.create_record();
    record.put("age", 30).unwrap();
    record.put("id", 7).unwrap();

    let mut seen = Vec::new();
    for (key, value) in &record {
        seen.push(format!("{key}={}", value.copied().unwrap_or_default()));
    }
    assert_eq!(seen, vec!["id=7", "age=30"]);
}
