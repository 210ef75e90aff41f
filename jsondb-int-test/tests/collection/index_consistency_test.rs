use std::cmp::Ordering;
use std::ops::Bound;

use jsondb::collection::{Collection, Document};
use jsondb::common::{compare_values, Value};
use jsondb::errors::{ErrorKind, JsonDbResult};
use jsondb::index::{btree_index, is_indexable};
use jsondb_int_test::test_util::{cleanup, create_test_context, run_test, sorted_ids};

const FIELD: &str = "v";
const STEPS: usize = 300;
const IDS: usize = 12;

// Small linear congruential generator so every run replays the same sequence.
struct Sequence(u64);

impl Sequence {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) % bound as u64) as usize
    }
}

// `None` leaves the field out of the document.
fn stored_values() -> Vec<Option<Value>> {
    vec![
        None,
        Some(Value::Integer(0)),
        Some(Value::Integer(1)),
        Some(Value::Integer(2)),
        Some(Value::Float(1.0)),
        Some(Value::Float(2.0)),
        Some(Value::Float(2.5)),
        Some(Value::from("1")),
        Some(Value::Bool(true)),
        Some(Value::Null),
    ]
}

fn lookup_values() -> Vec<Value> {
    vec![
        Value::Integer(0),
        Value::Integer(1),
        Value::Integer(2),
        Value::Integer(3),
        Value::Float(0.0),
        Value::Float(1.0),
        Value::Float(2.5),
        Value::from("1"),
        Value::Bool(true),
        Value::Bool(false),
        Value::Null,
    ]
}

fn same_key(stored: &Value, lookup: &Value) -> bool {
    let same_class = matches!(
        (stored, lookup),
        (Value::Bool(_), Value::Bool(_)) | (Value::String(_), Value::String(_))
    ) || (stored.is_number() && lookup.is_number());
    same_class && is_indexable(stored) && compare_values(stored, lookup) == Ordering::Equal
}

fn make_document(id: &str, value: Option<Value>) -> JsonDbResult<Document> {
    let mut document = Document::new(id);
    document.put("step", Value::from("generated"))?;
    if let Some(value) = value {
        document.put(FIELD, value)?;
    }
    Ok(document)
}

fn scan(collection: &Collection, keep: impl Fn(&Value) -> bool) -> JsonDbResult<Vec<String>> {
    let documents: Vec<Document> = collection
        .list_documents()?
        .into_iter()
        .filter(|d| d.field_value(FIELD).map_or(false, |v| keep(&v)))
        .collect();
    Ok(sorted_ids(&documents))
}

fn assert_consistent(collection: &Collection, step: usize) -> JsonDbResult<()> {
    for lookup in lookup_values() {
        let indexed = sorted_ids(&collection.find_by_index(FIELD, &lookup)?);
        let scanned = scan(collection, |stored| same_key(stored, &lookup))?;
        assert_eq!(indexed, scanned, "step {} lookup {}", step, lookup);
    }

    let lower = Value::Integer(1);
    let upper = Value::Float(2.0);
    let ranged =
        collection.find_by_range(FIELD, Bound::Included(&lower), Bound::Included(&upper))?;
    let scanned = scan(collection, |stored| {
        stored.is_number()
            && compare_values(stored, &lower) != Ordering::Less
            && compare_values(stored, &upper) != Ordering::Greater
    })?;
    assert_eq!(sorted_ids(&ranged), scanned, "step {} range", step);

    let stats = collection.index_stats(FIELD)?;
    assert!(stats.balanced, "step {} {:?}", step, stats);
    Ok(())
}

fn replay(collection: &Collection, seed: u64) -> JsonDbResult<()> {
    let values = stored_values();
    let mut sequence = Sequence(seed);
    for step in 0..STEPS {
        let id = format!("d{}", sequence.next(IDS));
        let value = values[sequence.next(values.len())].clone();
        match sequence.next(4) {
            0 => collection.insert(&make_document(&id, value)?)?,
            1 => collection.update(&make_document(&id, value)?)?,
            // the new version drops the indexed field
            2 => collection.update(&make_document(&id, None)?)?,
            _ => {
                if let Err(err) = collection.delete(&id) {
                    assert_eq!(err.kind(), &ErrorKind::NotFound, "step {}", step);
                }
            }
        }
        assert_consistent(collection, step)?;
    }
    Ok(())
}

#[test]
fn test_generated_mutations_keep_index_consistent() {
    run_test(
        create_test_context,
        |ctx| {
            for order in 2..=4 {
                let collection = ctx.db().open_collection(&format!("generated_{}", order))?;
                collection.create_index(FIELD, &btree_index(order))?;
                replay(&collection, 17 + order as u64)?;
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_created_mid_sequence_matches_scan() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().open_collection("late_index")?;
            let values = stored_values();
            let mut sequence = Sequence(99);
            for _ in 0..40 {
                let id = format!("d{}", sequence.next(IDS));
                let value = values[sequence.next(values.len())].clone();
                collection.insert(&make_document(&id, value)?)?;
            }

            collection.create_index(FIELD, &btree_index(2))?;
            assert_consistent(&collection, 0)?;
            replay(&collection, 5)
        },
        cleanup,
    )
}
