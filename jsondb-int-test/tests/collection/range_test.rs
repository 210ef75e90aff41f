use std::ops::Bound;

use jsondb::common::Value;
use jsondb::doc;
use jsondb::index::btree_index;
use jsondb_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

fn ids(documents: &[jsondb::collection::Document]) -> Vec<String> {
    documents.iter().map(|d| d.id().to_string()).collect()
}

#[test]
fn test_inclusive_range_is_ordered() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            insert_test_documents(&users)?;
            users.create_index("age", &btree_index(2))?;

            let found = users.find_by_range(
                "age",
                Bound::Included(&Value::Integer(22)),
                Bound::Included(&Value::Integer(35)),
            )?;
            // ages 22, 30, 35
            assert_eq!(ids(&found), vec!["u2", "u1", "u4"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exclusive_and_open_bounds() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            insert_test_documents(&users)?;
            users.create_index("age", &btree_index(3))?;

            let above =
                users.find_by_range("age", Bound::Excluded(&Value::Integer(30)), Bound::Unbounded)?;
            assert_eq!(ids(&above), vec!["u4", "u3"]);

            let below =
                users.find_by_range("age", Bound::Unbounded, Bound::Excluded(&Value::Integer(22)))?;
            assert_eq!(ids(&below), vec!["u5"]);

            let all = users.find_by_range("age", Bound::Unbounded, Bound::Unbounded)?;
            assert_eq!(ids(&all), vec!["u5", "u2", "u1", "u4", "u3"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_range_skips_other_value_classes() {
    run_test(
        create_test_context,
        |ctx| {
            let items = ctx.db().open_collection("items")?;
            items.create_index("size", &btree_index(2))?;
            items.insert(&doc!("a", { size: 3 }))?;
            items.insert(&doc!("b", { size: "large" }))?;
            items.insert(&doc!("c", { size: true }))?;
            items.insert(&doc!("d", { size: 1.5 }))?;
            items.insert(&doc!("e", { size: [1, 2] }))?;

            let numbers = items.find_by_range(
                "size",
                Bound::Included(&Value::Integer(0)),
                Bound::Included(&Value::Integer(10)),
            )?;
            assert_eq!(ids(&numbers), vec!["d", "a"]);

            let strings = items.find_by_range(
                "size",
                Bound::Included(&Value::from("a")),
                Bound::Included(&Value::from("z")),
            )?;
            assert_eq!(ids(&strings), vec!["b"]);
            assert_eq!(items.index_stats("size")?.key_count, 4);
            Ok(())
        },
        cleanup,
    )
}
