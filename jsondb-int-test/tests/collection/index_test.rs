use jsondb::common::Value;
use jsondb::doc;
use jsondb::errors::ErrorKind;
use jsondb::index::{btree_index, IndexOptions};
use jsondb_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test, sorted_ids,
};

#[test]
fn test_index_built_from_existing_documents() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            insert_test_documents(&users)?;
            users.create_index("city", &btree_index(3))?;

            let found = users.find_by_index("city", &Value::from("Kazan"))?;
            assert_eq!(sorted_ids(&found), vec!["u1", "u3"]);
            assert!(users.has_index("city")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_index_follows_mutations() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.create_index("age", &btree_index(2))?;
            insert_test_documents(&users)?;

            let found = users.find_by_index("age", &Value::Integer(30))?;
            assert_eq!(sorted_ids(&found), vec!["u1"]);

            // update moves the document to its new key
            let mut moved = users.get_document("u1")?;
            moved.put("age", 22)?;
            users.update(&moved)?;
            assert!(users.find_by_index("age", &Value::Integer(30))?.is_empty());
            assert_eq!(
                sorted_ids(&users.find_by_index("age", &Value::Integer(22))?),
                vec!["u1", "u2"]
            );

            // re-insert under the same id also relocates
            users.insert(&doc!("u2", { name: "Mara", age: 50 }))?;
            assert_eq!(
                sorted_ids(&users.find_by_index("age", &Value::Integer(22))?),
                vec!["u1"]
            );

            users.delete("u1")?;
            assert!(users.find_by_index("age", &Value::Integer(22))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_integer_and_float_keys_match() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.create_index("score", &IndexOptions::default())?;
            users.insert(&doc!("a", { score: 7 }))?;
            users.insert(&doc!("b", { score: 7.0 }))?;

            let found = users.find_by_index("score", &Value::Float(7.0))?;
            assert_eq!(sorted_ids(&found), vec!["a", "b"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_documents_without_field_are_not_indexed() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            insert_test_documents(&users)?;
            users.create_index("email", &btree_index(4))?;

            // u4 has no email
            let stats = users.index_stats("email")?;
            assert_eq!(stats.key_count, 4);
            assert!(stats.balanced);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_large_index_stays_balanced() {
    run_test(
        create_test_context,
        |ctx| {
            let events = ctx.db().open_collection("events")?;
            events.create_index("seq", &btree_index(3))?;
            for i in 0..200 {
                events.insert(&doc!(format!("e{}", i), { seq: i, bucket: (i % 7) }))?;
            }
            for i in (0..200).step_by(3) {
                events.delete(&format!("e{}", i))?;
            }

            let stats = events.index_stats("seq")?;
            assert!(stats.balanced);
            assert_eq!(stats.key_count, 200 - 67);
            assert!(stats.max_keys_in_node <= 3);

            let found = events.find_by_index("seq", &Value::Integer(100))?;
            assert_eq!(sorted_ids(&found), vec!["e100"]);
            assert!(events.find_by_index("seq", &Value::Integer(99))?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_drop_and_list_indexes() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.create_index("name", &btree_index(5))?;
            users.create_index("age", &btree_index(5))?;
            assert_eq!(users.list_indexes()?, vec!["age", "name"]);

            users.drop_index("name")?;
            assert_eq!(users.list_indexes()?, vec!["age"]);
            assert_eq!(users.drop_index("name").unwrap_err().kind(), &ErrorKind::NotFound);
            assert_eq!(
                users.find_by_index("name", &Value::from("Ivan")).unwrap_err().kind(),
                &ErrorKind::NotFound
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_index_requests() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.create_index("age", &btree_index(5))?;

            assert_eq!(
                users.create_index("age", &btree_index(5)).unwrap_err().kind(),
                &ErrorKind::AlreadyExists
            );
            assert_eq!(
                users.create_index("", &btree_index(5)).unwrap_err().kind(),
                &ErrorKind::InvalidArgument
            );
            assert_eq!(
                users.create_index("name", &btree_index(1)).unwrap_err().kind(),
                &ErrorKind::InvalidArgument
            );
            assert_eq!(
                users.create_index("name", &IndexOptions::new("hash", 5)).unwrap_err().kind(),
                &ErrorKind::InvalidArgument
            );
            assert_eq!(users.list_indexes()?, vec!["age"]);
            Ok(())
        },
        cleanup,
    )
}
