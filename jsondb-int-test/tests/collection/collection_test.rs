use jsondb::common::Value;
use jsondb::doc;
use jsondb_int_test::test_util::{
    cleanup, create_test_context, insert_test_documents, run_test, sorted_ids,
};

#[test]
fn test_insert_and_get() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.insert(&doc!("u1", { name: "Ivan", age: 30 }))?;

            let document = users.get_document("u1")?;
            assert_eq!(document.id(), "u1");
            assert_eq!(document.get("name"), Some(&Value::from("Ivan")));
            assert_eq!(document.get("age"), Some(&Value::Integer(30)));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_insert_replaces_existing_id() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.insert(&doc!("u1", { name: "Ivan" }))?;
            users.insert(&doc!("u1", { name: "Ivan Petrov", city: "Kazan" }))?;

            assert_eq!(users.size()?, 1);
            let document = users.get_document("u1")?;
            assert_eq!(document.get("name"), Some(&Value::from("Ivan Petrov")));
            assert_eq!(document.get("city"), Some(&Value::from("Kazan")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_and_delete() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            insert_test_documents(&users)?;
            assert_eq!(users.size()?, 5);

            let mut document = users.get_document("u2")?;
            document.put("age", 23)?;
            users.update(&document)?;
            assert_eq!(users.get_document("u2")?.get("age"), Some(&Value::Integer(23)));

            users.delete("u3")?;
            assert_eq!(users.size()?, 4);
            assert!(users.get_document("u3").is_err());

            let ids = sorted_ids(&users.list_documents()?);
            assert_eq!(ids, vec!["u1", "u2", "u4", "u5"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_values_survive_storage() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            users.insert(&doc!("u1", {
                name: "Ivan",
                tags: ["admin", "dev"],
                address: { city: "Kazan", zip: 420000 },
                score: 4.5,
                manager: (Option::<String>::None),
            }))?;

            let document = users.get_document("u1")?;
            assert_eq!(document.get("tags"), Some(&Value::from(vec!["admin", "dev"])));
            let address = document.get("address").and_then(|v| v.as_object()).cloned();
            assert_eq!(address.and_then(|a| a.get("zip").cloned()), Some(Value::Integer(420000)));
            assert_eq!(document.get("score"), Some(&Value::Float(4.5)));
            assert_eq!(document.get("manager"), Some(&Value::Null));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            db.open_collection("users")?;
            db.open_collection("orders")?;
            assert_eq!(db.list_collections(), vec!["orders", "users"]);

            db.drop_collection("orders")?;
            assert_eq!(db.list_collections(), vec!["users"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collections_are_isolated() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let users = db.open_collection("users")?;
            let orders = db.open_collection("orders")?;
            users.insert(&doc!("x1", { kind: "user" }))?;
            orders.insert(&doc!("x1", { kind: "order" }))?;

            assert_eq!(users.get_document("x1")?.get("kind"), Some(&Value::from("user")));
            assert_eq!(orders.get_document("x1")?.get("kind"), Some(&Value::from("order")));
            Ok(())
        },
        cleanup,
    )
}
