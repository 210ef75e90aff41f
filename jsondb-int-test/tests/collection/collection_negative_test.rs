use jsondb::collection::Document;
use jsondb::doc;
use jsondb::errors::ErrorKind;
use jsondb::index::btree_index;
use jsondb_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_insert_empty_id() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            let err = users.insert(&Document::new("")).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
            assert_eq!(users.size()?, 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_missing_document() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            let err = users.get_document("ghost").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_missing_document() {
    run_test(
        create_test_context,
        |ctx| {
            let users = ctx.db().open_collection("users")?;
            let err = users.delete("ghost").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            db.open_collection("users")?;
            let err = db.open_collection("users").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::AlreadyExists));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let err = db.get_collection("users").err().map(|e| e.kind().clone());
            assert_eq!(err, Some(ErrorKind::NotFound));

            let err = db.drop_collection("users").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dropped_collection_handle() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let users = db.open_collection("users")?;
            users.insert(&doc!("u1", { name: "Ivan" }))?;
            users.create_index("name", &btree_index(5))?;
            db.drop_collection("users")?;

            assert!(users.is_dropped());
            assert_eq!(users.insert(&doc!("u2")).unwrap_err().kind(), &ErrorKind::InvalidOperation);
            assert_eq!(users.get_document("u1").unwrap_err().kind(), &ErrorKind::InvalidOperation);
            assert_eq!(users.list_indexes().unwrap_err().kind(), &ErrorKind::InvalidOperation);
            assert_eq!(
                db.query("SELECT * FROM users").unwrap_err().kind(),
                &ErrorKind::NotFound
            );
            Ok(())
        },
        cleanup,
    )
}
