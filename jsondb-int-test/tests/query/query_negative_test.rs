use jsondb::errors::ErrorKind;
use jsondb_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

#[test]
fn test_malformed_queries() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            for text in [
                "DELETE FROM users",
                "SELECT FROM users",
                "SELECT * FROM users WHERE name",
                "SELECT * FROM users WHERE name = Ivan",
                "SELECT * FROM users WHERE age = 1.2.3",
                "SELECT * FROM users LIMIT 99999999999999999999999",
            ] {
                let err = db.query(text).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::InvalidArgument, "{}", text);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unknown_collection() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.db().query("SELECT * FROM ghosts").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_incomparable_values_compare_equal() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            // a string field against a number literal never orders, so `=` holds
            // everywhere the field exists
            let rows = db.query("SELECT * FROM users WHERE name = 5")?;
            assert_eq!(rows.len(), 5);
            assert!(db.query("SELECT * FROM users WHERE name > 5")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}
