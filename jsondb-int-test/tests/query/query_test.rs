use jsondb::common::Value;
use jsondb::query::Row;
use jsondb_int_test::test_util::{cleanup, create_test_context, insert_test_documents, run_test};

fn row_ids(rows: &[Row]) -> Vec<String> {
    let mut ids: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get("_id").and_then(|v| v.as_str()).map(String::from))
        .collect();
    ids.sort();
    ids
}

#[test]
fn test_select_all() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let rows = db.query("SELECT * FROM users")?;
            assert_eq!(rows.len(), 5);
            for row in &rows {
                assert_eq!(row.keys().next().map(String::as_str), Some("_id"));
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_projection_skips_missing_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let rows = db.query("SELECT name, email FROM users WHERE age >= 25 AND active = true")?;
            assert_eq!(rows.len(), 2);
            let mut names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
            names.sort();
            assert_eq!(names, vec!["Ivan", "Pia"]);

            // Pia has no email
            let pia = rows.iter().find(|r| r["name"] == Value::from("Pia"));
            assert_eq!(pia.map(|r| r.len()), Some(1));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_id_in_projection_and_condition() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let rows = db.query("SELECT _id, name FROM users WHERE _id = 'u3'")?;
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["_id"], Value::from("u3"));
            assert_eq!(rows[0]["name"], Value::from("Olek"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_or_and_string_conditions() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let rows = db.query("SELECT * FROM users WHERE city = 'Riga' OR age > 40")?;
            assert_eq!(row_ids(&rows), vec!["u2", "u3"]);

            let rows = db.query("SELECT * FROM users WHERE name != 'Ivan' AND active = true")?;
            assert_eq!(row_ids(&rows), vec!["u2", "u4"]);

            let rows = db.query("select * from users where name < 'N'")?;
            assert_eq!(row_ids(&rows), vec!["u1", "u2"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_numeric_coercion_in_conditions() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let rows = db.query("SELECT * FROM users WHERE age = 30.0")?;
            assert_eq!(row_ids(&rows), vec!["u1"]);

            let rows = db.query("SELECT * FROM users WHERE score > 7")?;
            assert_eq!(row_ids(&rows), vec!["u4"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_limit_and_offset_follow_backend_order() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            insert_test_documents(&db.open_collection("users")?)?;

            let all = db.query("SELECT * FROM users")?;
            let page = db.query("SELECT * FROM users LIMIT 2 OFFSET 1")?;
            assert_eq!(page, all[1..3].to_vec());

            let limited = db.query("SELECT * FROM users LIMIT 3")?;
            assert_eq!(limited, all[..3].to_vec());

            // an offset past the end leaves the rows untouched
            let past_end = db.query("SELECT * FROM users OFFSET 10")?;
            assert_eq!(past_end.len(), 5);

            assert!(db.query("SELECT * FROM users LIMIT 0")?.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_query_sees_latest_mutations() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let users = db.open_collection("users")?;
            insert_test_documents(&users)?;

            users.delete("u1")?;
            let mut mara = users.get_document("u2")?;
            mara.put("active", false)?;
            users.update(&mara)?;

            let rows = db.query("SELECT * FROM users WHERE active = true")?;
            assert_eq!(row_ids(&rows), vec!["u4"]);
            Ok(())
        },
        cleanup,
    )
}
