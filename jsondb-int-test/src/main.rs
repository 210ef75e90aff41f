use jsondb::doc;
use jsondb::errors::JsonDbResult;
use jsondb::index::btree_index;
use jsondb_int_test::test_util::{cleanup, create_test_context};

fn main() -> JsonDbResult<()> {
    colog::init();
    log::info!("Starting stress test...");
    let ctx = create_test_context()?;

    let count = 10_000;
    let records = ctx.db().open_collection("records")?;
    records.create_index("seq", &btree_index(16))?;

    let start = std::time::Instant::now();
    for i in 0..count {
        records.insert(&doc!(uuid::Uuid::new_v4().to_string(), {
            seq: i,
            processed: false,
            note: (format!("record {}", i)),
        }))?;
    }
    log::info!("Inserted {} records in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let rows = ctx.db().query("SELECT _id FROM records WHERE processed = false")?;
    log::info!("Queried {} unprocessed records in {:?}", rows.len(), start.elapsed());

    let start = std::time::Instant::now();
    for mut document in records.list_documents()? {
        document.put("processed", true)?;
        records.update(&document)?;
    }
    log::info!("Updated all records in {:?}", start.elapsed());

    let stats = records.index_stats("seq")?;
    log::info!("Index shape after updates: {:?}", stats);

    cleanup(ctx)
}
