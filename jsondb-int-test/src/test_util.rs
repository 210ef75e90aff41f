use jsondb::collection::{Collection, Document};
use jsondb::database::Database;
use jsondb::doc;
use jsondb::errors::JsonDbResult;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test with retry logic and error handling.
/// Tests run on the current thread so every attempt sees a fresh context.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> JsonDbResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> JsonDbResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> JsonDbResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => match after(ctx.clone()) {
                        Ok(_) => Ok(()),
                        Err(e) => {
                            Err((format!("After run failed: {:?}", e), backtrace.to_string()))
                        }
                    },
                    Err(e) => {
                        let _ = after(ctx.clone());
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        let message = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, _bt))) => e,
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                format!("Panic: {}", err_msg)
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", message);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(message);
    }

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    db: Database,
}

impl TestContext {
    pub fn new(path: String, db: Database) -> Self {
        Self { path, db }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    let temp_dir = env::temp_dir();
    temp_dir.join(format!("jsondb-{}", id)).to_string_lossy().to_string()
}

#[cfg(not(feature = "memory"))]
pub fn create_test_context() -> JsonDbResult<TestContext> {
    use jsondb::config::DbConfig;

    let path = random_path();
    if std::path::Path::new(&path).exists() {
        let _ = fs::remove_dir_all(&path);
    }

    let db = Database::with_config(DbConfig::file_storage(&path, true));
    Ok(TestContext::new(path, db))
}

#[cfg(feature = "memory")]
pub fn create_test_context() -> JsonDbResult<TestContext> {
    Ok(TestContext::new(random_path(), Database::new()))
}

pub fn cleanup(ctx: TestContext) -> JsonDbResult<()> {
    let db = ctx.db();
    for name in db.list_collections() {
        db.drop_collection(&name)?;
    }

    let path = ctx.path().to_string();
    for retry in 0..5u64 {
        if !std::path::Path::new(&path).exists() {
            return Ok(());
        }
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(_) if retry < 4 => thread::sleep(Duration::from_millis(50 * (retry + 1))),
            Err(e) => {
                // Temp files will be cleaned up by OS eventually
                eprintln!("Warning: Failed to remove test directory {}: {:?}", path, e);
            }
        }
    }
    Ok(())
}

pub fn create_test_docs() -> Vec<Document> {
    vec![
        doc!("u1", {
            name: "Ivan",
            email: "ivan@example.com",
            age: 30,
            active: true,
            city: "Kazan"
        }),
        doc!("u2", {
            name: "Mara",
            email: "mara@example.com",
            age: 22,
            active: true,
            city: "Riga"
        }),
        doc!("u3", {
            name: "Olek",
            email: "olek@example.com",
            age: 41,
            active: false,
            city: "Kazan"
        }),
        doc!("u4", { name: "Pia", age: 35, active: true, score: 7.5 }),
        doc!("u5", {
            name: "Ravi",
            email: "ravi@example.com",
            age: 19,
            active: false,
            tags: ["new"]
        }),
    ]
}

pub fn insert_test_documents(collection: &Collection) -> JsonDbResult<()> {
    for document in create_test_docs() {
        collection.insert(&document)?;
    }
    Ok(())
}

pub fn sorted_ids(documents: &[Document]) -> Vec<String> {
    let mut ids: Vec<String> = documents.iter().map(|d| d.id().to_string()).collect();
    ids.sort();
    ids
}
