use pantry::errors::{ErrorKind, PantryError, PantryResult};
use pantry::pantry::Pantry;
use pantry::pantry_config::PersistenceMode;
use std::backtrace::Backtrace;
use std::path::Path;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test with retry logic and error handling.
///
/// `before` builds a fresh context for every attempt and `after` runs even if
/// the test returned an error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PantryResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> PantryResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> PantryResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx).map_err(|e| {
                        (format!("After run failed: {:?}", e), backtrace.to_string())
                    }),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        let failure = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_backtrace = Some(bt);
                e
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                last_backtrace = Some(Backtrace::capture().to_string());
                format!("Panic: {}", err_msg)
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", failure);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(failure);
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    db: Pantry,
}

impl TestContext {
    pub fn new(path: String, db: Pantry) -> Self {
        Self { path, db }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn db(&self) -> Pantry {
        self.db.clone()
    }

    /// Opens a second store on the same data directory, as a restarted
    /// process would. The original handle should no longer be written to.
    pub fn reopen(&self) -> PantryResult<Pantry> {
        let config = self.db.config();
        Pantry::builder()
            .data_dir(&self.path)
            .seed_sample_data(config.seed_sample_data())
            .persistence_mode(config.persistence_mode())
            .open()
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    env::temp_dir()
        .join(format!("pantry-{}", id))
        .to_string_lossy()
        .to_string()
}

fn open_context(seed: bool, mode: PersistenceMode) -> PantryResult<TestContext> {
    const MAX_ATTEMPTS: u32 = 3;
    let mut last_error: Option<PantryError> = None;

    for attempt in 1..=MAX_ATTEMPTS {
        let path = random_path();
        match Pantry::builder()
            .data_dir(&path)
            .seed_sample_data(seed)
            .persistence_mode(mode)
            .open()
        {
            Ok(db) => return Ok(TestContext::new(path, db)),
            Err(e) => {
                let _ = fs::remove_dir_all(&path);
                if attempt < MAX_ATTEMPTS {
                    eprintln!(
                        "Warning: Failed to create test context (attempt {}/{}): {:?}",
                        attempt, MAX_ATTEMPTS, e
                    );
                    thread::sleep(Duration::from_millis(50 * attempt as u64));
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        PantryError::new("Failed to create test context", ErrorKind::InternalError)
    }))
}

/// A store in a fresh directory, without the sample menu.
pub fn create_test_context() -> PantryResult<TestContext> {
    open_context(false, PersistenceMode::FailOpen)
}

/// A store in a fresh directory, seeded with the sample menu.
pub fn create_seeded_test_context() -> PantryResult<TestContext> {
    open_context(true, PersistenceMode::FailOpen)
}

/// A fail-closed store in a fresh directory, without the sample menu.
pub fn create_fail_closed_test_context() -> PantryResult<TestContext> {
    open_context(false, PersistenceMode::FailClosed)
}

pub fn cleanup(ctx: TestContext) -> PantryResult<()> {
    let path = ctx.path().to_string();
    for retry in 0..5u64 {
        if !Path::new(&path).exists() {
            return Ok(());
        }
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(e) if retry < 4 => {
                eprintln!("Warning: Failed to remove {} (retry {}): {}", path, retry, e);
                thread::sleep(Duration::from_millis(50 * (retry + 1)));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
