use axum::Router;
use sqlx::PgPool;
use std::env;
use std::sync::OnceLock;
use tokio::sync::{Mutex, MutexGuard};

use subscription_aggregator::storage::SubscriptionStore;
use subscription_aggregator::{router, AppState};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    id UUID PRIMARY KEY,
    service_name TEXT NOT NULL,
    price INTEGER NOT NULL,
    user_id UUID NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE
)"#;

static TEST_DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestDb {
    pub fn app(&self) -> Router {
        router(AppState {
            store: SubscriptionStore::new(self.pool.clone()),
        })
    }
}

/// Connects to `TEST_DATABASE_URL` and empties the table.
///
/// Tests using this are `#[ignore]`d; run them with `cargo test -- --ignored`.
pub async fn init_test_db() -> TestDb {
    dotenvy::dotenv().ok();
    let test_url = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");

    let lock = TEST_DB_LOCK.get_or_init(|| Mutex::new(()));
    let guard = lock.lock().await;

    let pool = PgPool::connect(&test_url).await.expect("connect test db");
    sqlx::query(SCHEMA)
        .execute(&pool)
        .await
        .expect("create subscriptions table");
    sqlx::query("TRUNCATE subscriptions")
        .execute(&pool)
        .await
        .expect("truncate subscriptions");

    TestDb { pool, _guard: guard }
}
