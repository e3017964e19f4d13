//! Pooled SQLite connection

use crate::infrastructure::config::AppConfig;
use di::Ref;
use di::inject;
use di::injectable;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

static TEST_POOL: Mutex<Option<SqlitePool>> = Mutex::new(None);

pub struct DatabaseConnection {
    connection: SqlitePool,
}

#[injectable]
impl DatabaseConnection {
    #[inject]
    pub fn create(config: Ref<AppConfig>) -> DatabaseConnection {
        if let Some(pool) = TEST_POOL.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            return DatabaseConnection { connection: pool };
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy(&config.database_url)
            .expect("Cannot connect to database");

        DatabaseConnection { connection: pool }
    }
}

impl DatabaseConnection {
    /// Makes every `DatabaseConnection` created through DI share `pool` until cleared.
    pub fn set_test_pool(pool: SqlitePool) {
        *TEST_POOL.lock().unwrap_or_else(|e| e.into_inner()) = Some(pool);
    }

    pub fn clear_test_pool() {
        *TEST_POOL.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl DerefMut for DatabaseConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
