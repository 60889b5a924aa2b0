//! Shared fixtures for the integration tests: a migrated SQLite file per test
//! and a few seeding shortcuts.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};

use carwash_admin::domain::branch::{Branch, NewBranch};
use carwash_admin::repository::{BranchWriter, DieselRepository};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Hub every fixture is created in unless a test says otherwise.
pub const HUB: i32 = 1;

/// Migrated database file removed again on drop.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        remove_db_files(filename);

        let pool = establish_connection_pool(filename).expect("open the test database");
        let mut conn = pool.get().expect("test database connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("car-wash migrations apply");

        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Branch in [`HUB`] open 08:00 to 20:00.
    pub fn seed_branch(&self, name: &str) -> Branch {
        self.repo()
            .create_branch(&NewBranch::new(HUB, name, "1 Main St", "08:00", "20:00"))
            .expect("seed branch")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_db_files(&self.filename);
    }
}

fn remove_db_files(filename: &str) {
    for path in [
        filename.to_string(),
        format!("{filename}-shm"),
        format!("{filename}-wal"),
    ] {
        std::fs::remove_file(path).ok();
    }
}
