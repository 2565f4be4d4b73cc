#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::Utc;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use sms_crm::db::{DbPool, establish_connection_pool};
use sms_crm::models::auth::AuthenticatedUser;
use sms_crm::models::config::{LlmConfig, ServerConfig};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const SECRET: &str = "integration-test-secret";
pub const USER_ID: &str = "6f9619ff-8b86-d011-b42d-00cf4fc964ff";
pub const OTHER_USER_ID: &str = "0d7f1c9a-3b2e-4f50-9a61-2c8e5d4b7a10";

/// Migrated SQLite database living in a temporary directory.
///
/// The directory and the database files are removed on drop.
pub struct TestDb {
    dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_string_lossy().into_owned();

        let mut conn = SqliteConnection::establish(&url).expect("open test database");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        let pool = establish_connection_pool(&url, 4).expect("build pool");

        Self { dir, path, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch directory next to the database, usable as image storage.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn server_config(storage_dir: &Path) -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        database_url: ":memory:".to_string(),
        db_pool_size: 1,
        secret: SECRET.to_string(),
        storage_dir: storage_dir.to_string_lossy().into_owned(),
        public_base_url: "http://localhost:8080".to_string(),
        fcm_service_account: None,
        deepseek: LlmConfig {
            api_url: "http://127.0.0.1:9/chat/completions".to_string(),
            api_key: None,
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 256,
            system_prompt: "You write short SMS messages.".to_string(),
            summary_prompt: "Summarize the conversation.".to_string(),
        },
    }
}

/// Signs a session token for `sub` carrying the given roles.
pub fn token(sub: &str, roles: &[&str]) -> String {
    let user = AuthenticatedUser {
        sub: sub.to_string(),
        email: "sales@example.com".to_string(),
        name: Some("Sales".to_string()),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    user.to_jwt(SECRET).expect("sign token")
}
