//! SeaORM用の非同期TestDatabaseヘルパー。
//!
//! テストはインメモリSQLiteで走る。接続を1本に固定しないと
//! `sqlite::memory:` がコネクションごとに別のデータベースになる。

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let connection = Database::connect(opt).await.expect("connect test db");

        Migrator::up(&connection, None)
            .await
            .expect("run migrations");

        Self { connection }
    }
}
