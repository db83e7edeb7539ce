use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Applies `statement_timeout` to every pooled connection so a statement
/// still running when its operation's deadline passes is cancelled by the
/// server instead of holding the connection.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(Duration);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET statement_timeout = {}", self.0.as_millis()))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str, max_size: u32, operation_timeout: Duration) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(operation_timeout)
        .connection_customizer(Box::new(StatementTimeout(operation_timeout)))
        .build(manager)
        .expect("Failed to create database connection pool")
}
