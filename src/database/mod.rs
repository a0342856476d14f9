pub mod manager;
pub mod models;
pub mod schema;
pub mod sql_store;
pub mod store;

pub use manager::{connect, StoreOptions};
pub use sql_store::{PgStore, SqliteStore};
pub use store::{DataError, Row, Store, WriteResult};
