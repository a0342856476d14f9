pub mod db_service;
pub mod error;

pub use db_service::DbService;
pub use error::{ServiceError, ValidationError};
