pub mod database;
pub mod executor;
pub mod storage;
pub mod types;
pub mod utils;

pub use database::Database;
pub use executor::result::StatementResult;
pub use executor::statement::Statement;
pub use types::error::{DatabaseError, Result};
