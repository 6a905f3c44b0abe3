pub mod database;
pub mod error;
