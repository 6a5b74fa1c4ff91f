pub mod config;
pub mod connection;
pub mod records;

pub use connection::{init_db, Database};
