//! Domain types and pure logic shared by the database and API crates.

pub mod error;
pub mod outcome;
pub mod session;
pub mod session_storage;
pub mod settings;
pub mod shop;
pub mod types;
