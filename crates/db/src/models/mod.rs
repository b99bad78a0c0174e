pub mod session;
pub mod setting;
