pub mod app;
pub mod auth;
pub mod settings;
pub mod webhooks;
