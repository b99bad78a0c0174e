//! Pluggable persistence backend consumed by the platform auth framework.
//!
//! The framework only understands plain booleans and optionals: it cannot
//! tell "not found" from "storage broken", so implementations collapse their
//! failures to the fail-closed value (which makes the merchant log in again).

use async_trait::async_trait;

use crate::session::Session;

#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Insert or fully replace the session with `session.id`.
    async fn store_session(&self, session: Session) -> bool;

    /// Load a session by id.
    async fn load_session(&self, id: &str) -> Option<Session>;

    /// Delete a session by id. Deleting an absent id succeeds.
    async fn delete_session(&self, id: &str) -> bool;

    /// Delete a batch of sessions by id.
    async fn delete_sessions(&self, ids: &[String]) -> bool;

    /// All sessions issued for `shop`.
    async fn find_sessions_by_shop(&self, shop: &str) -> Vec<Session>;

    /// Delete every session issued for `shop`, including rows that no
    /// longer decode.
    async fn delete_sessions_by_shop(&self, shop: &str) -> bool;
}
