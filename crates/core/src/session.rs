//! Merchant authentication sessions.
//!
//! A [`Session`] ties a shop domain to an access token issued by the
//! platform's OAuth handshake. Offline sessions are long-lived and keyed by
//! [`offline_session_id`]; online sessions are per-user, expire, and carry
//! [`OnlineAccessInfo`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Timestamp;

/// Prefix of the id every offline session is stored under.
pub const OFFLINE_SESSION_PREFIX: &str = "offline_";

/// The id of the offline session for `shop`.
pub fn offline_session_id(shop: &str) -> String {
    format!("{OFFLINE_SESSION_PREFIX}{shop}")
}

/// The staff member an online session was issued for.
///
/// Missing fields decode to their defaults; the platform has added fields
/// over time and older rows lack them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociatedUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
    pub account_owner: bool,
    pub locale: String,
    pub collaborator: bool,
}

/// Extra payload present on online (per-user) sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineAccessInfo {
    pub expires_in: i64,
    pub associated_user_scope: String,
    pub associated_user: AssociatedUser,
}

/// A persisted authentication session.
#[derive(Clone, PartialEq, Validate)]
pub struct Session {
    #[validate(length(min = 1, message = "session id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "shop must not be empty"))]
    pub shop: String,
    /// OAuth handshake nonce; only meaningful while logging in.
    pub state: String,
    pub is_online: bool,
    /// Comma-separated granted scopes.
    pub scope: Option<String>,
    pub access_token: Option<String>,
    /// Absent for offline sessions.
    pub expires: Option<Timestamp>,
    pub online_access_info: Option<OnlineAccessInfo>,
}

impl Session {
    /// A bare session with no token, scope or expiry yet.
    pub fn new(
        id: impl Into<String>,
        shop: impl Into<String>,
        state: impl Into<String>,
        is_online: bool,
    ) -> Self {
        Self {
            id: id.into(),
            shop: shop.into(),
            state: state.into(),
            is_online,
            scope: None,
            access_token: None,
            expires: None,
            online_access_info: None,
        }
    }

    /// A session is expired once `expires` is set and not after `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Whether every scope in `required` is covered by the granted scopes.
    ///
    /// A granted `write_x` implies `read_x`.
    pub fn is_scope_satisfied(&self, required: &[String]) -> bool {
        let granted = expand_scopes(self.scope.as_deref().unwrap_or_default());
        required
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .all(|s| granted.contains(s))
    }

    /// Usable for API calls: has a token, is not expired, has the scopes.
    pub fn is_active(&self, required: &[String], now: Timestamp) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
            && !self.is_expired(now)
            && self.is_scope_satisfied(required)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("shop", &self.shop)
            .field("is_online", &self.is_online)
            .field("scope", &self.scope)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("expires", &self.expires)
            .field("online_access_info", &self.online_access_info)
            .finish_non_exhaustive()
    }
}

/// Split a comma-separated scope list, adding the `read_` scope implied by
/// every `write_` scope.
fn expand_scopes(scope: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    for s in scope.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(implied) = implied_read_scope(s) {
            set.insert(implied);
        }
        set.insert(s.to_string());
    }
    set
}

fn implied_read_scope(scope: &str) -> Option<String> {
    let (prefix, rest) = match scope.strip_prefix("unauthenticated_") {
        Some(rest) => ("unauthenticated_", rest),
        None => ("", scope),
    };
    rest.strip_prefix("write_")
        .map(|resource| format!("{prefix}read_{resource}"))
}
