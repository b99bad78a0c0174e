//! Row mapping for the `shopify_sessions` table.
//!
//! Column names are camelCase in the table, so every field carries an
//! explicit rename.

use shopkeep_core::error::CoreError;
use shopkeep_core::session::{OnlineAccessInfo, Session};
use shopkeep_core::types::{from_epoch_millis, to_epoch_millis, EpochMillis};
use sqlx::FromRow;

/// A row from the `shopify_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: String,
    pub shop: String,
    pub state: Option<String>,
    #[sqlx(rename = "isOnline")]
    pub is_online: Option<i64>,
    pub scope: Option<String>,
    #[sqlx(rename = "accessToken")]
    pub access_token: Option<String>,
    pub expires: Option<EpochMillis>,
    #[sqlx(rename = "onlineAccessInfo")]
    pub online_access_info: Option<String>,
}

impl SessionRow {
    /// Encode a session for storage.
    ///
    /// `expires` becomes epoch milliseconds, `online_access_info` JSON text
    /// and `is_online` 0/1.
    pub fn from_session(session: &Session) -> Result<Self, CoreError> {
        let online_access_info = session
            .online_access_info
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("Failed to encode onlineAccessInfo: {e}")))?;

        Ok(Self {
            id: session.id.clone(),
            shop: session.shop.clone(),
            state: Some(session.state.clone()),
            is_online: Some(i64::from(session.is_online)),
            scope: session.scope.clone(),
            access_token: session.access_token.clone(),
            expires: session.expires.as_ref().map(to_epoch_millis),
            online_access_info,
        })
    }

    /// Decode a stored row, inverting [`SessionRow::from_session`].
    pub fn into_session(self) -> Result<Session, CoreError> {
        let expires = self
            .expires
            .map(|millis| {
                from_epoch_millis(millis).ok_or_else(|| {
                    CoreError::Internal(format!("Session {} has invalid expires {millis}", self.id))
                })
            })
            .transpose()?;

        let online_access_info = self
            .online_access_info
            .as_deref()
            .map(serde_json::from_str::<OnlineAccessInfo>)
            .transpose()
            .map_err(|e| {
                CoreError::Internal(format!(
                    "Session {} has malformed onlineAccessInfo: {e}",
                    self.id
                ))
            })?;

        Ok(Session {
            id: self.id,
            shop: self.shop,
            state: self.state.unwrap_or_default(),
            is_online: self.is_online.unwrap_or(0) != 0,
            scope: self.scope,
            access_token: self.access_token,
            expires,
            online_access_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::session::AssociatedUser;

    fn online_session() -> Session {
        let mut session = Session::new("s-online", "a.myshopify.com", "nonce-1", true);
        session.scope = Some("read_products".into());
        session.access_token = Some("shpua_abc".into());
        session.expires = from_epoch_millis(1_767_225_600_250);
        session.online_access_info = Some(OnlineAccessInfo {
            expires_in: 86_400,
            associated_user_scope: "read_products".into(),
            associated_user: AssociatedUser {
                id: 902_541_635,
                first_name: "Jo".into(),
                last_name: "Doe".into(),
                email: "jo@example.com".into(),
                email_verified: true,
                account_owner: false,
                locale: "en".into(),
                collaborator: false,
            },
        });
        session
    }

    #[test]
    fn encodes_flags_and_timestamps() {
        let row = SessionRow::from_session(&online_session()).unwrap();
        assert_eq!(row.is_online, Some(1));
        assert_eq!(row.expires, Some(1_767_225_600_250));
        assert!(row.online_access_info.unwrap().contains("\"associated_user\""));
    }

    #[test]
    fn decode_inverts_encode() {
        let session = online_session();
        let decoded = SessionRow::from_session(&session)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn null_columns_decode_to_offline_defaults() {
        let row = SessionRow {
            id: "offline_a.myshopify.com".into(),
            shop: "a.myshopify.com".into(),
            state: None,
            is_online: None,
            scope: None,
            access_token: None,
            expires: None,
            online_access_info: None,
        };
        let session = row.into_session().unwrap();
        assert!(!session.is_online);
        assert_eq!(session.state, "");
        assert!(session.expires.is_none());
    }

    #[test]
    fn malformed_online_access_info_is_an_error() {
        let mut row = SessionRow::from_session(&online_session()).unwrap();
        row.online_access_info = Some("{not json".into());
        assert!(row.into_session().is_err());
    }
}
