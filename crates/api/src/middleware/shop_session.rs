//! Session-backed authentication extractor for embedded admin routes.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use shopkeep_core::session::{offline_session_id, Session};
use shopkeep_core::shop::sanitize_shop;

use crate::state::AppState;

/// Header the platform sets on embedded and webhook requests.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// The requesting shop and its active offline session.
///
/// The shop comes from the `shop` query parameter, falling back to the
/// `X-Shopify-Shop-Domain` header. Any handler taking this extractor
/// redirects to `/auth/login` when the shop is unknown or its session is
/// missing, expired, or lacks the configured scopes.
#[derive(Debug, Clone)]
pub struct ShopSession {
    pub shop: String,
    pub session: Session,
}

#[derive(Debug, Deserialize)]
struct ShopQuery {
    shop: Option<String>,
}

/// Rejection sending the merchant back through login.
#[derive(Debug)]
pub struct LoginRedirect {
    pub shop: Option<String>,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        match self.shop {
            Some(shop) => Redirect::to(&format!("/auth/login?shop={shop}")).into_response(),
            None => Redirect::to("/auth/login").into_response(),
        }
    }
}

impl FromRequestParts<AppState> for ShopSession {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_shop = Query::<ShopQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.shop)
            .or_else(|| {
                parts
                    .headers
                    .get(SHOP_DOMAIN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            });

        let custom_domain = state.config.shopify.custom_shop_domain.as_deref();
        let Some(shop) = raw_shop.and_then(|raw| sanitize_shop(&raw, custom_domain)) else {
            return Err(LoginRedirect { shop: None });
        };

        let session = state
            .sessions
            .load_session(&offline_session_id(&shop))
            .await;

        match session {
            Some(session) if session.is_active(&state.config.shopify.scopes, chrono::Utc::now()) => {
                Ok(ShopSession { shop, session })
            }
            Some(_) => {
                tracing::info!(shop = %shop, "Session inactive, redirecting to login");
                Err(LoginRedirect { shop: Some(shop) })
            }
            None => {
                tracing::info!(shop = %shop, "No session found, redirecting to login");
                Err(LoginRedirect { shop: Some(shop) })
            }
        }
    }
}
