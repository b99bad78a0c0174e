//! Login entry point.
//!
//! The OAuth handshake itself is owned by the platform; this only validates
//! the shop the merchant typed in before sending them into the app.

use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use shopkeep_core::shop::sanitize_shop;

use crate::response::DataResponse;
use crate::state::AppState;

pub const MISSING_SHOP: &str = "Please enter your shop domain to log in";
pub const INVALID_SHOP: &str = "Please enter a valid shop domain to log in";

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub shop: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct LoginErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub errors: LoginErrors,
}

/// GET /auth/login
///
/// Without a `shop` parameter this just renders the empty form.
pub async fn login_page(State(state): State<AppState>, Query(params): Query<LoginParams>) -> Response {
    if params.shop.is_none() {
        return login_form(None);
    }
    login(&state, params)
}

/// POST /auth/login
pub async fn login_submit(State(state): State<AppState>, Form(params): Form<LoginParams>) -> Response {
    login(&state, params)
}

fn login(state: &AppState, params: LoginParams) -> Response {
    let raw = params.shop.as_deref().map(str::trim).unwrap_or_default();

    let error = if raw.is_empty() {
        Some(MISSING_SHOP)
    } else {
        match sanitize_shop(raw, state.config.shopify.custom_shop_domain.as_deref()) {
            Some(shop) => {
                tracing::info!(shop = %shop, "Login requested");
                return Redirect::to(&format!("/app?shop={shop}")).into_response();
            }
            None => Some(INVALID_SHOP),
        }
    };

    login_form(error)
}

fn login_form(shop_error: Option<&'static str>) -> Response {
    Json(DataResponse {
        data: LoginPage {
            errors: LoginErrors { shop: shop_error },
        },
    })
    .into_response()
}
