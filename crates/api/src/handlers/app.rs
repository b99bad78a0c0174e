//! Handlers for the landing page and the embedded app shell.

use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::Serialize;
use shopkeep_db::settings_store::{self, DatabaseAvailability};

use crate::middleware::shop_session::ShopSession;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LandingPage {
    pub show_form: bool,
}

#[derive(Debug, Serialize)]
pub struct AppShell {
    pub api_key: String,
    pub shop: String,
}

/// GET /
///
/// Visits that already carry a `shop` go straight into the app with the
/// same query string; everyone else gets the login form.
pub async fn index(RawQuery(query): RawQuery) -> impl IntoResponse {
    let has_shop = query
        .as_deref()
        .is_some_and(|q| q.split('&').any(|pair| pair.starts_with("shop=")));

    match query {
        Some(q) if has_shop => Redirect::to(&format!("/app?{q}")).into_response(),
        _ => Json(DataResponse {
            data: LandingPage { show_form: true },
        })
        .into_response(),
    }
}

/// GET /app
pub async fn shell(auth: ShopSession, State(state): State<AppState>) -> Json<DataResponse<AppShell>> {
    Json(DataResponse {
        data: AppShell {
            api_key: state.config.shopify.api_key.clone(),
            shop: auth.shop,
        },
    })
}

/// GET /app/databases
///
/// Which settings databases are bound in this deployment.
pub async fn databases(
    auth: ShopSession,
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<DatabaseAvailability>>> {
    let report = settings_store::availability_report(&state.databases);
    tracing::debug!(
        shop = %auth.shop,
        bound = ?state.databases.bound().collect::<Vec<_>>(),
        "Database availability requested",
    );
    Json(DataResponse { data: report })
}
