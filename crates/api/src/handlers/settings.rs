//! Handlers for the multi-database settings page.
//!
//! The page shows one checkbox per settings database. Each database loads
//! and saves independently: an unavailable database shows its own error
//! while the others keep working.

use axum::extract::{Form, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use shopkeep_core::error::CoreError;
use shopkeep_core::settings::StoreId;
use shopkeep_db::settings_store::{self, DatabaseStatus, SettingsUpdate};

use crate::error::{AppError, AppResult};
use crate::middleware::shop_session::ShopSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// The only form action the page submits.
pub const UPDATE_SETTINGS_ACTION: &str = "updateSettings";

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub db1: DatabaseStatus,
    pub db2: DatabaseStatus,
    pub db3: DatabaseStatus,
}

/// Form body posted by the settings page.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub action: String,
    #[serde(rename = "dbTarget")]
    pub db_target: Option<String>,
    #[serde(rename = "isChecked")]
    pub is_checked: Option<String>,
}

/// An update result echoed back with the page's own target name.
#[derive(Debug, Serialize)]
pub struct SettingsActionResult {
    #[serde(flatten)]
    pub result: SettingsUpdate,
    #[serde(rename = "dbTarget", skip_serializing_if = "Option::is_none")]
    pub db_target: Option<String>,
}

/// GET /app/settings
///
/// Load every settings database concurrently.
pub async fn load(
    auth: ShopSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SettingsPage>>> {
    let mut statuses = settings_store::load_all(&state.databases).await.into_iter();

    let (Some(db1), Some(db2), Some(db3)) = (statuses.next(), statuses.next(), statuses.next())
    else {
        return Err(AppError::Core(CoreError::Internal(
            "Settings page expects exactly three databases".into(),
        )));
    };

    tracing::debug!(
        shop = %auth.shop,
        db1 = db1.db_available,
        db2 = db2.db_available,
        db3 = db3.db_available,
        "Loaded settings page",
    );

    Ok(Json(DataResponse {
        data: SettingsPage { db1, db2, db3 },
    }))
}

/// POST /app/settings
///
/// Toggle one database's checkbox. Failures are reported in the body
/// (`success: false`) rather than as HTTP errors.
pub async fn submit(
    auth: ShopSession,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Json<DataResponse<SettingsActionResult>> {
    if form.action != UPDATE_SETTINGS_ACTION {
        tracing::warn!(shop = %auth.shop, action = %form.action, "Unknown settings action");
        return Json(DataResponse {
            data: SettingsActionResult {
                result: SettingsUpdate::failed("Unknown action"),
                db_target: None,
            },
        });
    }

    // A form without a target toggles the primary database.
    let target = form.db_target.unwrap_or_else(|| "DB1".to_string());
    let is_checked = form.is_checked.as_deref() == Some("true");
    let key = StoreId::key_for_page_target(&target);

    let result = settings_store::update(&state.databases, key, is_checked).await;
    if result.success {
        tracing::info!(shop = %auth.shop, db_target = %target, is_checked, "Setting saved");
    }

    Json(DataResponse {
        data: SettingsActionResult {
            result,
            db_target: Some(target),
        },
    })
}
