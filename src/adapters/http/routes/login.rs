use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, extract::AppJson},
    app_error::AppResult,
    use_cases::waitlist::AccessProfile,
};

#[derive(Deserialize)]
struct LoginPayload {
    email: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    user: AccessProfile,
    message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /api/login
/// Only accepted waitlist entries get through. No session is issued here.
async fn login(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .waitlist_use_cases
        .login(payload.email.as_deref())
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        user,
        message: "Identity verified",
    }))
}
