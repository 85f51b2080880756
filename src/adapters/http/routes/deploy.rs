use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, extract::AppJson},
    app_error::AppResult,
    domain::entities::waitlist_entry::WaitlistStatus,
    use_cases::waitlist::RegistrationForm,
};

#[derive(Deserialize)]
struct RegisterPayload {
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    role: Option<String>,
}

#[derive(Deserialize)]
struct StatusQuery {
    email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    success: bool,
    ticket_id: Uuid,
    queue_position: i64,
    status: WaitlistStatus,
    message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    success: bool,
    ticket_id: Uuid,
    queue_position: i64,
    status: WaitlistStatus,
    name: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/deploy", get(get_status).post(register))
}

/// POST /api/deploy
/// Joins the waitlist, or returns the existing ticket for a known email.
async fn register(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let ticket = app_state
        .waitlist_use_cases
        .register(RegistrationForm {
            name: payload.name,
            email: payload.email,
            company: payload.company,
            role: payload.role,
        })
        .await?;

    let message = if ticket.created {
        "Deployment request queued successfully"
    } else {
        "Already registered"
    };

    Ok(Json(RegisterResponse {
        success: true,
        ticket_id: ticket.ticket_id,
        queue_position: ticket.queue_position,
        status: ticket.status,
        message,
    }))
}

/// GET /api/deploy?email=
/// Re-fetches ticket status and queue position, used to restore a session.
async fn get_status(
    State(app_state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> AppResult<impl IntoResponse> {
    let ticket = app_state
        .waitlist_use_cases
        .get_status(query.email.as_deref())
        .await?;

    Ok(Json(StatusResponse {
        success: true,
        ticket_id: ticket.ticket_id,
        queue_position: ticket.queue_position,
        status: ticket.status,
        name: ticket.name,
    }))
}
