pub mod deploy;
pub mod health;
pub mod login;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(deploy::router())
        .merge(login::router())
        .merge(health::router())
}
