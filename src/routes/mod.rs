use std::sync::Arc;

use axum::Router;
use http::HeaderValue;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

pub mod api;
pub mod telephony;

/// Build the complete application: public routes plus Twilio routes, with
/// security headers on every response.
pub fn create_app(state: Arc<AppState>) -> Router {
    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    api::create_api_router()
        .merge(telephony::create_telephony_router())
        .with_state(state)
        .layer(security_headers)
}
