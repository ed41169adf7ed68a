use std::sync::Arc;

use axum::{
    Extension,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{server::TriggerState, warning};

pub async fn page(method: Method, Extension(state): Extension<Arc<TriggerState>>) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response();
    }

    match state.refresh_and_read().await {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                (header::CONTENT_LENGTH, body.len().to_string()),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            warning!("Cannot serve page: {}", e);
            let status = e.status();
            (status, status.to_string()).into_response()
        }
    }
}
