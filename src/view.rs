use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// Render directive: a template name plus the data handed to it.
///
/// The actual templating engine lives outside this service, so a view is
/// serialized as `{"view": ..., "data": ...}` and the status travels with it.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub view: &'static str,
    pub data: Value,
    #[serde(skip)]
    pub status: StatusCode,
}

impl View {
    pub fn new(view: &'static str, data: Value) -> Self {
        Self {
            view,
            data,
            status: StatusCode::OK,
        }
    }

    /// Renders `view` with any serializable payload
    pub fn render<T: Serialize>(view: &'static str, data: &T) -> Self {
        let data = serde_json::to_value(data).unwrap_or_else(|e| {
            warn!(view, error = %e, "Failed to serialize view data");
            Value::Null
        });
        Self::new(view, data)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn not_found() -> Self {
        Self::new("error/404", json!({})).with_status(StatusCode::NOT_FOUND)
    }

    pub fn server_error() -> Self {
        Self::new("error/500", json!({})).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
