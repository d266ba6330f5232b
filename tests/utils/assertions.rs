//! Test assertion helpers - fluent API for verifying responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use serde_json::Value;

use super::actions::body_json;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct ResponseAssertion {
    response: Response,
}

impl ResponseAssertion {
    pub fn new(response: Response) -> Self {
        Self { response }
    }

    /// Assert the response is a redirect to `location`
    pub fn redirects_to(self, location: &str) {
        assert_eq!(self.response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            self.response.headers()[header::LOCATION].to_str().unwrap(),
            location
        );
    }

    /// Assert the response renders `view` with `status`, returning the view data
    pub async fn renders(self, status: StatusCode, view: &str) -> Value {
        assert_eq!(self.response.status(), status);
        let json = body_json(self.response).await;
        assert_eq!(json["view"], view);
        json["data"].clone()
    }

    pub async fn renders_ok(self, view: &str) -> Value {
        self.renders(StatusCode::OK, view).await
    }

    pub async fn renders_not_found(self) {
        self.renders(StatusCode::NOT_FOUND, "error/404").await;
    }
}
