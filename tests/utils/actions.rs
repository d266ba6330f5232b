use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use serde_json::Value;
use tokio::time::{sleep, Duration};
use tower::ServiceExt; // for `oneshot`

use storybook::{auth::OAUTH_STATE_COOKIE, session::SESSION_COOKIE};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the full application, method override included
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST an urlencoded form, the way a browser submits one
    pub async fn post_form(&self, uri: &str, cookie: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Runs the provider callback for `username` and returns the session cookie
    pub async fn login(&self, username: &str) -> String {
        let state_cookie = format!("{}=integration-state", OAUTH_STATE_COOKIE);
        let response = self
            .get(
                &format!(
                    "/auth/google/callback?code={}&state=integration-state",
                    username
                ),
                Some(&state_cookie),
            )
            .await;

        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{}=", SESSION_COOKIE)))
            .map(str::to_string)
            .unwrap_or_else(|| panic!("login for {} did not set a session cookie", username))
    }

    /// Creates a story and waits a moment so creation times stay distinct
    pub async fn create_story(&self, cookie: &str, title: &str, status: &str) -> Response {
        let form = format!("title={}&body=Once+upon+a+time&status={}", title, status);
        let response = self.post_form("/stories", cookie, &form).await;
        sleep(Duration::from_millis(5)).await;
        response
    }

    /// Ids of the caller's stories as listed on their dashboard, newest first
    pub async fn dashboard_story_ids(&self, cookie: &str) -> Vec<String> {
        let json = body_json(self.get("/dashboard", Some(cookie)).await).await;
        json["data"]["stories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect()
    }
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
