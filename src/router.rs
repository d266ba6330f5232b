use axum::{
    extract::Request,
    http::Method,
    middleware, Router,
};
use tower::util::MapRequest;
use tower_http::trace::TraceLayer;

use crate::{auth, index, session::load_session, shared::AppState, story};

const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// The full application: routes plus method override, ready to serve
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Builds the router with every route group and the session loader
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(index::router())
        .merge(auth::router())
        .merge(story::router())
        .layer(middleware::from_fn_with_state(state.clone(), load_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wraps the router so HTML forms can reach PUT and DELETE routes.
/// The rewrite has to happen before routing, so it sits outside the router.
pub fn build_app(state: AppState) -> App {
    MapRequest::new(build_router(state), method_override as fn(Request) -> Request)
}

/// Rewrites a POST into PUT/DELETE when asked to via `?_method=` or the override header
pub fn method_override(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    let requested = req
        .headers()
        .get(METHOD_OVERRIDE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            req.uri().query().and_then(|query| {
                query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("_method="))
                    .map(str::to_string)
            })
        });

    match requested.map(|m| m.to_ascii_uppercase()).as_deref() {
        Some("PUT") => *req.method_mut() = Method::PUT,
        Some("DELETE") => *req.method_mut() = Method::DELETE,
        _ => {}
    }

    req
}
