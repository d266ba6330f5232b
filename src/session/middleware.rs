use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::{debug, instrument, warn};

use super::{
    guard::{require_authenticated, require_guest, CurrentUser, GuardDecision, RequestContext},
    SESSION_COOKIE,
};
use crate::shared::{AppError, AppState};

/// Session loader - resolves the session cookie into a RequestContext on every request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), session::load_session))
/// A missing, invalid, expired or revoked session yields an anonymous context.
#[instrument(skip_all, fields(uri = %req.uri()))]
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match jar.get(SESSION_COOKIE) {
        None => RequestContext::anonymous(),
        Some(cookie) => match state.session_service.validate_session(cookie.value()).await {
            Ok(claims) => {
                debug!(user_id = %claims.user_id, "Request carries a valid session");
                RequestContext::authenticated(CurrentUser {
                    user_id: claims.user_id,
                    session_id: claims.session_id,
                })
            }
            Err(AppError::DatabaseError(e)) => {
                warn!(error = %e, "Session lookup failed, treating request as anonymous");
                RequestContext::anonymous()
            }
            Err(e) => {
                debug!(error = %e, "Ignoring invalid session cookie");
                RequestContext::anonymous()
            }
        },
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

fn context_of(req: &Request) -> RequestContext {
    req.extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}

/// Only lets authenticated requests through and exposes the caller to handlers.
/// Handlers can then extract Extension(user): Extension<CurrentUser>.
pub async fn ensure_auth(mut req: Request, next: Next) -> Response {
    let ctx = context_of(&req);

    match require_authenticated(&ctx) {
        GuardDecision::Redirect(to) => {
            debug!(uri = %req.uri(), "Anonymous request redirected");
            Redirect::to(to).into_response()
        }
        GuardDecision::Allow => {
            if let Some(user) = ctx.user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
    }
}

/// Only lets anonymous requests through
pub async fn ensure_guest(req: Request, next: Next) -> Response {
    match require_guest(&context_of(&req)) {
        GuardDecision::Redirect(to) => Redirect::to(to).into_response(),
        GuardDecision::Allow => next.run(req).await,
    }
}
