use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    session::{guard::DASHBOARD_PAGE, guard::LANDING_PAGE, RequestContext, SESSION_COOKIE},
    shared::{AppError, AppState},
    user::UserService,
};

/// Cookie holding the CSRF state between the login redirect and the callback
pub const OAUTH_STATE_COOKIE: &str = "storybook_oauth_state";

fn clear_state_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(OAUTH_STATE_COOKIE).path("/auth"))
}

/// HTTP handler starting delegated login
///
/// GET /auth/google
/// Redirects to the provider with a fresh CSRF state remembered in a cookie
#[instrument(name = "begin_login", skip_all)]
pub async fn begin_login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let request = state.identity_provider.authorization_request();

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, request.csrf_state))
        .path("/auth")
        .http_only(true)
        .same_site(SameSite::Lax);

    info!("Redirecting to identity provider");
    (jar.add(cookie), Redirect::to(&request.url))
}

/// Query parameters the provider sends back to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// HTTP handler for the provider callback
///
/// GET /auth/google/callback
/// Establishes a session and redirects to the dashboard, or back to the landing page on failure
#[instrument(name = "complete_login", skip_all)]
pub async fn complete_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = clear_state_cookie(jar);

    if let Some(error) = query.error {
        warn!(error = %error, "Identity provider reported an error");
        return Ok((jar, Redirect::to(LANDING_PAGE)).into_response());
    }

    let code = match (query.code, query.state, expected_state) {
        (Some(code), Some(returned), Some(expected)) if returned == expected => code,
        _ => {
            warn!("Login callback missing code or CSRF state mismatch");
            return Ok((jar, Redirect::to(LANDING_PAGE)).into_response());
        }
    };

    let profile = match state.identity_provider.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Identity provider rejected login");
            return Ok((jar, Redirect::to(LANDING_PAGE)).into_response());
        }
    };

    let user = UserService::new(Arc::clone(&state.user_repository))
        .find_or_create(&profile)
        .await?;
    let token = state.session_service.create_session(user.id).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    info!(user_id = %user.id, "User logged in");
    Ok((jar.add(cookie), Redirect::to(DASHBOARD_PAGE)).into_response())
}

/// HTTP handler for logging out
///
/// GET /auth/logout
/// Revokes the session and clears the cookie. A session that is already gone
/// counts as logged out; any other storage failure is reported instead of redirecting.
#[instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    ctx: Option<Extension<RequestContext>>,
) -> Result<(CookieJar, Redirect), (CookieJar, AppError)> {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    let user = ctx.and_then(|Extension(ctx)| ctx.user);

    if let Some(user) = user {
        match state.session_service.revoke_session(&user.session_id).await {
            Ok(()) | Err(AppError::NotFound(_)) => {
                info!(user_id = %user.user_id, "User logged out");
            }
            Err(e) => return Err((jar, e)),
        }
    }

    Ok((jar, Redirect::to(LANDING_PAGE)))
}
