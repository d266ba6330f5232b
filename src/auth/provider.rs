use async_trait::async_trait;
use oauth2::basic::{
    BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
    BasicTokenIntrospectionResponse, BasicTokenResponse,
};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, StandardRevocableToken, TokenResponse, TokenUrl,
};
use reqwest::{redirect, Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::GoogleConfig;
use crate::shared::AppError;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Only the basic profile is requested
pub const LOGIN_SCOPE: &str = "profile";

/// Identity details returned by the provider after a successful login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

/// Where to send the visitor, and the CSRF state the callback has to echo back
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: String,
}

/// External identity service performing delegated login
#[async_trait]
pub trait IdentityProvider {
    /// Starts a login with a fresh CSRF state
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Trades the callback's authorization code for the visitor's profile
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError>;
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

/// Google user info from API
#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl From<GoogleUser> for ProviderProfile {
    fn from(user: GoogleUser) -> Self {
        let first_name = user.given_name.unwrap_or_default();
        let last_name = user.family_name.unwrap_or_default();
        let display_name = user
            .name
            .unwrap_or_else(|| format!("{} {}", first_name, last_name).trim().to_string());

        Self {
            provider_id: user.id,
            display_name,
            first_name,
            last_name,
            image: user.picture,
        }
    }
}

/// OAuth client with the authorization and token endpoints set
type GoogleClient = oauth2::Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Google OAuth 2.0 authorization code flow
pub struct GoogleProvider {
    client: GoogleClient,
    http: Client,
}

fn endpoint_error(e: oauth2::url::ParseError) -> AppError {
    AppError::Config(format!("Invalid OAuth endpoint: {}", e))
}

impl GoogleProvider {
    pub fn new(config: GoogleConfig) -> Result<Self, AppError> {
        let client = BasicClient::new(ClientId::new(config.client_id))
            .set_client_secret(ClientSecret::new(config.client_secret))
            .set_auth_uri(AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(endpoint_error)?)
            .set_token_uri(TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(endpoint_error)?)
            .set_redirect_uri(RedirectUrl::new(config.callback_url).map_err(endpoint_error)?);

        // oauth2 expects a client that does not follow redirects
        let http = ClientBuilder::new()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, http })
    }
}

fn provider_error(context: &'static str) -> impl Fn(reqwest::Error) -> AppError {
    move |e| {
        warn!(error = %e, "{}", context);
        AppError::AuthFailure(format!("{}: {}", context, e))
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_request(&self) -> AuthorizationRequest {
        let (url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(LOGIN_SCOPE.to_string()))
            .url();

        AuthorizationRequest {
            url: url.to_string(),
            csrf_state: csrf_state.secret().clone(),
        }
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, AppError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| {
                warn!(error = %e, "Token exchange failed");
                AppError::AuthFailure(format!("Token exchange failed: {}", e))
            })?;

        debug!("Exchanged authorization code for access token");

        let user: GoogleUser = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(provider_error("Userinfo request failed"))?
            .json()
            .await
            .map_err(provider_error("Malformed userinfo response"))?;

        Ok(user.into())
    }
}
