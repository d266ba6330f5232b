use axum::{extract::Request, ServiceExt};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storybook::{
    auth::GoogleProvider,
    build_app,
    session::{
        cleanup_task::{start_cleanup_task, CleanupConfig},
        repository::{InMemorySessionRepository, PostgresSessionRepository, SessionRepository},
        service::SessionService,
        token::TokenConfig,
    },
    story::repository::{InMemoryStoryRepository, PostgresStoryRepository, StoryRepository},
    user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    AppConfig, AppState,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Repositories = (
    Arc<dyn StoryRepository + Send + Sync>,
    Arc<dyn UserRepository + Send + Sync>,
    Arc<dyn SessionRepository + Send + Sync>,
);

async fn connect_repositories(
    database_url: Option<&str>,
) -> Result<Repositories, Box<dyn std::error::Error>> {
    let Some(database_url) = database_url else {
        warn!("DATABASE_URL not set, using in-memory stores; data is lost on restart");
        return Ok((
            Arc::new(InMemoryStoryRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Connected to PostgreSQL and applied migrations");

    Ok((
        Arc::new(PostgresStoryRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresSessionRepository::new(pool)),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storybook server");

    let config = AppConfig::from_env()?;
    let (story_repository, user_repository, session_repository) =
        connect_repositories(config.database_url.as_deref()).await?;

    let session_service = Arc::new(SessionService::new(
        session_repository,
        TokenConfig::with_secret(&config.jwt_secret, config.session_expiration_days),
    ));
    tokio::spawn(start_cleanup_task(
        Arc::clone(&session_service),
        CleanupConfig::default(),
    ));

    let app_state = AppState::new(
        story_repository,
        user_repository,
        session_service,
        Arc::new(GoogleProvider::new(config.google.clone())?),
    );
    let app = build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
