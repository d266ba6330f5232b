use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::service::SessionService;

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often expired sessions are swept
    pub cleanup_interval: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Starts the background task that periodically removes expired sessions
#[instrument(skip(session_service))]
pub async fn start_cleanup_task(session_service: Arc<SessionService>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        "Starting session cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;
        run_cleanup(&session_service).await;
    }
}

async fn run_cleanup(session_service: &SessionService) {
    match session_service.cleanup_expired_sessions().await {
        Ok(removed) => info!(removed_sessions = removed, "Session cleanup completed"),
        Err(e) => error!(error = %e, "Session cleanup task failed"),
    }
}
