//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::db::repository::ScheduleRepository;
use crate::services::{
    CommunicationOverview, EditorSession, ReferenceDataProvider, ScheduleStore, Shell,
};

/// Interval of the display clock.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Shared application state passed to all handlers.
///
/// Each component sits behind its own mutex and handlers hold a lock for the
/// whole operation. Handlers needing both the editor session and the store
/// lock the session first.
#[derive(Clone)]
pub struct AppState {
    /// Repository backing the store, kept for health checks
    pub repository: Arc<dyn ScheduleRepository>,
    pub store: Arc<Mutex<ScheduleStore>>,
    pub session: Arc<Mutex<EditorSession>>,
    pub communication: Arc<Mutex<CommunicationOverview>>,
    pub shell: Arc<Mutex<Shell>>,
}

impl AppState {
    /// Hydrate the store from `repository` and set up fresh view state.
    pub async fn new(
        repository: Arc<dyn ScheduleRepository>,
        reference: &dyn ReferenceDataProvider,
    ) -> Self {
        let store = ScheduleStore::hydrate(repository.clone(), reference).await;
        Self {
            repository,
            store: Arc::new(Mutex::new(store)),
            session: Arc::new(Mutex::new(EditorSession::new())),
            communication: Arc::new(Mutex::new(CommunicationOverview::default())),
            shell: Arc::new(Mutex::new(Shell::default())),
        }
    }

    /// Advance the communication clock every [`CLOCK_TICK`] until aborted.
    pub fn spawn_clock(&self) -> JoinHandle<()> {
        let communication = self.communication.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLOCK_TICK);
            loop {
                interval.tick().await;
                communication.lock().await.tick(Utc::now());
            }
        })
    }
}
