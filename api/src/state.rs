use ai::{GeminiInsights, InsightGenerator};
use services::geofence::CampusLocation;
use services::operating_window::OperatingWindow;
use services::{AttendanceError, AttendanceRecorder, PersistenceGateway, SessionIssuer};
use std::sync::Arc;
use std::time::Duration;
use util::{config, paths};

/// Shared handles for every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<dyn PersistenceGateway>,
    issuer: SessionIssuer,
    recorder: AttendanceRecorder,
    insights: Arc<dyn InsightGenerator>,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        campus: CampusLocation,
        window: OperatingWindow,
        insights: Arc<dyn InsightGenerator>,
    ) -> Self {
        Self {
            issuer: SessionIssuer::new(gateway.clone()),
            recorder: AttendanceRecorder::new(gateway.clone(), campus, window),
            gateway,
            insights,
        }
    }

    /// Builds the state from `util::config`, probing the remote store once.
    pub async fn from_config() -> Result<Self, AttendanceError> {
        let (latitude, longitude, radius) = config::campus();
        let campus = CampusLocation::new(latitude, longitude, radius)?;
        let (open, close) = config::operating_window();

        let gateway = services::gateway::connect_gateway(
            &config::database_url(),
            Duration::from_millis(config::database_connect_timeout_ms()),
            Some(paths::local_store_path()),
        )
        .await;

        Ok(Self::new(
            gateway,
            campus,
            OperatingWindow::new(open, close),
            Arc::new(GeminiInsights::from_config()),
        ))
    }

    pub fn gateway(&self) -> &Arc<dyn PersistenceGateway> {
        &self.gateway
    }

    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }

    pub fn recorder(&self) -> &AttendanceRecorder {
        &self.recorder
    }

    pub fn insights(&self) -> &dyn InsightGenerator {
        self.insights.as_ref()
    }
}
