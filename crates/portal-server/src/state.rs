use crate::error::ApiError;
use crate::metrics;
use metrics_exporter_prometheus::PrometheusHandle;
use portal_core::{
    newest_first, ImageUpload, Incident, IncidentClock, IncidentStore, Submission, UploadDir,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IncidentStore>,
    pub uploads: Arc<UploadDir>,
    pub clock: Arc<IncidentClock>,
    pub write_lock: Arc<Mutex<()>>, // Serializes load-append-save within this process
    pub start_time: Instant,
    pub metrics: Option<PrometheusHandle>,
    pub client_build: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn IncidentStore>, uploads: UploadDir) -> Self {
        Self {
            store,
            uploads: Arc::new(uploads),
            clock: Arc::new(IncidentClock::new()),
            write_lock: Arc::new(Mutex::new(())),
            start_time: Instant::now(),
            metrics: None,
            client_build: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_client_build(mut self, dir: Option<PathBuf>) -> Self {
        self.client_build = dir;
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// All stored incidents, most recent first.
    pub fn list_incidents(&self) -> Vec<Incident> {
        newest_first(self.store.load())
    }

    pub async fn create_incident(
        &self,
        submission: Submission,
        image: Option<ImageUpload>,
    ) -> Result<Incident, ApiError> {
        let valid = submission.validate().map_err(|e| {
            tracing::debug!("Rejected incident: {}", e);
            metrics::record_rejection("validation");
            e
        })?;

        let image_name = match &image {
            Some(upload) => {
                let name = self.uploads.store(upload)?;
                metrics::record_image_stored(upload.bytes.len());
                Some(name)
            }
            None => None,
        };

        let stamp = self.clock.next();
        let incident = valid.into_incident(stamp.id, stamp.created_at, image_name);

        {
            let _guard = self.write_lock.lock().await;
            let mut incidents = self.store.load();
            incidents.push(incident.clone());
            if let Err(e) = self.store.save(&incidents) {
                if let Some(name) = &incident.image {
                    self.uploads.remove(name);
                }
                return Err(e.into());
            }
        }

        metrics::record_incident_created(incident.incident_type);
        tracing::info!("Incident created: {} ({})", incident.id, incident.incident_type);
        Ok(incident)
    }
}
