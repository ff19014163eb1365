use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use portal_core::IncidentType;

/// Installs the global Prometheus recorder and returns its render handle.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

pub fn record_incident_created(incident_type: IncidentType) {
    counter!("incidents_created_total", "incident_type" => incident_type.as_str()).increment(1);
}

pub fn record_rejection(reason: &'static str) {
    counter!("incident_rejections_total", "reason" => reason).increment(1);
}

pub fn record_image_stored(bytes: usize) {
    counter!("images_stored_total").increment(1);
    histogram!("image_bytes").record(bytes as f64);
}
