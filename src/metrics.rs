/// Live metrics for the TUI visualizer.
///
/// When a device is configured with `live_metrics`, it writes a JSON
/// snapshot to METRICS_PATH after every `load_instructions` batch. The viz
/// binary polls this file and re-renders the dashboard.
/// Writes are atomic (write to .tmp then rename) to avoid torn reads.
use serde::{Deserialize, Serialize};

pub const METRICS_PATH: &str = "/tmp/warpsim_live.json";

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct LiveMetrics {
    /// "idle" | "running" | "complete" | "failed"
    pub status: String,
    pub device_name: String,
    pub num_clusters: usize,
    pub cores_per_cluster: usize,
    /// Global cycle counter (one tick per dispatched warp)
    pub cycles: u64,
    /// Die temperature in °C
    pub temperature: f64,
    pub melting_point: f64,
    /// Static power draw in watts
    pub power_watts: f64,
    /// Warps executed so far, index = cluster id
    pub cluster_warps: Vec<u64>,
    /// Number of warps in the most recent batch
    pub last_batch_warps: usize,
    /// Unix timestamp in ms when this snapshot was written
    pub timestamp_ms: u64,
}

impl LiveMetrics {
    /// Temperature as a fraction of the way from ambient to the melting point.
    pub fn thermal_load(&self) -> f64 {
        let span = self.melting_point - crate::power::AMBIENT_TEMPERATURE;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.temperature - crate::power::AMBIENT_TEMPERATURE) / span).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// I/O helpers
// ---------------------------------------------------------------------------

/// Atomically write metrics to METRICS_PATH.
/// Uses a .tmp intermediate file + rename to avoid torn reads by the viz.
pub fn write_metrics(metrics: &LiveMetrics) {
    match serde_json::to_string(metrics) {
        Ok(json) => {
            let tmp = format!("{}.tmp", METRICS_PATH);
            if let Err(e) = std::fs::write(&tmp, &json).and_then(|_| std::fs::rename(&tmp, METRICS_PATH)) {
                tracing::debug!(error = %e, "could not publish live metrics");
            }
        }
        Err(e) => tracing::debug!(error = %e, "could not serialize live metrics"),
    }
}

/// Read the latest metrics snapshot. Returns None if the file doesn't exist
/// or can't be parsed (e.g. no simulation has run yet).
pub fn read_metrics() -> Option<LiveMetrics> {
    let data = std::fs::read_to_string(METRICS_PATH).ok()?;
    serde_json::from_str(&data).ok()
}

/// Returns current Unix time in milliseconds.
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
