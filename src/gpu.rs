/// Top-level GPU simulator.
/// Models a GPU as a set of core clusters behind a dispatch engine, plus flat
/// device memory, optional side stores, and a clock/power/thermal model that
/// advances once per dispatched warp.
use serde::Serialize;
use serde_json::{Map, Value};

use crate::amplitude::AmplitudeMemory;
use crate::config::DeviceConfig;
use crate::dispatch::DispatchEngine;
use crate::error::Result;
use crate::memory::{Cache, MemorySubsystem};
use crate::metrics::{now_ms, write_metrics, LiveMetrics};
use crate::power::{Clock, PowerModel, ThermalModel};
use crate::sm::CoreCluster;
use crate::warp::Warp;

/// Number of leading amplitudes reported by `describe()`.
pub const AMPLITUDE_SAMPLES: usize = 4;

pub struct GpuDevice {
    name: String,
    cores_per_cluster: usize,
    engine: DispatchEngine,
    memory: MemorySubsystem,
    clock: Clock,
    power: PowerModel,
    thermal: ThermalModel,
    amplitude: Option<AmplitudeMemory>,
    cache: Option<Cache>,
    live_metrics: bool,
}

/// Read-only diagnostic view of a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub clusters: usize,
    pub cores_per_cluster: usize,
    pub total_cores: usize,
    pub memory_bytes: usize,
    pub clock_hz: f64,
    pub power_watts: f64,
    pub cycles: u64,
    pub temperature: f64,
    pub material: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude_samples: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_bytes: Option<usize>,
}

impl GpuDevice {
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;

        let clusters = (0..config.clusters)
            .map(|id| CoreCluster::new(id, config.cores_per_cluster, config.registers_per_core))
            .collect::<Result<Vec<_>>>()?;
        let engine = DispatchEngine::new(clusters)?.with_parallel(config.parallel);
        let amplitude = config.amplitude_slots.map(AmplitudeMemory::new).transpose()?;

        tracing::info!(
            name = %config.name,
            clusters = config.clusters,
            cores_per_cluster = config.cores_per_cluster,
            parallel = config.parallel,
            "initialized device"
        );

        Ok(GpuDevice {
            name: config.name,
            cores_per_cluster: config.cores_per_cluster,
            engine,
            memory: MemorySubsystem::new(config.memory_bytes),
            clock: Clock::new(config.clock_hz),
            power: PowerModel::new(config.voltage, config.current),
            thermal: ThermalModel::new(config.material),
            amplitude,
            cache: config.cache_bytes.map(Cache::new),
            live_metrics: config.live_metrics,
        })
    }

    /// Reference-preset device with a custom topology.
    pub fn with_topology(clusters: usize, cores_per_cluster: usize) -> Result<Self> {
        Self::new(DeviceConfig::reference().with_topology(clusters, cores_per_cluster))
    }

    pub fn reference() -> Result<Self> {
        Self::new(DeviceConfig::reference())
    }

    pub fn flagship() -> Result<Self> {
        Self::new(DeviceConfig::flagship())
    }

    /// Run a batch of warps. Warp i goes to cluster i mod C; results come
    /// back in submission order. After the batch, the clock ticks and the
    /// thermal model absorbs the power draw once per warp.
    ///
    /// Any failure aborts the whole batch: no results are returned and the
    /// performance model is left untouched.
    pub fn load_instructions<I, W>(&mut self, warps: I) -> Result<Vec<Vec<i64>>>
    where
        I: IntoIterator<Item = W>,
        W: Into<Warp>,
    {
        let warps: Vec<Warp> = warps.into_iter().map(Into::into).collect();
        let batch = warps.len();

        let results = match self.engine.execute(warps) {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(device = %self.name, error = %e, "batch aborted");
                self.publish_metrics("failed", batch);
                return Err(e);
            }
        };

        let watts = self.power.power_consumption();
        for _ in 0..results.len() {
            self.clock.tick();
            self.thermal.dissipate(watts);
        }

        tracing::info!(
            device = %self.name,
            warps = batch,
            cycles = self.clock.cycles(),
            temperature = self.thermal.temperature(),
            "batch complete"
        );
        self.publish_metrics("complete", batch);

        Ok(results)
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        let clusters = self.engine.clusters().len();
        DeviceSnapshot {
            name: self.name.clone(),
            clusters,
            cores_per_cluster: self.cores_per_cluster,
            total_cores: clusters * self.cores_per_cluster,
            memory_bytes: self.memory.size_bytes(),
            clock_hz: self.clock.frequency_hz,
            power_watts: self.power.power_consumption(),
            cycles: self.clock.cycles(),
            temperature: self.thermal.temperature(),
            material: self.thermal.material.name.clone(),
            amplitude_samples: self.amplitude.as_ref().map(|a| a.samples(AMPLITUDE_SAMPLES)),
            cache_bytes: self.cache.as_ref().map(Cache::capacity_bytes),
        }
    }

    /// The snapshot as a string → value mapping.
    pub fn describe(&self) -> Map<String, Value> {
        match serde_json::to_value(self.snapshot()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clusters(&self) -> &[CoreCluster] {
        self.engine.clusters()
    }

    pub fn dispatch_engine(&self) -> &DispatchEngine {
        &self.engine
    }

    pub fn memory(&self) -> &MemorySubsystem {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemorySubsystem {
        &mut self.memory
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn power(&self) -> &PowerModel {
        &self.power
    }

    pub fn thermal(&self) -> &ThermalModel {
        &self.thermal
    }

    pub fn amplitude(&self) -> Option<&AmplitudeMemory> {
        self.amplitude.as_ref()
    }

    pub fn cache(&self) -> Option<&Cache> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut Cache> {
        self.cache.as_mut()
    }

    fn publish_metrics(&self, status: &str, batch: usize) {
        if !self.live_metrics {
            return;
        }
        let clusters = self.engine.clusters();
        write_metrics(&LiveMetrics {
            status: status.to_string(),
            device_name: self.name.clone(),
            num_clusters: clusters.len(),
            cores_per_cluster: self.cores_per_cluster,
            cycles: self.clock.cycles(),
            temperature: self.thermal.temperature(),
            melting_point: self.thermal.material.melting_point,
            power_watts: self.power.power_consumption(),
            cluster_warps: clusters.iter().map(CoreCluster::warps_executed).collect(),
            last_batch_warps: batch,
            timestamp_ms: now_ms(),
        });
    }
}
