/// Device configuration and named presets.
/// Presets fix cluster/core counts and performance-model constants; any
/// field missing from a JSON config falls back to the reference preset.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::DEFAULT_REGISTERS;
use crate::error::{Result, SimError};
use crate::power::Material;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Display name reported by `describe()`
    pub name: String,
    /// Number of core clusters (SMs)
    pub clusters: usize,
    pub cores_per_cluster: usize,
    /// Register file length of every core
    pub registers_per_core: usize,
    /// Flat device memory size in bytes
    pub memory_bytes: usize,
    pub clock_hz: f64,
    pub voltage: f64,
    pub current: f64,
    pub material: Material,
    /// Address-space size of the amplitude memory, if present
    pub amplitude_slots: Option<usize>,
    /// Capacity tag of the side cache, if present
    pub cache_bytes: Option<usize>,
    /// Drain clusters concurrently on the rayon pool
    pub parallel: bool,
    /// Publish a JSON snapshot for the `viz` binary after every batch
    pub live_metrics: bool,
}

impl DeviceConfig {
    /// Small baseline device: 2 clusters × 4 cores, 1 W static draw.
    pub fn reference() -> Self {
        DeviceConfig {
            name: "reference".to_string(),
            clusters: 2,
            cores_per_cluster: 4,
            registers_per_core: DEFAULT_REGISTERS,
            memory_bytes: 1024,
            clock_hz: 1.0e9,
            voltage: 1.0,
            current: 1.0,
            material: Material::silicon(),
            amplitude_slots: None,
            cache_bytes: None,
            parallel: false,
            live_metrics: false,
        }
    }

    /// Profile device with amplitude memory and a side cache.
    pub fn flagship() -> Self {
        DeviceConfig {
            name: "flagship".to_string(),
            clusters: 8,
            cores_per_cluster: 32,
            registers_per_core: 16,
            memory_bytes: 64 * 1024,       // 64KB
            clock_hz: 1.5e9,               // 1.5 GHz
            voltage: 1.1,
            current: 200.0,                // 220 W
            material: Material::silicon(),
            amplitude_slots: Some(1024),
            cache_bytes: Some(256 * 1024), // 256KB
            parallel: false,
            live_metrics: false,
        }
    }

    /// Look a preset up by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "reference" => Ok(Self::reference()),
            "flagship" => Ok(Self::flagship()),
            other => Err(SimError::Configuration(format!("unknown preset '{}'", other))),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: DeviceConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_topology(mut self, clusters: usize, cores_per_cluster: usize) -> Self {
        self.clusters = clusters;
        self.cores_per_cluster = cores_per_cluster;
        self
    }

    pub fn with_power(mut self, voltage: f64, current: f64) -> Self {
        self.voltage = voltage;
        self.current = current;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_live_metrics(mut self, live_metrics: bool) -> Self {
        self.live_metrics = live_metrics;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(SimError::Configuration(msg.to_string()));
        if self.clusters == 0 {
            return fail("cluster count must be at least 1");
        }
        if self.cores_per_cluster == 0 {
            return fail("cores per cluster must be at least 1");
        }
        if self.registers_per_core == 0 {
            return fail("registers per core must be at least 1");
        }
        if self.memory_bytes == 0 {
            return fail("memory size must be at least 1 byte");
        }
        if !(self.clock_hz.is_finite() && self.clock_hz > 0.0) {
            return fail("clock frequency must be positive");
        }
        // Negative draw would let the thermal model cool down
        if !(self.voltage.is_finite() && self.voltage >= 0.0)
            || !(self.current.is_finite() && self.current >= 0.0)
        {
            return fail("voltage and current must be non-negative");
        }
        if self.amplitude_slots == Some(0) {
            return fail("amplitude memory needs at least one slot");
        }
        Ok(())
    }

    pub fn total_cores(&self) -> usize {
        self.clusters * self.cores_per_cluster
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::reference()
    }
}
