/// Performance model: clock, power draw and heat.
///
/// The device ticks the clock once per dispatched warp and feeds the constant
/// power draw into the thermal model at the same time. There is no cooling
/// term: temperature only ever rises.
use serde::{Deserialize, Serialize};

/// Degrees of temperature rise per watt dissipated.
pub const DISSIPATION_FACTOR: f64 = 0.01;
/// Starting die temperature in °C.
pub const AMBIENT_TEMPERATURE: f64 = 25.0;

// ---------------------------------------------------------------------------
// Material
// ---------------------------------------------------------------------------

/// Physical constants of the die material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Thermal conductivity in W/(m·K)
    pub conductivity: f64,
    /// Melting point in °C
    pub melting_point: f64,
    /// Electron mobility in cm²/(V·s)
    pub mobility: f64,
}

impl Material {
    pub fn silicon() -> Self {
        Material {
            name: "Silicon".to_string(),
            conductivity: 149.0,
            melting_point: 1414.0,
            mobility: 1400.0,
        }
    }

    pub fn gallium_arsenide() -> Self {
        Material {
            name: "Gallium Arsenide".to_string(),
            conductivity: 55.0,
            melting_point: 1238.0,
            mobility: 8500.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::silicon()
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Clock {
    pub frequency_hz: f64,
    cycles: u64,
}

impl Clock {
    pub fn new(frequency_hz: f64) -> Self {
        Clock { frequency_hz, cycles: 0 }
    }

    /// Advance by one cycle. Saturates at `u64::MAX` rather than wrapping.
    pub fn tick(&mut self) {
        self.cycles = self.cycles.saturating_add(1);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Simulated wall time covered by the elapsed cycles.
    pub fn elapsed_seconds(&self) -> f64 {
        if self.frequency_hz > 0.0 {
            self.cycles as f64 / self.frequency_hz
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// PowerModel
// ---------------------------------------------------------------------------

/// Static power draw; not load-dependent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    pub voltage: f64,
    pub current: f64,
}

impl PowerModel {
    pub fn new(voltage: f64, current: f64) -> Self {
        PowerModel { voltage, current }
    }

    /// Watts = volts × amps.
    pub fn power_consumption(&self) -> f64 {
        self.voltage * self.current
    }
}

// ---------------------------------------------------------------------------
// ThermalModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ThermalModel {
    temperature: f64,
    pub material: Material,
}

impl ThermalModel {
    pub fn new(material: Material) -> Self {
        ThermalModel { temperature: AMBIENT_TEMPERATURE, material }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Linear accumulation: temperature += power × 0.01.
    pub fn dissipate(&mut self, power: f64) {
        let was_overheated = self.is_overheated();
        self.temperature += power * DISSIPATION_FACTOR;
        if !was_overheated && self.is_overheated() {
            tracing::warn!(
                material = %self.material.name,
                temperature = self.temperature,
                melting_point = self.material.melting_point,
                "die temperature passed the material's melting point"
            );
        }
    }

    /// Degrees remaining before the melting point (negative once exceeded).
    pub fn headroom(&self) -> f64 {
        self.material.melting_point - self.temperature
    }

    pub fn is_overheated(&self) -> bool {
        self.temperature >= self.material.melting_point
    }
}
