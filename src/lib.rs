pub mod alu;
pub mod amplitude;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod gpu;
pub mod memory;
pub mod metrics;
pub mod power;
pub mod scheduler;
pub mod sm;
pub mod warp;

pub use error::{Result, SimError};
