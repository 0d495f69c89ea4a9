/// Error taxonomy for the simulator.
///
/// Any error raised while executing one instruction aborts the whole
/// `load_instructions` batch; nothing is retried.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Unknown gate variant or ALU opcode, or a gate missing an operand
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Memory, register or amplitude index outside its valid bounds
    #[error("{what} index {index} out of range (valid: {valid})")]
    OutOfRange {
        /// Which address space was indexed, e.g. "memory"
        what: &'static str,
        /// The offending index
        index: usize,
        /// Human-readable valid range, e.g. "[0, 1024)"
        valid: String,
    },

    /// Invalid device construction parameters
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Out-of-range error for a zero-based `[0, len)` address space.
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        SimError::OutOfRange { what, index, valid: format!("[0, {})", len) }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
