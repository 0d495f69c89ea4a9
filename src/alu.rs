/// Logic gates and the arithmetic logic unit.
///
/// Both are pure: the result depends only on the inputs, so a single ALU can
/// be shared by any number of cores without coordination.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// LogicGate
// ---------------------------------------------------------------------------

/// Bitwise gate primitive. NOT is the only unary variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicGate {
    And,
    Or,
    Not,
    Xor,
}

impl LogicGate {
    pub fn is_unary(&self) -> bool {
        matches!(self, LogicGate::Not)
    }

    /// Apply the gate bitwise. Binary gates require `b`; NOT ignores it.
    pub fn compute(&self, a: i64, b: Option<i64>) -> Result<i64> {
        let second = || {
            b.ok_or_else(|| {
                SimError::UnsupportedOperation(format!("{} gate needs two operands", self))
            })
        };
        match self {
            LogicGate::Not => Ok(!a),
            LogicGate::And => Ok(a & second()?),
            LogicGate::Or => Ok(a | second()?),
            LogicGate::Xor => Ok(a ^ second()?),
        }
    }
}

impl std::fmt::Display for LogicGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicGate::And => write!(f, "AND"),
            LogicGate::Or  => write!(f, "OR"),
            LogicGate::Not => write!(f, "NOT"),
            LogicGate::Xor => write!(f, "XOR"),
        }
    }
}

impl FromStr for LogicGate {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AND" => Ok(LogicGate::And),
            "OR" => Ok(LogicGate::Or),
            "NOT" => Ok(LogicGate::Not),
            "XOR" => Ok(LogicGate::Xor),
            other => Err(SimError::UnsupportedOperation(format!("unknown gate '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// The closed ALU instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Add => write!(f, "ADD"),
            Opcode::Sub => write!(f, "SUB"),
            Opcode::Mul => write!(f, "MUL"),
            Opcode::Div => write!(f, "DIV"),
            Opcode::And => write!(f, "AND"),
            Opcode::Or  => write!(f, "OR"),
        }
    }
}

impl FromStr for Opcode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ADD" => Ok(Opcode::Add),
            "SUB" => Ok(Opcode::Sub),
            "MUL" => Ok(Opcode::Mul),
            "DIV" => Ok(Opcode::Div),
            "AND" => Ok(Opcode::And),
            "OR" => Ok(Opcode::Or),
            other => Err(SimError::UnsupportedOperation(format!("unknown opcode '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------------

/// Stateless arithmetic logic unit.
///
/// Arithmetic wraps on overflow. Division by zero yields 0 instead of an
/// error; callers relying on a trap must check the divisor themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alu;

impl Alu {
    pub fn new() -> Self {
        Alu
    }

    pub fn execute(&self, opcode: Opcode, a: i64, b: i64) -> Result<i64> {
        match opcode {
            Opcode::Add => Ok(a.wrapping_add(b)),
            Opcode::Sub => Ok(a.wrapping_sub(b)),
            Opcode::Mul => Ok(a.wrapping_mul(b)),
            Opcode::Div => Ok(if b == 0 { 0 } else { a.wrapping_div(b) }),
            Opcode::And => LogicGate::And.compute(a, Some(b)),
            Opcode::Or => LogicGate::Or.compute(a, Some(b)),
        }
    }

    /// Execute by mnemonic, e.g. `"ADD"`.
    pub fn execute_named(&self, opcode: &str, a: i64, b: i64) -> Result<i64> {
        self.execute(opcode.parse()?, a, b)
    }
}
