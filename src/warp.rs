/// Instructions and warps.
/// A warp is an ordered group of instructions dispatched together to one
/// cluster; instruction j of the warp lands on core j mod the core count.
use serde::{Deserialize, Serialize};

use crate::alu::Opcode;
use crate::error::Result;

/// An immutable (opcode, operand1, operand2) triple.
///
/// Serialized as `{"op": "ADD", "a": 1, "b": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(rename = "op")]
    pub opcode: Opcode,
    #[serde(rename = "a")]
    pub operand1: i64,
    #[serde(rename = "b")]
    pub operand2: i64,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand1: i64, operand2: i64) -> Self {
        Instruction { opcode, operand1, operand2 }
    }

    /// Build from a mnemonic, failing on an unknown opcode.
    pub fn parse(opcode: &str, operand1: i64, operand2: i64) -> Result<Self> {
        Ok(Self::new(opcode.parse()?, operand1, operand2))
    }

    pub fn add(a: i64, b: i64) -> Self {
        Self::new(Opcode::Add, a, b)
    }

    pub fn sub(a: i64, b: i64) -> Self {
        Self::new(Opcode::Sub, a, b)
    }

    pub fn mul(a: i64, b: i64) -> Self {
        Self::new(Opcode::Mul, a, b)
    }

    pub fn div(a: i64, b: i64) -> Self {
        Self::new(Opcode::Div, a, b)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.opcode, self.operand1, self.operand2)
    }
}

/// An ordered sequence of instructions executed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Warp {
    pub instructions: Vec<Instruction>,
}

impl Warp {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Warp { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl From<Vec<Instruction>> for Warp {
    fn from(instructions: Vec<Instruction>) -> Self {
        Warp::new(instructions)
    }
}

impl FromIterator<Instruction> for Warp {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Warp::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_json_shape() {
        let json = serde_json::to_string(&Instruction::mul(3, 2)).unwrap();
        assert_eq!(json, r#"{"op":"MUL","a":3,"b":2}"#);
    }

    #[test]
    fn warp_deserializes_from_plain_array() {
        let warp: Warp =
            serde_json::from_str(r#"[{"op":"ADD","a":1,"b":1},{"op":"OR","a":4,"b":1}]"#).unwrap();
        assert_eq!(warp.len(), 2);
        assert_eq!(warp.instructions[1], Instruction::new(Opcode::Or, 4, 1));
    }

    #[test]
    fn unknown_opcode_in_json_is_rejected() {
        assert!(serde_json::from_str::<Instruction>(r#"{"op":"JMP","a":0,"b":0}"#).is_err());
        assert!(Instruction::parse("JMP", 0, 0).is_err());
    }
}
