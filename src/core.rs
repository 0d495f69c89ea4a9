/// Execution core: one ALU plus a private, fixed-size register file.
use crate::alu::Alu;
use crate::error::{Result, SimError};
use crate::warp::Instruction;

/// Default register file length per core.
pub const DEFAULT_REGISTERS: usize = 8;

pub struct ExecutionCore {
    pub id: usize,
    alu: Alu,
    /// register[0] holds the most recent result
    registers: Box<[i64]>,
    instructions_executed: u64,
}

impl ExecutionCore {
    /// `num_registers` must be at least 1; the cluster validates this.
    pub fn new(id: usize, num_registers: usize) -> Self {
        ExecutionCore {
            id,
            alu: Alu::new(),
            registers: vec![0i64; num_registers.max(1)].into_boxed_slice(),
            instructions_executed: 0,
        }
    }

    /// Execute one instruction and latch the result into register 0.
    pub fn run(&mut self, instruction: &Instruction) -> Result<i64> {
        let result =
            self.alu.execute(instruction.opcode, instruction.operand1, instruction.operand2)?;
        self.registers[0] = result;
        self.instructions_executed += 1;
        Ok(result)
    }

    pub fn register(&self, index: usize) -> Result<i64> {
        self.registers
            .get(index)
            .copied()
            .ok_or_else(|| SimError::out_of_range("register", index, self.registers.len()))
    }

    pub fn registers(&self) -> &[i64] {
        &self.registers
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }
}
