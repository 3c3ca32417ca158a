use super::{instruction_length, Fault, Memory, Opcode, MEMORY_SIZE};

use log::{debug, trace, warn};
use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io::Write,
};

pub mod alu;
use alu::{AluEffect, AluOp};

pub const REGISTER_COUNT: usize = 8;
/// R7 is the stack pointer. Nothing stops a program from using it for
/// something else, but PUSH and POP will still treat it as one.
pub const SP: u8 = 7;
/// Where the stack starts out. It grows down from here, towards the program.
pub const STACK_POINTER_INIT: u8 = 0xF4;

// Bits of the FL register. CMP sets exactly one of them.
/// **E**qual: the last comparison found both sides equal
pub const FLAG_EQUAL: u8 = 0b_0000_0001;
/// **G**reater: the left side was bigger
pub const FLAG_GREATER: u8 = 0b_0000_0010;
/// **L**ess: the left side was smaller
pub const FLAG_LESS: u8 = 0b_0000_0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Fresh out of `new` or `reset`, nothing executed yet.
    Ready,
    Running,
    /// Executed a HLT. The PC is left pointing at it.
    Halted,
    /// The last step faulted. The PC is left pointing at the culprit.
    Faulted,
}

/// What a single step ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executed {
    Instruction(Opcode),
    /// A byte we don't have an instruction for. It got skipped.
    Unknown(u8),
}

pub struct Cpu {
    /// General purpose registers. R7 is the stack pointer.
    reg: [u8; REGISTER_COUNT],
    /// The program counter. Wider than an address so that walking off the
    /// end of memory is an error instead of a silent wraparound.
    pc: u16,
    /// The flags register.
    fl: u8,
    state: State,
    instructions_executed: u64,
}

impl Debug for Cpu {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(
            fmt,
            "PC:{pc:02X} FL:{l}{g}{e} R0:{r0:02X} R1:{r1:02X} R2:{r2:02X} R3:{r3:02X} \
            R4:{r4:02X} R5:{r5:02X} R6:{r6:02X} SP:{sp:02X}",
            pc = self.pc,
            l = if is_bit_set(self.fl, FLAG_LESS) { "L" } else { "l" },
            g = if is_bit_set(self.fl, FLAG_GREATER) { "G" } else { "g" },
            e = if is_bit_set(self.fl, FLAG_EQUAL) { "E" } else { "e" },
            r0 = self.reg[0],
            r1 = self.reg[1],
            r2 = self.reg[2],
            r3 = self.reg[3],
            r4 = self.reg[4],
            r5 = self.reg[5],
            r6 = self.reg[6],
            sp = self.reg[SP as usize],
        )
    }
}

fn is_bit_set(input: u8, bit: u8) -> bool {
    input & bit == bit
}

fn register_index(index: u8) -> Result<usize, Fault> {
    if (index as usize) < REGISTER_COUNT {
        Ok(index as usize)
    } else {
        Err(Fault::RegisterFault { index })
    }
}

/// Memory address `offset` bytes past `base`, wrapping at the top of memory.
fn wrapped_address(base: u16, offset: u16) -> u16 {
    (base.wrapping_add(offset) as usize % MEMORY_SIZE) as u16
}

impl Cpu {
    pub fn new() -> Cpu {
        let mut reg = [0; REGISTER_COUNT];
        reg[SP as usize] = STACK_POINTER_INIT;
        Cpu {
            reg,
            pc: 0,
            fl: 0,
            state: State::Ready,
            instructions_executed: 0,
        }
    }

    /// Back to power-on state. Memory is not touched.
    pub fn reset(&mut self) {
        *self = Cpu::new();
    }

    pub fn get_register(&self, index: u8) -> Result<u8, Fault> {
        Ok(self.reg[register_index(index)?])
    }

    pub fn set_register(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        self.reg[register_index(index)?] = value;
        Ok(())
    }

    /// Decrement SP, then store `value` where it now points.
    ///
    /// There is no overflow check. A deep enough stack will happily walk
    /// down into the program.
    pub fn push_stack<M: Memory>(&mut self, memory: &mut M, value: u8) -> Result<(), Fault> {
        let sp = self.reg[SP as usize].wrapping_sub(1);
        self.reg[SP as usize] = sp;
        memory.write_byte(sp as u16, value)
    }

    /// Load the byte SP points at, then increment SP.
    pub fn pop_stack<M: Memory>(&mut self, memory: &mut M) -> Result<u8, Fault> {
        let sp = self.reg[SP as usize];
        let value = memory.read_byte(sp as u16)?;
        self.reg[SP as usize] = sp.wrapping_add(1);
        Ok(value)
    }

    /// Run until HLT, or until something faults.
    pub fn run<M: Memory, W: Write>(
        &mut self,
        memory: &mut M,
        output: &mut W,
    ) -> Result<(), Fault> {
        if self.state == State::Halted {
            return Ok(());
        }
        debug!("Running from {:02X}", self.pc);
        loop {
            self.step(memory, output)?;
            if self.state == State::Halted {
                break;
            }
        }
        debug!(
            "Halted at {:02X} after {} instructions",
            self.pc, self.instructions_executed
        );
        Ok(())
    }

    /// Fetch, decode and execute exactly one instruction.
    pub fn step<M: Memory, W: Write>(
        &mut self,
        memory: &mut M,
        output: &mut W,
    ) -> Result<Executed, Fault> {
        self.state = State::Running;
        match self.execute(memory, output) {
            Ok(executed) => {
                self.instructions_executed += 1;
                Ok(executed)
            }
            Err(fault) => {
                debug!("Faulted at {:02X}: {fault}", self.pc);
                self.state = State::Faulted;
                Err(fault)
            }
        }
    }

    fn execute<M: Memory, W: Write>(
        &mut self,
        memory: &mut M,
        output: &mut W,
    ) -> Result<Executed, Fault> {
        let opcode = memory.read_byte(self.pc)?;
        // Operands are fetched whether the instruction uses them or not.
        let operand_a = memory.read_byte(wrapped_address(self.pc, 1))?;
        let operand_b = memory.read_byte(wrapped_address(self.pc, 2))?;
        let length = instruction_length(opcode);
        let opcode = match Opcode::try_from(opcode) {
            Ok(opcode) => opcode,
            Err(unknown) => {
                warn!(
                    "Unknown opcode {unknown:08b} at {:02X}, skipping {length} byte(s)",
                    self.pc
                );
                self.pc += length;
                return Ok(Executed::Unknown(unknown));
            }
        };
        trace!("{:02X}: {opcode} {operand_a:02X} {operand_b:02X}", self.pc);
        match opcode {
            Opcode::Hlt => {
                self.state = State::Halted;
                return Ok(Executed::Instruction(opcode));
            }
            Opcode::Ldi => self.set_register(operand_a, operand_b)?,
            Opcode::Prn => {
                let value = self.get_register(operand_a)?;
                writeln!(output, "{value}")?;
                output.flush()?;
            }
            Opcode::Push => {
                let value = self.get_register(operand_a)?;
                self.push_stack(memory, value)?;
            }
            Opcode::Pop => {
                let destination = register_index(operand_a)?;
                self.reg[destination] = self.pop_stack(memory)?;
            }
            Opcode::Add => self.perform_alu_operation(AluOp::Add, operand_a, operand_b)?,
            Opcode::Sub => self.perform_alu_operation(AluOp::Sub, operand_a, operand_b)?,
            Opcode::Mul => self.perform_alu_operation(AluOp::Mul, operand_a, operand_b)?,
            Opcode::Div => self.perform_alu_operation(AluOp::Div, operand_a, operand_b)?,
            Opcode::Cmp => self.perform_alu_operation(AluOp::Cmp, operand_a, operand_b)?,
        }
        // Nothing we implement jumps, so every instruction falls through.
        self.pc += length;
        Ok(Executed::Instruction(opcode))
    }

    fn perform_alu_operation(&mut self, op: AluOp, reg_a: u8, reg_b: u8) -> Result<(), Fault> {
        match alu::evaluate(op, reg_a, reg_b, &self.reg)? {
            AluEffect::Register { index, value } => self.set_register(index, value),
            AluEffect::Flags(fl) => {
                self.fl = fl;
                Ok(())
            }
        }
    }

    /// One line of diagnostics: PC, the three bytes at PC, then every
    /// register, all in hex. Doesn't change anything.
    pub fn trace<M: Memory>(&self, memory: &mut M) -> Result<String, Fault> {
        let mut line = format!("TRACE: {:02X} |", self.pc);
        for offset in 0..3 {
            let byte = memory.read_byte(wrapped_address(self.pc, offset))?;
            line.push_str(&format!(" {byte:02X}"));
        }
        line.push_str(" |");
        for value in self.reg {
            line.push_str(&format!(" {value:02X}"));
        }
        Ok(line)
    }

    // Ways to inspect the state of the CPU, for debugging and testing.
    pub fn get_pc(&self) -> u16 {
        self.pc
    }
    pub fn get_fl(&self) -> u8 {
        self.fl
    }
    pub fn get_sp(&self) -> u8 {
        self.reg[SP as usize]
    }
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.reg
    }
    pub fn state(&self) -> State {
        self.state
    }
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}
