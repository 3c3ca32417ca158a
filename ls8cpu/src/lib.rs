//! An emulator for the LS-8, an 8-bit CPU with 256 bytes of memory, eight
//! general purpose registers and a stack that lives in that same memory.

mod error;
pub use error::Fault;
mod memory;
pub use memory::{Memory, Ram, MEMORY_SIZE};
mod opcode;
pub use opcode::{instruction_length, Opcode};
mod cpu;
pub use cpu::*;
pub mod image;
