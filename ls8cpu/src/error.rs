use thiserror::Error;

/// Something went wrong badly enough that the CPU can't keep executing.
///
/// Unknown opcodes are *not* faults; the CPU reports them and moves on.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("address {address:#06X} is outside of memory")]
    AddressingFault { address: u16 },
    #[error("register R{index} does not exist")]
    RegisterFault { index: u8 },
    #[error("division by zero")]
    DivisionByZero,
    #[error("could not write program output")]
    Output(#[from] std::io::Error),
}
