use std::fmt::{Display, Formatter, Result as FmtResult};

/// Every instruction the LS-8 knows how to execute.
///
/// The top two bits of each encoding are the operand count, which is why the
/// values look scattered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// HaLT
    Hlt = 0b0000_0001,
    /// PUSH register (onto the stack)
    Push = 0b0100_0101,
    /// POP (off the stack) into register
    Pop = 0b0100_0110,
    /// PRiNt register as decimal
    Prn = 0b0100_0111,
    /// LoaD Immediate
    Ldi = 0b1000_0010,
    /// ADD
    Add = 0b1010_0000,
    /// SUBtract
    Sub = 0b1010_0001,
    /// MULtiply
    Mul = 0b1010_0010,
    /// DIVide
    Div = 0b1010_0011,
    /// CoMPare
    Cmp = 0b1010_0111,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Ldi => "LDI",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Cmp => "CMP",
        }
    }

    pub fn length(self) -> u16 {
        instruction_length(self as u8)
    }
}

impl TryFrom<u8> for Opcode {
    /// The byte we didn't recognize.
    type Error = u8;
    fn try_from(byte: u8) -> Result<Opcode, u8> {
        Ok(match byte {
            0b0000_0001 => Opcode::Hlt,
            0b0100_0101 => Opcode::Push,
            0b0100_0110 => Opcode::Pop,
            0b0100_0111 => Opcode::Prn,
            0b1000_0010 => Opcode::Ldi,
            0b1010_0000 => Opcode::Add,
            0b1010_0001 => Opcode::Sub,
            0b1010_0010 => Opcode::Mul,
            0b1010_0011 => Opcode::Div,
            0b1010_0111 => Opcode::Cmp,
            x => return Err(x),
        })
    }
}

impl Display for Opcode {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.mnemonic())
    }
}

/// How many bytes the instruction starting with `opcode` occupies, opcode
/// byte included. Works for bytes we don't recognize, too.
pub fn instruction_length(opcode: u8) -> u16 {
    (opcode >> 6) as u16 + 1
}
