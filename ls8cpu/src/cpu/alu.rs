//! The arithmetic/logic unit. It only ever sees the register file, never
//! memory or the program counter.

use std::cmp::Ordering;

use super::{FLAG_EQUAL, FLAG_GREATER, FLAG_LESS, REGISTER_COUNT};
use crate::Fault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Cmp,
}

/// What an ALU operation wants done to the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluEffect {
    /// Store `value` in register `index`.
    Register { index: u8, value: u8 },
    /// Replace the FL register.
    Flags(u8),
}

fn read(registers: &[u8; REGISTER_COUNT], index: u8) -> Result<u8, Fault> {
    registers
        .get(index as usize)
        .copied()
        .ok_or(Fault::RegisterFault { index })
}

/// Work out the result of `op` applied to registers `reg_a` and `reg_b`.
/// Arithmetic results go back into `reg_a`, wrapping at 8 bits.
pub fn evaluate(
    op: AluOp,
    reg_a: u8,
    reg_b: u8,
    registers: &[u8; REGISTER_COUNT],
) -> Result<AluEffect, Fault> {
    let a = || read(registers, reg_a);
    let b = || read(registers, reg_b);
    let value = match op {
        AluOp::Add => a()?.wrapping_add(b()?),
        AluOp::Sub => a()?.wrapping_sub(b()?),
        AluOp::Mul => a()?.wrapping_mul(b()?),
        // u8 division already floors
        AluOp::Div => a()?.checked_div(b()?).ok_or(Fault::DivisionByZero)?,
        AluOp::Cmp => {
            let (lhs, rhs) = comparands(reg_a, reg_b, registers)?;
            return Ok(AluEffect::Flags(compare(lhs, rhs)));
        }
    };
    Ok(AluEffect::Register {
        index: reg_a,
        value,
    })
}

#[cfg(not(feature = "compare-register-indices"))]
fn comparands(
    reg_a: u8,
    reg_b: u8,
    registers: &[u8; REGISTER_COUNT],
) -> Result<(u8, u8), Fault> {
    Ok((read(registers, reg_a)?, read(registers, reg_b)?))
}

// The reference machine compares the operand bytes themselves, so CMP R1,R2
// is always "less" no matter what R1 and R2 hold.
#[cfg(feature = "compare-register-indices")]
fn comparands(
    reg_a: u8,
    reg_b: u8,
    _registers: &[u8; REGISTER_COUNT],
) -> Result<(u8, u8), Fault> {
    Ok((reg_a, reg_b))
}

fn compare(lhs: u8, rhs: u8) -> u8 {
    match lhs.cmp(&rhs) {
        Ordering::Equal => FLAG_EQUAL,
        Ordering::Greater => FLAG_GREATER,
        Ordering::Less => FLAG_LESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(a: u8, b: u8) -> [u8; REGISTER_COUNT] {
        [a, b, 0, 0, 0, 0, 0, 0xF4]
    }

    fn result_of(op: AluOp, a: u8, b: u8) -> Result<u8, Fault> {
        match evaluate(op, 0, 1, &with(a, b))? {
            AluEffect::Register { index: 0, value } => Ok(value),
            other => panic!("{op:?} had an unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn add_sub_mul_wrap_around() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let (wa, wb) = (a as u32, b as u32);
                assert_eq!(result_of(AluOp::Add, a, b).unwrap() as u32, (wa + wb) % 256);
                assert_eq!(result_of(AluOp::Mul, a, b).unwrap() as u32, (wa * wb) % 256);
                assert_eq!(
                    result_of(AluOp::Sub, a, b).unwrap() as u32,
                    (wa + 256 - wb) % 256
                );
            }
        }
    }

    #[test]
    fn div_floors() {
        for a in 0..=255u8 {
            for b in 1..=255u8 {
                assert_eq!(result_of(AluOp::Div, a, b).unwrap(), a / b);
            }
        }
        assert_eq!(result_of(AluOp::Div, 20, 4).unwrap(), 5);
        assert_eq!(result_of(AluOp::Div, 7, 2).unwrap(), 3);
    }

    #[test]
    fn div_by_zero_is_a_fault() {
        for a in 0..=255u8 {
            assert!(matches!(
                result_of(AluOp::Div, a, 0),
                Err(Fault::DivisionByZero)
            ));
        }
    }

    #[test]
    fn result_lands_in_the_first_register() {
        let registers = [0, 0, 0, 6, 0, 7, 0, 0xF4];
        assert_eq!(
            evaluate(AluOp::Mul, 3, 5, &registers).unwrap(),
            AluEffect::Register {
                index: 3,
                value: 42
            }
        );
    }

    #[test]
    fn nonexistent_register_is_a_fault() {
        let registers = with(1, 2);
        assert!(matches!(
            evaluate(AluOp::Add, 8, 0, &registers),
            Err(Fault::RegisterFault { index: 8 })
        ));
        assert!(matches!(
            evaluate(AluOp::Div, 0, 200, &registers),
            Err(Fault::RegisterFault { index: 200 })
        ));
    }

    #[test]
    fn cmp_sets_exactly_one_flag() {
        for a in 0..8u8 {
            for b in 0..8u8 {
                let registers = [9, 3, 3, 0, 255, 1, 9, 0xF4];
                match evaluate(AluOp::Cmp, a, b, &registers).unwrap() {
                    AluEffect::Flags(fl) => {
                        assert_eq!(fl.count_ones(), 1, "CMP R{a},R{b} gave {fl:03b}")
                    }
                    other => panic!("CMP had an unexpected effect: {other:?}"),
                }
            }
        }
    }

    #[cfg(not(feature = "compare-register-indices"))]
    #[test]
    fn cmp_compares_register_contents() {
        let registers = [10, 20, 10, 0, 0, 0, 0, 0xF4];
        assert_eq!(
            evaluate(AluOp::Cmp, 0, 2, &registers).unwrap(),
            AluEffect::Flags(FLAG_EQUAL)
        );
        assert_eq!(
            evaluate(AluOp::Cmp, 1, 0, &registers).unwrap(),
            AluEffect::Flags(FLAG_GREATER)
        );
        assert_eq!(
            evaluate(AluOp::Cmp, 0, 1, &registers).unwrap(),
            AluEffect::Flags(FLAG_LESS)
        );
        assert!(matches!(
            evaluate(AluOp::Cmp, 0, 9, &registers),
            Err(Fault::RegisterFault { index: 9 })
        ));
    }

    #[cfg(feature = "compare-register-indices")]
    #[test]
    fn cmp_compares_register_indices() {
        let registers = [10, 20, 10, 0, 0, 0, 0, 0xF4];
        assert_eq!(
            evaluate(AluOp::Cmp, 0, 2, &registers).unwrap(),
            AluEffect::Flags(FLAG_LESS)
        );
        assert_eq!(
            evaluate(AluOp::Cmp, 1, 0, &registers).unwrap(),
            AluEffect::Flags(FLAG_GREATER)
        );
        assert_eq!(
            evaluate(AluOp::Cmp, 3, 3, &registers).unwrap(),
            AluEffect::Flags(FLAG_EQUAL)
        );
    }
}
