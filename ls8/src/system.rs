use std::io::Write;

use ls8cpu::{Cpu, Fault, Ram, State};

/// A whole LS-8: one CPU and the RAM it owns.
pub struct System {
    cpu: Cpu,
    ram: Ram,
}

impl System {
    pub fn new(ram: Ram) -> System {
        System {
            cpu: Cpu::new(),
            ram,
        }
    }

    pub fn run<W: Write>(&mut self, output: &mut W) -> Result<(), Fault> {
        self.cpu.run(&mut self.ram, output)
    }

    /// Like `run`, but writes a trace line to `trace` before every
    /// instruction.
    pub fn run_traced<W: Write, T: Write>(
        &mut self,
        output: &mut W,
        trace: &mut T,
    ) -> Result<(), Fault> {
        while self.cpu.state() != State::Halted {
            writeln!(trace, "{}", self.cpu.trace(&mut self.ram)?)?;
            self.cpu.step(&mut self.ram, output)?;
        }
        Ok(())
    }

    pub fn show_cpu_state(&self) -> String {
        format!("CPU: {:?}", self.cpu)
    }
}
