use log::*;
use ls8cpu::{image, Cpu, Fault, Memory, Ram};
use std::process::ExitCode;

/// Every program we ship, and what it should print.
const PROGRAMS: &[(&str, &str, &str)] = &[
    ("print8", include_str!("../programs/print8.ls8"), "8\n"),
    ("mult", include_str!("../programs/mult.ls8"), "72\n"),
    ("divide", include_str!("../programs/divide.ls8"), "5\n"),
    ("stack", include_str!("../programs/stack.ls8"), "2\n4\n1\n"),
    ("arith", include_str!("../programs/arith.ls8"), "4\n255\n0\n"),
];

/// RAM that tells the log about every single bus access.
struct BusLogger {
    ram: Ram,
    reads: usize,
    writes: usize,
}

impl Memory for BusLogger {
    fn read_byte(&mut self, address: u16) -> Result<u8, Fault> {
        let data = self.ram.read_byte(address)?;
        trace!("Read: {address:02X} --> {data:02X}");
        self.reads += 1;
        Ok(data)
    }
    fn write_byte(&mut self, address: u16, data: u8) -> Result<(), Fault> {
        trace!("Write: {address:02X} <-- {data:02X}");
        self.writes += 1;
        self.ram.write_byte(address, data)
    }
}

fn run_program(name: &str, text: &str) -> Result<String, String> {
    let bytes = image::parse(text).map_err(|e| format!("bad image: {e}"))?;
    let mut bus = BusLogger {
        ram: Ram::from_image(&bytes).map_err(|e| e.to_string())?,
        reads: 0,
        writes: 0,
    };
    let mut cpu = Cpu::new();
    let mut output = Vec::new();
    cpu.run(&mut bus, &mut output)
        .map_err(|e| format!("{e} ({cpu:?})"))?;
    debug!(
        "{name}: {} instructions, {} reads, {} writes",
        cpu.instructions_executed(),
        bus.reads,
        bus.writes
    );
    String::from_utf8(output).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mut failures = 0;
    for &(name, text, expected) in PROGRAMS {
        match run_program(name, text) {
            Ok(output) if output == expected => info!("{name}: ok"),
            Ok(output) => {
                error!("{name}: expected {expected:?}, got {output:?}");
                failures += 1;
            }
            Err(e) => {
                error!("{name}: {e}");
                failures += 1;
            }
        }
    }
    if failures == 0 {
        println!("All {} programs behaved.", PROGRAMS.len());
        ExitCode::SUCCESS
    } else {
        println!("{failures} of {} programs misbehaved.", PROGRAMS.len());
        ExitCode::FAILURE
    }
}
