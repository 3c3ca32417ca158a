use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use log::*;

mod loader;
use loader::LoadError;
mod system;
use system::System;

const EXIT_USAGE: u8 = 1;
const EXIT_LOAD_FAILURE: u8 = 2;
const EXIT_FAULT: u8 = 3;

/// Run a program on an emulated LS-8.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Program image: one byte per line, in binary, `#` starts a comment
    program: PathBuf,
    /// Print PC, the next three bytes and every register to stderr before
    /// each instruction
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                // --help or --version
                ExitCode::SUCCESS
            };
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            if error.chain().any(|cause| cause.is::<LoadError>()) {
                ExitCode::from(EXIT_LOAD_FAILURE)
            } else {
                ExitCode::from(EXIT_FAULT)
            }
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let ram = loader::load(&args.program)?;
    let mut system = System::new(ram);
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    let result = if args.trace {
        system.run_traced(&mut output, &mut std::io::stderr())
    } else {
        system.run(&mut output)
    };
    result.with_context(|| {
        format!(
            "{} faulted ({})",
            args.program.display(),
            system.show_cpu_state()
        )
    })?;
    info!("{}", system.show_cpu_state());
    Ok(())
}
