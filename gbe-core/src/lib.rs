//! Instruction-level emulation of the Game Boy CPU (SM83) and its memory map.
//!
//! [`cpu::Cpu`] owns the register file and the [`memory::AddressSpace`] it executes against;
//! [`run`] is a headless driver that loads a ROM image and steps the CPU until it halts.

pub mod config;
pub mod cpu;
mod eventloop;
pub mod memory;
pub mod serialize;
mod startup;

use crate::cpu::{CpuRegisters, ExecutionError};
use crate::serialize::SaveStateError;
use thiserror::Error;

pub use config::RunConfig;
pub use eventloop::StopReason;
pub use startup::StartupError;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("error initializing emulator: {source}")]
    Startup {
        #[from]
        source: StartupError,
    },
    #[error("error executing CPU instruction: {source}")]
    Execution {
        #[from]
        source: ExecutionError,
    },
    #[error("error writing save state: {source}")]
    SaveState {
        #[from]
        source: SaveStateError,
    },
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub stop_reason: StopReason,
    pub registers: CpuRegisters,
}

/// Load the configured ROM (or save state) and run it to completion.
///
/// # Errors
///
/// This function will return an error if the ROM or save state cannot be loaded, if any
/// instruction fails to execute, or if the final save state cannot be written.
pub fn run(run_config: &RunConfig) -> Result<RunSummary, RunError> {
    log::info!("Running with config:\n{run_config}");

    let mut cpu = startup::init_cpu(run_config)?;

    let (steps, stop_reason) = eventloop::run(
        &mut cpu,
        run_config.max_steps,
        run_config.stop_on_halt,
        run_config.debug_timing,
    )?;

    log::info!("Stopped after {steps} instructions: {stop_reason}");

    if let Some(save_state_path) = &run_config.save_state_path {
        serialize::save_state(&cpu, save_state_path)?;
    }

    Ok(RunSummary {
        steps,
        stop_reason,
        registers: cpu.registers().clone(),
    })
}
