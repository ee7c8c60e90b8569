use crate::config::RunConfig;
use crate::cpu::{Cpu, CpuRegisterPair};
use crate::memory::{AddressSpace, Cartridge, CartridgeLoadError};
use crate::serialize::{self, SaveStateError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("error loading cartridge from {file_path}: {source}")]
    FileRead {
        file_path: String,
        #[source]
        source: CartridgeLoadError,
    },
    #[error("error loading save state from {file_path}: {source}")]
    LoadState {
        file_path: String,
        #[source]
        source: SaveStateError,
    },
}

/// Build the CPU a run starts from: a fresh machine at the configured entry point and stack
/// pointer, or the machine restored from a save state. Register presets are applied last in
/// either case.
pub fn init_cpu(run_config: &RunConfig) -> Result<Cpu, StartupError> {
    let cartridge =
        Cartridge::from_file(&run_config.rom_path).map_err(|source| StartupError::FileRead {
            file_path: run_config.rom_path.clone(),
            source,
        })?;
    let address_space = AddressSpace::new(cartridge);

    let mut cpu = match &run_config.load_state_path {
        Some(load_state_path) => serialize::load_state(load_state_path, address_space).map_err(
            |(source, _)| StartupError::LoadState {
                file_path: load_state_path.clone(),
                source,
            },
        )?,
        None => {
            let mut cpu = Cpu::new(address_space);
            cpu.set_reg16(CpuRegisterPair::PC, run_config.entry_point);
            cpu.set_reg16(CpuRegisterPair::SP, run_config.initial_sp);
            cpu
        }
    };

    for &assignment in &run_config.register_presets {
        log::debug!("Applying register preset {assignment}");
        cpu.apply_assignment(assignment);
    }

    log::debug!("Initial CPU registers: [{}]", cpu.registers());

    Ok(cpu)
}
