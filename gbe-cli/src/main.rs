mod config;

use crate::config::{FileConfig, Overrides};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use gbe_core::cpu::{parse_u16, RegisterAssignment};

#[derive(Parser)]
#[command(about = "Headless Game Boy CPU emulator")]
struct Cli {
    /// Path to a 32KB (or smaller) ROM image; overrides `rom_path` in the config file
    rom_path: Option<String>,

    /// TOML file with run settings
    #[arg(short = 'c', long = "config")]
    config_path: Option<String>,

    #[arg(short = 'e', long, value_parser = parse_u16)]
    entry_point: Option<u16>,

    #[arg(long, value_parser = parse_u16)]
    initial_sp: Option<u16>,

    #[arg(short = 'n', long)]
    max_steps: Option<u64>,

    /// Attempt to execute HALT (an unimplemented opcode) instead of stopping before it
    #[arg(long, default_value_t = false)]
    no_stop_on_halt: bool,

    /// Log elapsed time and instructions per second when the run ends
    #[arg(long, default_value_t = false)]
    debug_timing: bool,

    /// Register preset applied before the first step, e.g. `--set B=0x10 --set HL=0xC000`
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    register_presets: Vec<RegisterAssignment>,

    #[arg(long)]
    load_state: Option<String>,

    #[arg(long)]
    save_state: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let file_config = match &args.config_path {
        Some(config_path) => FileConfig::from_toml_file(config_path)?,
        None => FileConfig::default(),
    };

    let run_config = file_config.into_run_config(Overrides {
        rom_path: args.rom_path,
        entry_point: args.entry_point,
        initial_sp: args.initial_sp,
        max_steps: args.max_steps,
        no_stop_on_halt: args.no_stop_on_halt,
        debug_timing: args.debug_timing,
        register_presets: args.register_presets,
        load_state_path: args.load_state,
        save_state_path: args.save_state,
    })?;

    let summary = gbe_core::run(&run_config).context("emulator run failed")?;

    println!("{} after {} instructions", summary.stop_reason, summary.steps);
    println!("{}", summary.registers);

    Ok(())
}
