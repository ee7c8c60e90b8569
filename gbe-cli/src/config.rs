use anyhow::{anyhow, Context};
use gbe_core::config::DEFAULT_INITIAL_SP;
use gbe_core::cpu::{RegisterAssignment, RegisterName};
use gbe_core::memory::address;
use gbe_core::RunConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Run settings read from a TOML file. Every field is optional; command-line flags take
/// precedence over anything set here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    pub rom_path: Option<String>,

    #[serde(default = "default_entry_point")]
    pub entry_point: u16,

    #[serde(default = "default_initial_sp")]
    pub initial_sp: u16,

    pub max_steps: Option<u64>,

    #[serde(default = "default_stop_on_halt")]
    pub stop_on_halt: bool,

    #[serde(default)]
    pub debug_timing: bool,

    #[serde(default)]
    pub registers: BTreeMap<RegisterName, u16>,

    pub load_state_path: Option<String>,

    pub save_state_path: Option<String>,
}

fn default_entry_point() -> u16 {
    address::ENTRY_POINT
}

fn default_initial_sp() -> u16 {
    DEFAULT_INITIAL_SP
}

fn default_stop_on_halt() -> bool {
    true
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            rom_path: None,
            entry_point: default_entry_point(),
            initial_sp: default_initial_sp(),
            max_steps: None,
            stop_on_halt: default_stop_on_halt(),
            debug_timing: bool::default(),
            registers: BTreeMap::new(),
            load_state_path: None,
            save_state_path: None,
        }
    }
}

/// Values given on the command line. `None` / `false` means "not given" and leaves the file
/// value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rom_path: Option<String>,
    pub entry_point: Option<u16>,
    pub initial_sp: Option<u16>,
    pub max_steps: Option<u64>,
    pub no_stop_on_halt: bool,
    pub debug_timing: bool,
    pub register_presets: Vec<RegisterAssignment>,
    pub load_state_path: Option<String>,
    pub save_state_path: Option<String>,
}

impl FileConfig {
    pub fn from_toml_file<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("error reading TOML config file from '{path:?}'"))?;
        let config: Self = toml::from_str(&config_str)
            .with_context(|| format!("error parsing run config from TOML file at '{path:?}'"))?;

        Ok(config)
    }

    /// Combine file settings with command-line overrides. Register presets from the file are
    /// applied first so that `--set` wins for the same register.
    pub fn into_run_config(self, overrides: Overrides) -> Result<RunConfig, anyhow::Error> {
        let rom_path = overrides
            .rom_path
            .or(self.rom_path)
            .ok_or_else(|| anyhow!("no ROM path given on the command line or in the config file"))?;

        let mut register_presets = self
            .registers
            .into_iter()
            .map(|(register, value)| {
                RegisterAssignment::new(register, value)
                    .map_err(anyhow::Error::msg)
                    .context("invalid [registers] entry in config file")
            })
            .collect::<Result<Vec<_>, _>>()?;
        register_presets.extend(overrides.register_presets);

        Ok(RunConfig {
            rom_path,
            entry_point: overrides.entry_point.unwrap_or(self.entry_point),
            initial_sp: overrides.initial_sp.unwrap_or(self.initial_sp),
            max_steps: overrides.max_steps.or(self.max_steps),
            stop_on_halt: self.stop_on_halt && !overrides.no_stop_on_halt,
            debug_timing: self.debug_timing || overrides.debug_timing,
            register_presets,
            load_state_path: overrides.load_state_path.or(self.load_state_path),
            save_state_path: overrides.save_state_path.or(self.save_state_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbe_core::cpu::{CpuRegister, CpuRegisterPair};

    #[test]
    fn parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            rom_path = "roms/fib.gb"
            entry_point = 0x150
            max_steps = 5000
            stop_on_halt = false

            [registers]
            b = 0x10
            HL = 0xC000
            "#,
        )
        .unwrap();

        assert_eq!(Some("roms/fib.gb".into()), config.rom_path);
        assert_eq!(0x0150, config.entry_point);
        assert_eq!(0xFFFE, config.initial_sp);
        assert_eq!(Some(5000), config.max_steps);
        assert!(!config.stop_on_halt);
        assert_eq!(
            BTreeMap::from([
                (RegisterName::Byte(CpuRegister::B), 0x10),
                (RegisterName::Word(CpuRegisterPair::HL), 0xC000),
            ]),
            config.registers
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert_eq!(FileConfig::default(), config);
    }

    #[test]
    fn unknown_register_is_a_parse_error() {
        let result: Result<FileConfig, _> = toml::from_str("[registers]\nQ = 1\n");

        assert!(result.is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let config = FileConfig {
            rom_path: Some("file.gb".into()),
            max_steps: Some(10),
            registers: BTreeMap::from([(RegisterName::Byte(CpuRegister::A), 0x01)]),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            rom_path: Some("cli.gb".into()),
            initial_sp: Some(0xDFFF),
            no_stop_on_halt: true,
            register_presets: vec!["A=0x02".parse().unwrap()],
            ..Overrides::default()
        };

        let run_config = config.into_run_config(overrides).unwrap();

        assert_eq!("cli.gb", run_config.rom_path);
        assert_eq!(0x0100, run_config.entry_point);
        assert_eq!(0xDFFF, run_config.initial_sp);
        assert_eq!(Some(10), run_config.max_steps);
        assert!(!run_config.stop_on_halt);
        assert_eq!(
            vec!["A=0x01".parse().unwrap(), "A=0x02".parse::<RegisterAssignment>().unwrap()],
            run_config.register_presets
        );
    }

    #[test]
    fn missing_rom_path() {
        let result = FileConfig::default().into_run_config(Overrides::default());

        assert!(result.is_err());
    }

    #[test]
    fn oversized_byte_register_value() {
        let config = FileConfig {
            rom_path: Some("file.gb".into()),
            registers: BTreeMap::from([(RegisterName::Byte(CpuRegister::C), 0x100)]),
            ..FileConfig::default()
        };

        assert!(config.into_run_config(Overrides::default()).is_err());
    }
}
