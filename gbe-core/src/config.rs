use crate::cpu::RegisterAssignment;
use crate::memory::address;
use std::fmt::Formatter;

pub const DEFAULT_INITIAL_SP: u16 = 0xFFFE;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rom_path: String,
    pub entry_point: u16,
    pub initial_sp: u16,
    /// Stop after this many instructions; `None` runs until HALT or an error.
    pub max_steps: Option<u64>,
    /// Stop when the next opcode is HALT instead of attempting to execute it.
    pub stop_on_halt: bool,
    pub debug_timing: bool,
    pub register_presets: Vec<RegisterAssignment>,
    pub load_state_path: Option<String>,
    pub save_state_path: Option<String>,
}

impl RunConfig {
    pub fn new(rom_path: String) -> Self {
        Self {
            rom_path,
            entry_point: address::ENTRY_POINT,
            initial_sp: DEFAULT_INITIAL_SP,
            max_steps: None,
            stop_on_halt: true,
            debug_timing: false,
            register_presets: Vec::new(),
            load_state_path: None,
            save_state_path: None,
        }
    }
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rom_path: {}", self.rom_path)?;
        writeln!(f, "entry_point: {:#06X}", self.entry_point)?;
        writeln!(f, "initial_sp: {:#06X}", self.initial_sp)?;
        writeln!(f, "max_steps: {}", fmt_option(self.max_steps.as_ref()))?;
        writeln!(f, "stop_on_halt: {}", self.stop_on_halt)?;
        writeln!(f, "debug_timing: {}", self.debug_timing)?;
        writeln!(
            f,
            "register_presets: [{}]",
            self.register_presets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(f, "load_state_path: {}", fmt_option(self.load_state_path.as_ref()))?;
        write!(f, "save_state_path: {}", fmt_option(self.save_state_path.as_ref()))
    }
}

fn fmt_option<T: std::fmt::Display>(option: Option<&T>) -> String {
    match option {
        Some(value) => format!("{value}"),
        None => "<None>".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunConfig::new("test.gb".into());

        assert_eq!(0x0100, config.entry_point);
        assert_eq!(0xFFFE, config.initial_sp);
        assert_eq!(None, config.max_steps);
        assert!(config.stop_on_halt);
    }

    #[test]
    fn display() {
        let config = RunConfig {
            max_steps: Some(1000),
            register_presets: vec!["B=0x10".parse().unwrap(), "HL=0xC000".parse().unwrap()],
            ..RunConfig::new("roms/fib.gb".into())
        };

        let display = config.to_string();
        assert!(display.contains("rom_path: roms/fib.gb\n"));
        assert!(display.contains("entry_point: 0x0100\n"));
        assert!(display.contains("max_steps: 1000\n"));
        assert!(display.contains("register_presets: [B=0x0010, HL=0xC000]\n"));
        assert!(display.ends_with("save_state_path: <None>"));
    }
}
